use dicestats::{Config, compare, report};
use log::{error, info};

fn main() {
    pretty_env_logger::init();

    // `dicestats 2d6 d12` compares the same way as `dicestats 2d6vd12`
    let input = std::env::args().skip(1).collect::<Vec<_>>().join("v");
    if input.trim().is_empty() {
        eprintln!("usage: dicestats <expression>[v<expression>]");
        eprintln!("e.g.   dicestats 2d6+3vd20");
        std::process::exit(2);
    }

    info!("evaluating {input:?}");
    match compare(&input, &Config::default()) {
        Ok(comparison) => print!("{}", report::render(&comparison)),
        Err(e) => {
            if e.is_syntax() {
                eprintln!("Invalid dice expression!");
            } else {
                error!("evaluation failed: {e}");
            }
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
