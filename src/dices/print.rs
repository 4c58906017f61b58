use std::fmt;

use super::{DiceFormula, DiceTerm, Operator, Part};

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.count == 1 { write!(f, "d{}", self.sides) } else { write!(f, "{}d{}", self.count, self.sides) }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Part::Dice(d) => write!(f, "{d}"),
            Part::Const(n) => write!(f, "{n}"),
        }
    }
}

/// Displays a formula normalized, with spaces around operators.
/// ```
/// use dicestats::DiceFormula;
/// let x: DiceFormula = "-1d4+2d6 +3".parse().unwrap();
/// assert_eq!(x.to_string(), "-d4 + 2d6 + 3");
/// ```
impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            // Negative constants only come from the API, the parser never creates them
            let op = match segment.part {
                Part::Const(n) if n < 0 => -segment.op,
                _ => segment.op,
            };
            match (i, op) {
                (0, Operator::Add) => {}
                (0, Operator::Sub) => write!(f, "-")?,
                (_, Operator::Add) => write!(f, " + ")?,
                (_, Operator::Sub) => write!(f, " - ")?,
            }
            match segment.part {
                Part::Const(n) => write!(f, "{}", n.unsigned_abs())?,
                Part::Dice(d) => write!(f, "{d}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    // Given the name of a test, a formatted expression and multiple input expressions, create a
    // test which checks that the input expressions are equal to the formatted expression
    macro_rules! test {
        ($f:ident, $right:expr, $($wrong:expr),+) => {
            #[test]
            fn $f() {
                $(
                    let a = DiceFormula::from_str($wrong).unwrap();
                    assert_eq!($right, a.to_string());
                )+
            }
        };
    }

    test!(single, "2d6", "2d6", " 2d6 ");
    test!(count_one, "d20", "1d20", "d20");
    test!(add_sub, "2d6 + d4 - 3", "2d6+1d4-3", "2d6 +d4- 3");
    test!(leading_minus, "-d4 + 5", "-1d4+5", " - d4 + 5");
    test!(constants, "1 - 2 + 3", "1-2+3", "+1-2+3");

    #[test]
    fn negative_constant() {
        let a = DiceFormula::constant(-2) - DiceFormula::constant(-3);
        assert_eq!(a.to_string(), "-2 + 3");
    }

    #[test]
    fn print_random() {
        let mut rng = ChaCha20Rng::seed_from_u64(123);
        for _ in 0..200 {
            // Generate a random formula and check that it's unchanged after being
            // formatted and parsed again.
            let a = DiceFormula::make_random(&mut rng, 4, 10);
            let a_formatted = DiceFormula::from_str(&a.to_string()).unwrap();
            assert_eq!(a, a_formatted, "{a}");
        }
    }
}
