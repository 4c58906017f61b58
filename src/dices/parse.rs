use std::str::FromStr;

use log::trace;

use super::{DiceFormula, DiceTerm, Operator, Part, Segment};
use crate::DiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Op(Operator),
    // Text between two operators, with its byte offset in the input
    Segment(&'a str, usize),
}

// Split on `+` and `-`, keeping the operators as tokens. The result always
// alternates between segments and operators, starting and ending with a
// segment, which may be empty.
fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let op = match c {
            '+' => Operator::Add,
            '-' => Operator::Sub,
            _ => continue,
        };
        tokens.push(Token::Segment(&s[start..i], start));
        tokens.push(Token::Op(op));
        start = i + c.len_utf8();
    }
    tokens.push(Token::Segment(&s[start..], start));
    tokens
}

fn parse_segment(text: &str, position: usize) -> Result<Part, DiceError> {
    segment_parser::segment(text)
        .map_err(|_| DiceError::InvalidSegment { segment: text.to_string(), position })?
}

impl FromStr for DiceFormula {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DiceError::Empty);
        }
        let mut tokens = tokenize(s);
        // A leading sign applies to the first segment: "-d4+5"
        let leading_sign = matches!(
            tokens[..],
            [Token::Segment(first, _), Token::Op(_), ..] if first.trim().is_empty()
        );
        if leading_sign {
            tokens.remove(0);
        }

        let mut op = Operator::Add;
        let mut segments = Vec::new();
        for token in tokens {
            match token {
                Token::Op(next) => op = next,
                Token::Segment(text, position) => {
                    let part = parse_segment(text, position)?;
                    trace!("segment {:?} at {}: {:?} {:?}", text, position, op, part);
                    segments.push(Segment { op, part });
                    op = Operator::Add;
                }
            }
        }
        Ok(DiceFormula::new(segments))
    }
}

peg::parser! {
    grammar segment_parser() for str {
        rule ws() = quiet!{[' ' | '\t' | '\r' | '\n']*}
        rule digits() -> &'input str = $(['0'..='9']+)
        rule count() -> usize = n:digits() {? n.parse::<usize>().or(Err("usize")) }
        rule constant() -> isize = n:digits() {? n.parse::<isize>().or(Err("isize")) }
        rule dice() -> Result<Part, DiceError> = c:count()? "d" s:count() {
            DiceTerm::new(c.unwrap_or(1), s).map(Part::Dice)
        }
        pub rule segment() -> Result<Part, DiceError>
            = ws() p:(dice() / n:constant() { Ok(Part::Const(n)) }) ws() { p }
    }
}
