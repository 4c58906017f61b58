//! Dice expressions: a sum of dice terms and constants.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::DiceError;

mod parse;
mod print;
mod random;

/// `count` dice, each with `sides` faces, summed. Written `NdS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct DiceTerm {
    count: usize,
    sides: usize,
}

impl DiceTerm {
    /// Fails with [`DiceError::InvalidTerm`] unless both `count` and `sides`
    /// are at least 1.
    pub fn new(count: usize, sides: usize) -> Result<Self, DiceError> {
        if count == 0 || sides == 0 {
            return Err(DiceError::InvalidTerm { count, sides });
        }
        Ok(DiceTerm { count, sides })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn sides(&self) -> usize {
        self.sides
    }

    /// Number of ordered face combinations, `sides^count`, saturating at
    /// `u128::MAX`.
    pub fn enumeration_size(&self) -> u128 {
        if self.sides == 1 {
            return 1;
        }
        u32::try_from(self.count)
            .ok()
            .and_then(|count| (self.sides as u128).checked_pow(count))
            .unwrap_or(u128::MAX)
    }

    /// The smallest and largest sum, `count` and `count * sides`.
    pub fn bounds(&self) -> Result<(isize, isize), DiceError> {
        let min = isize::try_from(self.count).map_err(|_| DiceError::overflow())?;
        let max = self
            .count
            .checked_mul(self.sides)
            .and_then(|x| isize::try_from(x).ok())
            .ok_or_else(DiceError::overflow)?;
        Ok((min, max))
    }
}

/// The sign in front of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Operator {
    #[default]
    Add,
    Sub,
}

impl Neg for Operator {
    type Output = Operator;

    fn neg(self) -> Operator {
        match self {
            Operator::Add => Operator::Sub,
            Operator::Sub => Operator::Add,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Part {
    Dice(DiceTerm),
    Const(isize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Segment {
    pub op: Operator,
    pub part: Part,
}

/// A sequence of dice terms and constants, added or subtracted left to right.
///
/// ```
/// # use dicestats::DiceFormula;
/// let x: DiceFormula = "2d6+d4-3".parse().unwrap();
/// assert_eq!(x.to_string(), "2d6 + d4 - 3");
/// assert_eq!(x.bounds(), Ok((0, 13)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct DiceFormula {
    segments: Vec<Segment>,
}

// Used when folding a `DiceFormula` into some representation of its outcomes.
pub(crate) trait Evaluator<T> {
    fn dice(&mut self, d: DiceTerm) -> Result<T, DiceError>;
    fn constant(&mut self, n: isize) -> Result<T, DiceError>;
    fn add_inplace(&mut self, a: &mut T, b: &T) -> Result<(), DiceError>;
    fn sub_inplace(&mut self, a: &mut T, b: &T) -> Result<(), DiceError>;
}

// Finds the minimum and maximum value of a `DiceFormula`.
struct Bounds;

impl Evaluator<(isize, isize)> for Bounds {
    fn dice(&mut self, d: DiceTerm) -> Result<(isize, isize), DiceError> {
        d.bounds()
    }

    fn constant(&mut self, n: isize) -> Result<(isize, isize), DiceError> {
        Ok((n, n))
    }

    fn add_inplace(&mut self, a: &mut (isize, isize), b: &(isize, isize)) -> Result<(), DiceError> {
        let min = a.0.checked_add(b.0).ok_or_else(DiceError::overflow)?;
        let max = a.1.checked_add(b.1).ok_or_else(DiceError::overflow)?;
        *a = (min, max);
        Ok(())
    }

    fn sub_inplace(&mut self, a: &mut (isize, isize), b: &(isize, isize)) -> Result<(), DiceError> {
        let min = a.0.checked_sub(b.1).ok_or_else(DiceError::overflow)?;
        let max = a.1.checked_sub(b.0).ok_or_else(DiceError::overflow)?;
        *a = (min, max);
        Ok(())
    }
}

impl DiceFormula {
    pub(crate) fn new(segments: Vec<Segment>) -> Self {
        debug_assert!(!segments.is_empty());
        DiceFormula { segments }
    }

    /// A formula consisting of a single dice term.
    pub fn dice(d: DiceTerm) -> Self {
        DiceFormula::new(vec![Segment { op: Operator::Add, part: Part::Dice(d) }])
    }

    /// A formula which always has the value `n`.
    pub fn constant(n: isize) -> Self {
        DiceFormula::new(vec![Segment { op: Operator::Add, part: Part::Const(n) }])
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Every dice term of the formula, ignoring their sign.
    pub fn terms(&self) -> impl Iterator<Item = DiceTerm> + '_ {
        self.segments.iter().filter_map(|s| match s.part {
            Part::Dice(d) => Some(d),
            Part::Const(_) => None,
        })
    }

    // Fold the formula with an Evaluator, starting from the constant 0.
    pub(crate) fn traverse<T, Q: Evaluator<T>>(&self, state: &mut Q) -> Result<T, DiceError> {
        let mut total = state.constant(0)?;
        for segment in &self.segments {
            let value = match segment.part {
                Part::Dice(d) => state.dice(d)?,
                Part::Const(n) => state.constant(n)?,
            };
            match segment.op {
                Operator::Add => state.add_inplace(&mut total, &value)?,
                Operator::Sub => state.sub_inplace(&mut total, &value)?,
            }
        }
        Ok(total)
    }

    /// The smallest and largest possible value. Fails if either doesn't fit
    /// in an [`isize`].
    pub fn bounds(&self) -> Result<(isize, isize), DiceError> {
        self.traverse(&mut Bounds)
    }

    /// Size of the full outcome multiset: the product of `sides^count` over
    /// every dice term, saturating at `u128::MAX`.
    pub fn enumeration_size(&self) -> u128 {
        self.terms().fold(1u128, |acc, d| acc.saturating_mul(d.enumeration_size()))
    }

    fn push_all(&mut self, other: &DiceFormula, flip: bool) {
        self.segments.extend(other.segments.iter().map(|s| Segment {
            op: if flip { -s.op } else { s.op },
            part: s.part,
        }));
    }
}

impl AddAssign<&Self> for DiceFormula {
    fn add_assign(&mut self, other: &Self) {
        self.push_all(other, false);
    }
}

impl Add<&Self> for DiceFormula {
    type Output = Self;

    fn add(mut self, other: &Self) -> Self {
        self.add_assign(other);
        self
    }
}

impl Add<Self> for DiceFormula {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self.add_assign(&other);
        self
    }
}

impl SubAssign<&Self> for DiceFormula {
    fn sub_assign(&mut self, other: &Self) {
        self.push_all(other, true);
    }
}

impl Sub<&Self> for DiceFormula {
    type Output = Self;

    fn sub(mut self, other: &Self) -> Self {
        self.sub_assign(other);
        self
    }
}

impl Sub<Self> for DiceFormula {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        self.sub_assign(&other);
        self
    }
}
