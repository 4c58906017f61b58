use num::BigUint;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DiceError, DiceTerm, Operator, dices::Evaluator, dist::DenseDist};

/// Every outcome of some dice, once per ordered combination of die faces.
///
/// Duplicates are kept: `2d6` has 36 entries, six of which are 7. The order
/// of the entries carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct OutcomeMultiset {
    values: Vec<isize>,
}

impl OutcomeMultiset {
    /// The multiset containing only `n`.
    pub fn constant(n: isize) -> Self {
        OutcomeMultiset { values: vec![n] }
    }

    pub fn as_slice(&self) -> &[isize] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min_value(&self) -> Option<isize> {
        self.values.iter().copied().min()
    }

    pub fn max_value(&self) -> Option<isize> {
        self.values.iter().copied().max()
    }

    /// How many entries equal `n`.
    pub fn count_of(&self, n: isize) -> usize {
        self.values.iter().filter(|&&x| x == n).count()
    }

    /// Pair every entry of `self` with every entry of `other`, adding or
    /// subtracting them. The result has `self.len() * other.len()` entries.
    ///
    /// ```
    /// use dicestats::{OutcomeMultiset, Operator, generate_outcomes};
    ///
    /// let d2 = generate_outcomes(1, 2).unwrap();
    /// let x = OutcomeMultiset::constant(10).combine(&d2, Operator::Sub);
    /// assert_eq!(x.as_slice(), &[9, 8]);
    /// ```
    #[must_use]
    pub fn combine(&self, other: &OutcomeMultiset, op: Operator) -> OutcomeMultiset {
        let mut values = Vec::with_capacity(self.len() * other.len());
        for &a in &self.values {
            for &b in &other.values {
                values.push(match op {
                    Operator::Add => a + b,
                    Operator::Sub => a - b,
                });
            }
        }
        OutcomeMultiset { values }
    }

    /// Count how often each value occurs.
    pub fn frequencies(&self) -> DenseDist<BigUint> {
        DenseDist::tabulate(&self.values)
    }
}

/// Every sum of `count` dice with `sides` faces each, one entry per ordered
/// combination of faces. The result has `sides^count` entries, each between
/// `count` and `count * sides`.
///
/// Nothing limits the size of the result except the address space, so callers
/// should bound `sides^count` first, e.g. through
/// [`Config::enumeration_limit`](crate::Config::enumeration_limit).
///
/// ```
/// use dicestats::generate_outcomes;
///
/// let x = generate_outcomes(2, 3).unwrap();
/// assert_eq!(x.as_slice(), &[2, 3, 4, 3, 4, 5, 4, 5, 6]);
/// ```
pub fn generate_outcomes(count: usize, sides: usize) -> Result<OutcomeMultiset, DiceError> {
    let term = DiceTerm::new(count, sides)?;
    let size = term.enumeration_size();
    if size > usize::MAX as u128 {
        return Err(DiceError::scale_limit(size, usize::MAX));
    }
    // Every sum, and so `sides`, has to fit in an `isize`
    term.bounds()?;
    if sides == 1 {
        return Ok(OutcomeMultiset { values: vec![count as isize] });
    }
    let sides = sides as isize;

    // For each extra die, every face is added to every outcome of the
    // previous dice, face-major.
    let mut values: Vec<isize> = (1..=sides).collect();
    for _ in 1..count {
        let mut next = Vec::with_capacity(values.len() * sides as usize);
        for face in 1..=sides {
            next.extend(values.iter().map(|x| face + x));
        }
        values = next;
    }
    Ok(OutcomeMultiset { values })
}

// Enumerates every combination of faces.
pub(crate) struct MultisetEvaluator;

impl Evaluator<OutcomeMultiset> for MultisetEvaluator {
    fn dice(&mut self, d: DiceTerm) -> Result<OutcomeMultiset, DiceError> {
        generate_outcomes(d.count(), d.sides())
    }

    fn constant(&mut self, n: isize) -> Result<OutcomeMultiset, DiceError> {
        Ok(OutcomeMultiset::constant(n))
    }

    fn add_inplace(&mut self, a: &mut OutcomeMultiset, b: &OutcomeMultiset) -> Result<(), DiceError> {
        *a = a.combine(b, Operator::Add);
        Ok(())
    }

    fn sub_inplace(&mut self, a: &mut OutcomeMultiset, b: &OutcomeMultiset) -> Result<(), DiceError> {
        *a = a.combine(b, Operator::Sub);
        Ok(())
    }
}
