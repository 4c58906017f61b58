use std::{
    mem,
    ops::{Add, AddAssign, MulAssign, Sub},
};

use num::BigUint;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Count;
use crate::{DiceError, DiceTerm, dices::Evaluator};

/// Occurrence counts of outcomes, stored densely in a [`Vec`].
///
/// `values[i]` is the number of combinations of die faces which produce the
/// outcome `offset + i`. Counts have type `T`, e.g. [`u64`] or [`BigUint`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct DenseDist<T> {
    values: Vec<T>,
    offset: isize,
}

impl<T> DenseDist<T> {
    /// The smallest value in the table.
    pub fn min_value(&self) -> isize {
        self.offset
    }

    /// The largest value in the table.
    pub fn max_value(&self) -> isize {
        self.offset + (self.values.len() as isize) - 1
    }

    /// Iterate through every value in the table, in order, with its count.
    pub fn iter_enumerate(&self) -> impl Iterator<Item = (isize, &T)> {
        self.values.iter().enumerate().map(|(x_i, x)| (x_i as isize + self.offset, x))
    }

    /// How many combinations produce `n`. Returns `None` if `n` is outside
    /// the table.
    ///
    /// ```
    /// use dicestats::dist::DenseDist;
    ///
    /// let dist: DenseDist<u64> = DenseDist::new_uniform(1, 6);
    /// assert_eq!(dist.count_of(3), Some(&1));
    /// assert_eq!(dist.count_of(7), None);
    /// ```
    pub fn count_of(&self, n: isize) -> Option<&T> {
        n.checked_sub(self.offset)
            .and_then(|x| usize::try_from(x).ok())
            .and_then(|x| self.values.get(x))
    }

    #[must_use]
    pub fn map<U, F: Fn(&T) -> U>(&self, f: F) -> DenseDist<U> {
        DenseDist { values: self.values.iter().map(f).collect(), offset: self.offset }
    }
}

impl<T: Count> DenseDist<T>
where
    for<'b> T: AddAssign<&'b T> + MulAssign<&'b T>,
{
    /// Every value from `min` to, and including, `max` occurs once.
    pub fn new_uniform(min: isize, max: isize) -> Self {
        debug_assert!(min <= max);
        let len = (max - min + 1) as usize;
        DenseDist { values: vec![T::one(); len], offset: min }
    }

    /// `n` occurs once.
    pub fn new_constant(n: isize) -> Self {
        DenseDist { values: vec![T::one()], offset: n }
    }

    /// Count occurrences of each value in `outcomes`, which must not be empty.
    pub(crate) fn tabulate(outcomes: &[isize]) -> Self {
        let min = outcomes.iter().copied().min().unwrap_or(0);
        let max = outcomes.iter().copied().max().unwrap_or(0);
        let mut values = vec![T::zero(); (max - min + 1) as usize];
        let one = T::one();
        for &x in outcomes {
            values[(x - min) as usize] += &one;
        }
        DenseDist { values, offset: min }
    }

    /// Total number of combinations.
    pub fn total(&self) -> T {
        let mut out = T::zero();
        for v in &self.values {
            out += v;
        }
        out
    }

    /// The same table with [`BigUint`] counts.
    pub fn to_biguint(&self) -> DenseDist<BigUint> {
        self.map(|x| x.clone().into())
    }

    fn op_inplace<F: Fn(isize, isize) -> isize>(&mut self, other: &DenseDist<T>, buffer: &mut Vec<T>, f: F) {
        debug_assert!(buffer.is_empty());

        let sl = self.max_value();
        let sm = self.min_value();
        let ol = other.max_value();
        let om = other.min_value();
        let max_value = f(sl, ol).max(f(sl, om)).max(f(sm, ol)).max(f(sm, om));
        let min_value = f(sl, ol).min(f(sl, om)).min(f(sm, ol)).min(f(sm, om));

        buffer.resize((max_value - min_value + 1) as usize, T::zero());
        for (a_i, a) in self.iter_enumerate().filter(|x| !x.1.is_zero()) {
            for (b_i, b) in other.iter_enumerate().filter(|x| !x.1.is_zero()) {
                let new_value = f(a_i, b_i);
                let mut res: T = a.clone();
                res *= b;
                buffer[(new_value - min_value) as usize] += &res;
            }
        }
        mem::swap(&mut self.values, buffer);
        buffer.clear();
        self.offset = min_value;
    }

    pub(crate) fn add_inplace(&mut self, other: &DenseDist<T>, buffer: &mut Vec<T>) {
        self.op_inplace(other, buffer, isize::add);
    }

    pub(crate) fn sub_inplace(&mut self, other: &DenseDist<T>, buffer: &mut Vec<T>) {
        self.op_inplace(other, buffer, isize::sub);
    }

    /// Replace `self` by the sum of `times` independent copies of itself.
    pub(crate) fn multi_add_inplace(&mut self, times: usize, buffer: &mut Vec<T>) {
        // Binary exponentiation: `base` is `self` added to itself 2^k times
        let mut base = self.clone();
        let mut out: Option<DenseDist<T>> = None;
        let mut remaining = times;
        while remaining > 0 {
            if remaining & 1 == 1 {
                match &mut out {
                    Some(o) => o.add_inplace(&base, buffer),
                    None => out = Some(base.clone()),
                }
            }
            remaining >>= 1;
            if remaining > 0 {
                let copy = base.clone();
                base.add_inplace(&copy, buffer);
            }
        }
        *self = out.unwrap_or_else(|| DenseDist::new_constant(0));
    }
}

pub(crate) struct DistEvaluator<T> {
    buffer: Vec<T>,
}

impl<T> DistEvaluator<T> {
    pub(crate) fn new() -> Self {
        DistEvaluator { buffer: Vec::new() }
    }
}

impl<T: Count> Evaluator<DenseDist<T>> for DistEvaluator<T>
where
    for<'b> T: AddAssign<&'b T> + MulAssign<&'b T>,
{
    fn dice(&mut self, d: DiceTerm) -> Result<DenseDist<T>, DiceError> {
        // Makes sure `sides` fits in an `isize`
        d.bounds()?;
        let mut out = DenseDist::new_uniform(1, d.sides() as isize);
        out.multi_add_inplace(d.count(), &mut self.buffer);
        Ok(out)
    }

    fn constant(&mut self, n: isize) -> Result<DenseDist<T>, DiceError> {
        Ok(DenseDist::new_constant(n))
    }

    fn add_inplace(&mut self, a: &mut DenseDist<T>, b: &DenseDist<T>) -> Result<(), DiceError> {
        a.add_inplace(b, &mut self.buffer);
        Ok(())
    }

    fn sub_inplace(&mut self, a: &mut DenseDist<T>, b: &DenseDist<T>) -> Result<(), DiceError> {
        a.sub_inplace(b, &mut self.buffer);
        Ok(())
    }
}

/// Width of a table and an upper bound on the bits of its counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TableShape {
    pub(crate) width: u128,
    pub(crate) bits: u128,
}

// Follows the same steps as `DistEvaluator` without building any table,
// adding up the work of every convolution: one unit per 64-bit limb of each
// product of two counts.
#[derive(Debug, Default)]
pub(crate) struct ConvolutionCost {
    work: u128,
}

impl ConvolutionCost {
    pub(crate) fn work(&self) -> u128 {
        self.work
    }

    fn convolve(&mut self, a: TableShape, b: TableShape) -> TableShape {
        let bits = a.bits.saturating_add(b.bits);
        let limbs = 1 + bits / 64;
        self.work = self.work.saturating_add(a.width.saturating_mul(b.width).saturating_mul(limbs));
        TableShape { width: (a.width.saturating_add(b.width)).saturating_sub(1), bits }
    }
}

impl Evaluator<TableShape> for ConvolutionCost {
    fn dice(&mut self, d: DiceTerm) -> Result<TableShape, DiceError> {
        // ceil(log2(sides)), the bits of the count `sides^1`
        let bits = usize::BITS - (d.sides() - 1).leading_zeros();
        let mut base = TableShape { width: d.sides() as u128, bits: bits.into() };
        let mut out: Option<TableShape> = None;
        let mut remaining = d.count();
        while remaining > 0 {
            if remaining & 1 == 1 {
                out = Some(match out {
                    Some(o) => self.convolve(o, base),
                    None => base,
                });
            }
            remaining >>= 1;
            if remaining > 0 {
                base = self.convolve(base, base);
            }
        }
        Ok(out.unwrap_or(TableShape { width: 1, bits: 0 }))
    }

    fn constant(&mut self, _: isize) -> Result<TableShape, DiceError> {
        Ok(TableShape { width: 1, bits: 0 })
    }

    fn add_inplace(&mut self, a: &mut TableShape, b: &TableShape) -> Result<(), DiceError> {
        *a = self.convolve(*a, *b);
        Ok(())
    }

    fn sub_inplace(&mut self, a: &mut TableShape, b: &TableShape) -> Result<(), DiceError> {
        *a = self.convolve(*a, *b);
        Ok(())
    }
}
