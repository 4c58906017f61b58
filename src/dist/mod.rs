//! Frequency tables of outcomes.
//!
//! Where an [`OutcomeMultiset`](crate::OutcomeMultiset) stores every outcome
//! once per combination of die faces, a [`DenseDist`] stores, for each value,
//! how many combinations produce it. Combining two tables is a discrete
//! convolution, so its cost depends on the range of values instead of the
//! number of combinations.

use std::ops::{AddAssign, MulAssign};

use num::{BigUint, Num};

mod dense;
pub use dense::DenseDist;
pub(crate) use dense::{ConvolutionCost, DistEvaluator};

/// Types which can count outcomes, e.g. [`u64`], [`u128`] or [`BigUint`].
///
/// Primitive types overflow for large expressions; [`BigUint`] never does.
pub trait Count: Num + Clone + PartialOrd + Into<BigUint>
where
    for<'b> Self: AddAssign<&'b Self> + MulAssign<&'b Self>,
{
}

impl<T> Count for T
where
    T: Num + Clone + PartialOrd + Into<BigUint>,
    for<'b> T: AddAssign<&'b T> + MulAssign<&'b T>,
{
}
