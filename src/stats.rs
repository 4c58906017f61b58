use std::{cmp::Ordering, fmt};

use num::{BigInt, BigRational, BigUint, Integer, ToPrimitive, Zero};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dist::DenseDist;

/// Summary of every outcome of an expression.
///
/// All values are exact up to the final conversion to [`f64`]. Rounding to
/// two decimals is left to presentation, see [`Statistics::rounded_mean`] and
/// the [`Display`](fmt::Display) implementation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Statistics {
    min: isize,
    max: isize,
    mean: f64,
    median: f64,
    modes: Vec<isize>,
    standard_deviation: f64,
    total: BigUint,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// The value at index `k` of the sorted outcomes.
fn nth_value(counts: &[(isize, BigUint)], k: &BigUint) -> isize {
    let mut seen = BigUint::zero();
    for (v, c) in counts {
        seen += c;
        if &seen > k {
            return *v;
        }
    }
    counts.last().map_or(0, |x| x.0)
}

impl Statistics {
    /// Statistics of the outcomes counted in `dist`, which must contain at
    /// least one outcome.
    pub(crate) fn from_dist(dist: &DenseDist<BigUint>) -> Self {
        let counts: Vec<(isize, BigUint)> =
            dist.iter_enumerate().filter(|x| !x.1.is_zero()).map(|(v, c)| (v, c.clone())).collect();
        debug_assert!(!counts.is_empty());

        let mut total = BigUint::zero();
        let mut sum = BigInt::zero();
        let mut sum_squares = BigInt::zero();
        let mut best = BigUint::zero();
        let mut modes = Vec::new();
        // Ascending order, so ties end up in the order a scan over the sorted
        // outcomes first meets them.
        for (v, c) in &counts {
            total += c;
            let value = BigInt::from(*v);
            let weighted = BigInt::from(c.clone()) * &value;
            sum_squares += &weighted * &value;
            sum += weighted;
            match c.cmp(&best) {
                Ordering::Greater => {
                    best = c.clone();
                    modes.clear();
                    modes.push(*v);
                }
                Ordering::Equal => modes.push(*v),
                Ordering::Less => {}
            }
        }

        let n = BigInt::from(total.clone());
        let mean = BigRational::new(sum.clone(), n.clone());
        // Population variance: (N * sum(v^2) - sum(v)^2) / N^2
        let variance = BigRational::new(&n * &sum_squares - &sum * &sum, &n * &n);

        let half = &total / 2u32;
        let median = if total.is_odd() {
            nth_value(&counts, &half) as f64
        } else {
            let below = nth_value(&counts, &(&half - 1u32));
            let above = nth_value(&counts, &half);
            (below as f64 + above as f64) / 2.0
        };

        Statistics {
            min: counts.first().map_or(0, |x| x.0),
            max: counts.last().map_or(0, |x| x.0),
            mean: mean.to_f64().unwrap_or(f64::NAN),
            median,
            modes,
            standard_deviation: variance.to_f64().unwrap_or(f64::NAN).sqrt(),
            total,
        }
    }

    pub fn min(&self) -> isize {
        self.min
    }

    pub fn max(&self) -> isize {
        self.max
    }

    /// The arithmetic mean, at full precision.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// The middle outcome, or the average of the two middle outcomes if there
    /// is an even number of them.
    pub fn median(&self) -> f64 {
        self.median
    }

    /// The most common outcomes, in ascending order.
    pub fn modes(&self) -> &[isize] {
        &self.modes
    }

    /// The population standard deviation, at full precision.
    pub fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }

    /// Number of outcomes, i.e. of combinations of die faces.
    pub fn total(&self) -> &BigUint {
        &self.total
    }

    pub fn rounded_mean(&self) -> f64 {
        round2(self.mean)
    }

    pub fn rounded_standard_deviation(&self) -> f64 {
        round2(self.standard_deviation)
    }

    /// Mean minus and plus one standard deviation.
    pub fn band(&self) -> (f64, f64) {
        (self.mean - self.standard_deviation, self.mean + self.standard_deviation)
    }
}

/// ```
/// let stats = dicestats::evaluate("1d6").unwrap().statistics().clone();
/// assert_eq!(
///     stats.to_string(),
///     "min 1, max 6, mean 3.50, median 3.5, mode 1, 2, 3, 4, 5, 6, sd 1.71"
/// );
/// ```
impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "min {}, max {}, mean {:.2}, median {}, mode {}, sd {:.2}",
            self.min,
            self.max,
            self.mean,
            self.median,
            join_modes(&self.modes),
            self.standard_deviation
        )
    }
}

pub(crate) fn join_modes(modes: &[isize]) -> String {
    modes.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_outcomes;

    fn stats_of(values: &[isize]) -> Statistics {
        Statistics::from_dist(&DenseDist::tabulate(values))
    }

    #[test]
    fn one_d6() {
        let s = Statistics::from_dist(&generate_outcomes(1, 6).unwrap().frequencies());
        assert_eq!((s.min(), s.max()), (1, 6));
        assert_eq!(s.mean(), 3.5);
        assert_eq!(s.median(), 3.5);
        assert_eq!(s.modes(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(s.rounded_standard_deviation(), 1.71);
        assert_eq!(s.total(), &BigUint::from(6u32));
    }

    #[test]
    fn constant() {
        let s = stats_of(&[5]);
        assert_eq!((s.min(), s.max()), (5, 5));
        assert_eq!((s.mean(), s.median()), (5.0, 5.0));
        assert_eq!(s.modes(), &[5]);
        assert_eq!(s.standard_deviation(), 0.0);
        assert_eq!(s.band(), (5.0, 5.0));
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(stats_of(&[9, 1, 4]).median(), 4.0);
        assert_eq!(stats_of(&[9, 1, 4, 2]).median(), 3.0);
        assert_eq!(stats_of(&[-3, -4]).median(), -3.5);
    }

    #[test]
    fn modes_ascending() {
        // Unsorted input, the modes still come out in ascending order
        assert_eq!(stats_of(&[8, 3, 8, 1, 3, 5]).modes(), &[3, 8]);
        assert_eq!(stats_of(&[2, 2, 7]).modes(), &[2]);
    }

    #[test]
    fn population_deviation() {
        // Mean 5, squared deviations sum to 32, divided by 8 (not 7)
        let s = stats_of(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(s.mean(), 5.0);
        assert_eq!(s.standard_deviation(), 2.0);
        assert_eq!(s.band(), (3.0, 7.0));
    }

    #[test]
    fn rounding() {
        let s = stats_of(&[0, 0, 1]);
        assert_eq!(s.rounded_mean(), 0.33);
        assert!((s.mean() - 1.0 / 3.0).abs() < 1e-12);
    }
}
