use log::debug;
use num::BigUint;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    DiceError, DiceFormula, Statistics,
    dist::{ConvolutionCost, DenseDist, DistEvaluator},
    outcomes::{MultisetEvaluator, OutcomeMultiset},
};

/// How the outcomes of an expression are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Strategy {
    /// Enumerate small expressions, convolve larger ones.
    #[default]
    Auto,
    /// Always list every outcome, see [`generate_outcomes`](crate::generate_outcomes).
    Enumerate,
    /// Always build frequency tables, see [`DenseDist`].
    Convolve,
}

/// Parameters for [`evaluate_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Config {
    pub strategy: Strategy,
    /// [`Strategy::Auto`] enumerates expressions with at most this many
    /// outcomes.
    pub enumeration_threshold: usize,
    /// Largest number of outcomes which will ever be enumerated.
    pub enumeration_limit: usize,
    /// Largest range of values, `max - min + 1`, of a frequency table.
    pub range_limit: usize,
    /// Largest amount of work spent building frequency tables, counted as
    /// 64-bit limbs of the products of two counts.
    pub work_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            enumeration_threshold: 1 << 16,
            enumeration_limit: 1 << 24,
            range_limit: 1 << 24,
            work_limit: 1 << 24,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_enumeration_threshold(mut self, threshold: usize) -> Self {
        self.enumeration_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_enumeration_limit(mut self, limit: usize) -> Self {
        self.enumeration_limit = limit;
        self
    }

    #[must_use]
    pub fn with_range_limit(mut self, limit: usize) -> Self {
        self.range_limit = limit;
        self
    }

    #[must_use]
    pub fn with_work_limit(mut self, limit: usize) -> Self {
        self.work_limit = limit;
        self
    }
}

/// The outcomes of an expression, in whichever form they were computed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Outcomes {
    Enumerated(OutcomeMultiset),
    Tabulated(DenseDist<BigUint>),
}

impl Outcomes {
    /// Number of outcomes, counting duplicates.
    pub fn len(&self) -> BigUint {
        match self {
            Outcomes::Enumerated(x) => BigUint::from(x.len()),
            Outcomes::Tabulated(x) => x.total(),
        }
    }

    pub fn min_value(&self) -> isize {
        match self {
            Outcomes::Enumerated(x) => x.min_value().unwrap_or(0),
            Outcomes::Tabulated(x) => x.min_value(),
        }
    }

    pub fn max_value(&self) -> isize {
        match self {
            Outcomes::Enumerated(x) => x.max_value().unwrap_or(0),
            Outcomes::Tabulated(x) => x.max_value(),
        }
    }

    /// How often each value occurs.
    pub fn frequencies(&self) -> DenseDist<BigUint> {
        match self {
            Outcomes::Enumerated(x) => x.frequencies(),
            Outcomes::Tabulated(x) => x.clone(),
        }
    }

    /// How often `n` occurs.
    pub fn count_of(&self, n: isize) -> BigUint {
        match self {
            Outcomes::Enumerated(x) => BigUint::from(x.count_of(n)),
            Outcomes::Tabulated(x) => x.count_of(n).cloned().unwrap_or_default(),
        }
    }

    /// The full multiset, if the outcomes were enumerated.
    pub fn as_multiset(&self) -> Option<&OutcomeMultiset> {
        match self {
            Outcomes::Enumerated(x) => Some(x),
            Outcomes::Tabulated(_) => None,
        }
    }
}

/// An evaluated expression: its statistics and its outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    formula: DiceFormula,
    statistics: Statistics,
    outcomes: Outcomes,
}

impl Evaluation {
    pub fn formula(&self) -> &DiceFormula {
        &self.formula
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn outcomes(&self) -> &Outcomes {
        &self.outcomes
    }

    pub fn into_parts(self) -> (Statistics, Outcomes) {
        (self.statistics, self.outcomes)
    }
}

/// Evaluate `expr` with the default [`Config`].
///
/// ```
/// let result = dicestats::evaluate("1d4+1d4-2").unwrap();
/// assert_eq!(result.statistics().mean(), 3.0);
/// assert!(dicestats::evaluate("2dx").is_err());
/// ```
pub fn evaluate(expr: &str) -> Result<Evaluation, DiceError> {
    evaluate_with(expr, &Config::default())
}

pub fn evaluate_with(expr: &str, config: &Config) -> Result<Evaluation, DiceError> {
    let formula: DiceFormula = expr.parse()?;
    formula.evaluate(config)
}

impl DiceFormula {
    /// Compute every outcome of the formula and its statistics.
    pub fn evaluate(&self, config: &Config) -> Result<Evaluation, DiceError> {
        let (min, max) = self.bounds()?;
        let size = self.enumeration_size();
        let range = (max as i128 - min as i128 + 1) as u128;

        let strategy = match config.strategy {
            Strategy::Auto if size <= config.enumeration_threshold as u128 => Strategy::Enumerate,
            Strategy::Auto => Strategy::Convolve,
            s => s,
        };
        debug!("evaluating {} by {:?}: {} outcomes between {} and {}", self, strategy, size, min, max);

        let outcomes = match strategy {
            Strategy::Enumerate => {
                if size > config.enumeration_limit as u128 {
                    return Err(DiceError::scale_limit(size, config.enumeration_limit));
                }
                Outcomes::Enumerated(self.traverse(&mut MultisetEvaluator)?)
            }
            Strategy::Convolve | Strategy::Auto => {
                if range > config.range_limit as u128 {
                    return Err(DiceError::scale_limit(range, config.range_limit));
                }
                let mut cost = ConvolutionCost::default();
                self.traverse(&mut cost)?;
                debug!("convolution work of {}: {}", self, cost.work());
                if cost.work() > config.work_limit as u128 {
                    return Err(DiceError::scale_limit(cost.work(), config.work_limit));
                }
                Outcomes::Tabulated(self.traverse(&mut DistEvaluator::new())?)
            }
        };
        let statistics = Statistics::from_dist(&outcomes.frequencies());
        Ok(Evaluation { formula: self.clone(), statistics, outcomes })
    }
}

/// One expression, or two expressions side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    left: Evaluation,
    right: Option<Evaluation>,
}

impl Comparison {
    pub fn left(&self) -> &Evaluation {
        &self.left
    }

    pub fn right(&self) -> Option<&Evaluation> {
        self.right.as_ref()
    }

    pub fn evaluations(&self) -> impl Iterator<Item = &Evaluation> {
        std::iter::once(&self.left).chain(self.right.as_ref())
    }

    /// The range of values covering every evaluation, so that their charts
    /// can share an axis.
    pub fn shared_range(&self) -> (isize, isize) {
        let min = self.evaluations().map(|e| e.statistics().min()).min().unwrap_or(0);
        let max = self.evaluations().map(|e| e.statistics().max()).max().unwrap_or(0);
        (min, max)
    }
}

/// Evaluate one expression, or two separated by `v`, e.g. `2d6v3d4`.
///
/// An empty second expression, as in `2d6v`, is left out. Fails if any other
/// expression is invalid.
///
/// ```
/// use dicestats::{Config, compare};
///
/// let c = compare("2d6 v d20", &Config::default()).unwrap();
/// assert_eq!(c.shared_range(), (1, 20));
/// ```
pub fn compare(input: &str, config: &Config) -> Result<Comparison, DiceError> {
    let exprs: Vec<&str> = input.split('v').collect();
    match exprs[..] {
        [single] => Ok(Comparison { left: evaluate_with(single, config)?, right: None }),
        [single, rest] if rest.trim().is_empty() => {
            Ok(Comparison { left: evaluate_with(single, config)?, right: None })
        }
        [a, b] => {
            let left = evaluate_with(a, config)?;
            let right = evaluate_with(b, config)?;
            Ok(Comparison { left, right: Some(right) })
        }
        _ => Err(DiceError::TooManyExpressions(exprs.len())),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    fn enumerate() -> Config {
        Config::default().with_strategy(Strategy::Enumerate)
    }

    fn convolve() -> Config {
        Config::default().with_strategy(Strategy::Convolve)
    }

    #[test]
    fn one_d6() {
        let e = evaluate("1d6").unwrap();
        let multiset = e.outcomes().as_multiset().unwrap();
        assert_eq!(multiset.as_slice(), &[1, 2, 3, 4, 5, 6]);
        let s = e.statistics();
        assert_eq!((s.min(), s.max()), (1, 6));
        assert_eq!(s.rounded_mean(), 3.5);
        assert_eq!(s.median(), 3.5);
        assert_eq!(s.modes(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(s.rounded_standard_deviation(), 1.71);
    }

    #[test]
    fn two_d6() {
        let e = evaluate("2d6").unwrap();
        assert_eq!(e.outcomes().as_multiset().map(|x| x.len()), Some(36));
        let s = e.statistics();
        assert_eq!((s.min(), s.max()), (2, 12));
        assert_eq!(s.rounded_mean(), 7.0);
        assert_eq!(s.median(), 7.0);
        assert_eq!(s.modes(), &[7]);
        assert_eq!(e.outcomes().count_of(7), BigUint::from(6u32));
        assert_eq!(s.rounded_standard_deviation(), 2.42);
    }

    #[test]
    fn sum_and_difference() {
        let s = evaluate("1d4+1d4-2").unwrap().statistics().clone();
        assert_eq!((s.min(), s.max()), (0, 6));
        assert_eq!(s.mean(), 3.0);
    }

    #[test]
    fn constant_only() {
        let e = evaluate("5").unwrap();
        assert_eq!(e.outcomes().as_multiset().unwrap().as_slice(), &[5]);
        let s = e.statistics();
        assert_eq!((s.min(), s.max(), s.mean(), s.median()), (5, 5, 5.0, 5.0));
        assert_eq!(s.modes(), &[5]);
        assert_eq!(s.standard_deviation(), 0.0);
    }

    #[test]
    fn leading_minus() {
        let s = evaluate("-d4+5").unwrap().statistics().clone();
        assert_eq!((s.min(), s.max()), (1, 4));
        assert_eq!(s.mean(), 2.5);
    }

    #[test]
    fn invalid() {
        for expr in ["2dx", "abc", "", "d0", "2d6+", "3-"] {
            assert!(evaluate(expr).is_err(), "{expr}");
        }
    }

    #[test]
    fn idempotent() {
        let a = evaluate("3d6-d8+2").unwrap();
        let b = evaluate("3d6-d8+2").unwrap();
        assert_eq!(a.statistics(), b.statistics());
        assert_eq!(a, b);
    }

    #[test]
    fn mode_order() {
        // 1d4-1d4 is symmetric with a single peak at 0, adding d2 splits it
        // into a tie between 1 and 2
        let s = evaluate("d4-d4+d2").unwrap().statistics().clone();
        assert_eq!(s.modes(), &[1, 2]);
        let s = evaluate("d3+d3-d3-d3+d2").unwrap().statistics().clone();
        assert_eq!(s.modes(), &[1, 2]);
        // Uniform: every value is a mode, in ascending order
        let s = evaluate("-d6").unwrap().statistics().clone();
        assert_eq!(s.modes(), &[-6, -5, -4, -3, -2, -1]);
    }

    #[test]
    fn auto_switches() {
        let small = Config::default().with_enumeration_threshold(36);
        assert!(matches!(evaluate_with("2d6", &small).unwrap().outcomes(), Outcomes::Enumerated(_)));
        assert!(matches!(evaluate_with("3d6", &small).unwrap().outcomes(), Outcomes::Tabulated(_)));
    }

    #[test]
    fn paths_agree() {
        for expr in ["1d6", "2d6", "1d4+1d4-2", "5", "d4-d4+d2", "3d6-2d4+7", "-2d10-3"] {
            let a = evaluate_with(expr, &enumerate()).unwrap();
            let b = evaluate_with(expr, &convolve()).unwrap();
            assert_eq!(a.statistics(), b.statistics(), "{expr}");
            assert_eq!(a.outcomes().frequencies(), b.outcomes().frequencies(), "{expr}");
        }
    }

    #[test]
    fn paths_agree_random() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for _ in 0..100 {
            let formula = DiceFormula::make_random(&mut rng, 3, 4);
            let a = formula.evaluate(&enumerate()).unwrap();
            let b = formula.evaluate(&convolve()).unwrap();
            assert_eq!(a.statistics(), b.statistics(), "{formula}");
        }
    }

    #[test]
    fn large_expression() {
        // 6^100 outcomes, far too many to enumerate
        let s = evaluate("100d6").unwrap().statistics().clone();
        assert_eq!((s.min(), s.max()), (100, 600));
        assert_eq!(s.mean(), 350.0);
        assert_eq!(s.median(), 350.0);
        assert_eq!(s.modes(), &[350]);
        assert!((s.standard_deviation() - (100.0f64 * 35.0 / 12.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn scale_limits() {
        let tiny = enumerate().with_enumeration_limit(100);
        assert_eq!(
            evaluate_with("2d6+d4", &tiny),
            Err(DiceError::ScaleLimit { size: 144, limit: 100 })
        );
        let narrow = convolve().with_range_limit(10);
        assert_eq!(evaluate_with("2d4", &narrow).map(|e| e.statistics().max()), Ok(8));
        assert_eq!(
            evaluate_with("3d6", &narrow),
            Err(DiceError::ScaleLimit { size: 16, limit: 10 })
        );
        assert!(matches!(evaluate("1000000000d1000000000"), Err(DiceError::ScaleLimit { .. })));
    }

    #[test]
    fn work_limit() {
        // Both ranges are far below `range_limit`, but convolving them would
        // take from seconds to hours
        for expr in ["1000d1000", "150d150", "100d6+1000d1000"] {
            assert!(matches!(evaluate(expr), Err(DiceError::ScaleLimit { .. })), "{expr}");
        }
        // 2d6 is 36 products for the dice and 11 for adding them to 0
        let strict = convolve().with_work_limit(46);
        assert_eq!(evaluate_with("2d6", &strict), Err(DiceError::ScaleLimit { size: 47, limit: 46 }));
        let enough = convolve().with_work_limit(47);
        assert_eq!(evaluate_with("2d6", &enough).map(|e| e.statistics().max()), Ok(12));
        // The limit only applies to frequency tables
        assert!(evaluate_with("2d6", &enumerate().with_work_limit(0)).is_ok());
    }

    #[test]
    fn many_one_sided_dice() {
        for config in [Config::default(), convolve()] {
            let s = evaluate_with("1000000000000d1+2", &config).unwrap().statistics().clone();
            assert_eq!((s.min(), s.max()), (1_000_000_000_002, 1_000_000_000_002));
            assert_eq!(s.modes(), &[1_000_000_000_002]);
            assert_eq!(s.standard_deviation(), 0.0);
        }
    }

    #[test]
    fn comparison() {
        let c = compare("2d6v3d4-1", &Config::default()).unwrap();
        assert_eq!(c.left().formula().to_string(), "2d6");
        assert_eq!(c.right().map(|e| e.formula().to_string()), Some("3d4 - 1".to_string()));
        assert_eq!(c.shared_range(), (2, 12));
        assert_eq!(c.evaluations().count(), 2);

        let single = compare("d20", &Config::default()).unwrap();
        assert!(single.right().is_none());
        assert_eq!(single.shared_range(), (1, 20));

        for input in ["d20v", "d20v  "] {
            let c = compare(input, &Config::default()).unwrap();
            assert!(c.right().is_none(), "{input}");
            assert_eq!(c.left().formula().to_string(), "d20");
        }
    }

    #[test]
    fn comparison_invalid() {
        assert_eq!(compare("d6vd6vd6", &Config::default()), Err(DiceError::TooManyExpressions(3)));
        assert!(compare("d6vabc", &Config::default()).is_err());
        assert!(compare("v", &Config::default()).is_err());
    }
}
