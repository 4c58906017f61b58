//! Exact outcome distributions for dice expressions.
//!
//! An expression such as `2d6+d4-3` is parsed into a [`DiceFormula`] and then
//! evaluated into every possible outcome, each combination of die faces
//! counted once. The result is summarised as [`Statistics`]: minimum, maximum,
//! mean, median, modes and population standard deviation.
//!
//! ```
//! use dicestats::evaluate;
//!
//! let result = evaluate("2d6").unwrap();
//! let stats = result.statistics();
//! assert_eq!((stats.min(), stats.max()), (2, 12));
//! assert_eq!(stats.modes(), &[7]);
//! assert_eq!(format!("{:.2}", stats.standard_deviation()), "2.42");
//! ```
//!
//! Small expressions are evaluated by enumerating every outcome
//! ([`generate_outcomes`]), larger ones by convolving frequency tables
//! ([`dist::DenseDist`]). Which one is used is decided by [`Config`]; the
//! statistics don't depend on it.

pub mod dices;
pub mod dist;
mod error;
mod evaluate;
mod outcomes;
pub mod report;
mod stats;

pub use dices::{DiceFormula, DiceTerm, Operator, Part, Segment};
pub use error::DiceError;
pub use evaluate::{Comparison, Config, Evaluation, Outcomes, Strategy, compare, evaluate, evaluate_with};
pub use outcomes::{OutcomeMultiset, generate_outcomes};
pub use stats::Statistics;
