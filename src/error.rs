/// Reasons a dice expression can't be evaluated.
///
/// Evaluation never produces partial statistics: any of these errors means
/// the whole expression is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("Empty dice expression")]
    Empty,

    #[error("Invalid segment {segment:?} at position {position}")]
    InvalidSegment { segment: String, position: usize },

    #[error("Invalid dice term {count}d{sides}, both count and sides must be at least 1")]
    InvalidTerm { count: usize, sides: usize },

    // `size` saturates at `u128::MAX`
    #[error("Expression too large: size {size} exceeds the limit of {limit}")]
    ScaleLimit { size: u128, limit: u128 },

    #[error("Expected at most two expressions to compare, got {0}")]
    TooManyExpressions(usize),
}

impl DiceError {
    pub(crate) fn scale_limit<A: TryInto<u128>, B: TryInto<u128>>(size: A, limit: B) -> Self {
        DiceError::ScaleLimit {
            size: size.try_into().unwrap_or(u128::MAX),
            limit: limit.try_into().unwrap_or(u128::MAX),
        }
    }

    /// The values of the expression don't fit in an [`isize`].
    pub(crate) fn overflow() -> Self {
        DiceError::scale_limit(u128::MAX, isize::MAX as u128)
    }

    /// Returns true if the error comes from the text of the expression, rather
    /// than from the size of its dice.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            DiceError::Empty | DiceError::InvalidSegment { .. } | DiceError::TooManyExpressions(_)
        )
    }
}
