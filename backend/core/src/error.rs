use thiserror::Error;

/// Errors reported by the catch-up calculation.
///
/// Every variant is terminal for the call that produced it: no partial list
/// of missed runs accompanies an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatchupError {
    #[error("unparseable schedule: {expression} : {message}")]
    InvalidScheduleExpression { expression: String, message: String },

    #[error(
        "too many missed start times (> {limit}). Set or decrease .spec.startingDeadlineSeconds or check clock skew"
    )]
    TooManyMissedRuns { limit: usize },

    #[error("invalid job descriptor: {0}")]
    Descriptor(String),
}

impl CatchupError {
    pub fn invalid_schedule(expression: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidScheduleExpression {
            expression: expression.into(),
            message: message.to_string(),
        }
    }
}
