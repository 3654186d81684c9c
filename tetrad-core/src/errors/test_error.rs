//! Independence test errors.

use super::error_code::{self, TetradErrorCode};

/// Errors raised by independence tests, either at construction or per query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TestError {
    #[error("variable not known to the test: {name}")]
    UnknownVariable { name: String },

    #[error("invalid independence query: {reason}")]
    InvalidQuery { reason: String },

    #[error("alpha must be in (0, 1], got {alpha}")]
    InvalidAlpha { alpha: f64 },

    #[error("test cannot use this dataset: {reason}")]
    IncompatibleData { reason: String },
}

impl TetradErrorCode for TestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownVariable { .. } => error_code::UNKNOWN_VARIABLE,
            Self::InvalidQuery { .. } => error_code::INVALID_QUERY,
            Self::InvalidAlpha { .. } | Self::IncompatibleData { .. } => {
                error_code::INVALID_ARGUMENT
            }
        }
    }
}
