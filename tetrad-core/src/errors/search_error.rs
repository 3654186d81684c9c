//! Search errors.

use super::error_code::{self, TetradErrorCode};
use super::{GraphError, TestError};

/// Errors that abort a search. Cancellation is not one of them: a
/// cancelled search returns a partial outcome instead.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("unknown target variable: {name}")]
    UnknownTarget { name: String },

    #[error("invalid depth {depth}: must be -1 (unbounded) or >= 0")]
    InvalidDepth { depth: i32 },

    #[error("unknown algorithm: {name}")]
    UnknownAlgorithm { name: String },

    #[error("search invariant violated: {details}")]
    InvariantViolated { details: String },

    #[error(transparent)]
    Test(#[from] TestError),
}

impl SearchError {
    /// Wrap a graph rejection that a correct search should never trigger.
    pub fn invariant(err: GraphError) -> Self {
        Self::InvariantViolated {
            details: err.to_string(),
        }
    }
}

impl TetradErrorCode for SearchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvariantViolated { .. } => error_code::INVARIANT_VIOLATED,
            Self::Test(e) => e.error_code(),
            _ => error_code::SEARCH_ERROR,
        }
    }
}
