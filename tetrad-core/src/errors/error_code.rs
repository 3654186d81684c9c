//! Stable error codes for reporting at the command-line boundary.

/// Every error enum exposes a structured code so callers outside the
/// library (the CLI, log pipelines) can match on something stable.
pub trait TetradErrorCode {
    /// Returns the error code string (e.g., "GRAPH_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const DATA_ERROR: &str = "DATA_ERROR";
pub const GRAPH_ERROR: &str = "GRAPH_ERROR";
pub const CYCLE_DETECTED: &str = "CYCLE_DETECTED";
pub const UNKNOWN_VARIABLE: &str = "UNKNOWN_VARIABLE";
pub const INVALID_QUERY: &str = "INVALID_QUERY";
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const SEARCH_ERROR: &str = "SEARCH_ERROR";
pub const INVARIANT_VIOLATED: &str = "INVARIANT_VIOLATED";
