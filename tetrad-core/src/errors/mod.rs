//! Error handling for Tetrad.
//! One error enum per subsystem, `thiserror` only. The aggregate
//! [`TetradError`] converts from each of them.

pub mod config_error;
pub mod data_error;
pub mod error_code;
pub mod graph_error;
pub mod search_error;
pub mod test_error;

pub use config_error::ConfigError;
pub use data_error::DataError;
pub use error_code::TetradErrorCode;
pub use graph_error::GraphError;
pub use search_error::SearchError;
pub use test_error::TestError;

/// Workspace-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum TetradError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("independence test error: {0}")]
    Test(#[from] TestError),

    #[error("search error: {0}")]
    Search(#[from] SearchError),
}

/// Convenience alias used across the workspace.
pub type TetradResult<T> = Result<T, TetradError>;

impl TetradErrorCode for TetradError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Data(e) => e.error_code(),
            Self::Graph(e) => e.error_code(),
            Self::Test(e) => e.error_code(),
            Self::Search(e) => e.error_code(),
        }
    }
}
