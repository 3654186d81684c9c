//! # tetrad-core
//!
//! Foundation crate for Tetrad causal search.
//! Defines nodes, datasets, errors, config, cancellation, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod context;
pub mod data;
pub mod errors;
pub mod models;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::TetradConfig;
pub use context::{CancellationToken, RunContext, SearchOutcome, SearchStatus};
pub use data::{DataSet, Variable, VariableKind};
pub use errors::{TetradError, TetradResult};
pub use models::{Node, NodeType};
