//! Configuration system for Tetrad.
//! TOML-based, layered resolution: CLI > env > file > defaults.

pub mod defaults;
pub mod observability_config;
pub mod search_config;
pub mod test_config;
pub mod tetrad_config;

pub use observability_config::ObservabilityConfig;
pub use search_config::SearchConfig;
pub use test_config::TestConfig;
pub use tetrad_config::{CliOverrides, TetradConfig};
