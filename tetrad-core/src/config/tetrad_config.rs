//! Top-level Tetrad configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ObservabilityConfig, SearchConfig, TestConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `CliOverrides`)
/// 2. Environment variables (`TETRAD_*`)
/// 3. Config file (`tetrad.toml` or an explicit path)
/// 4. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TetradConfig {
    pub search: SearchConfig,
    pub test: TestConfig,
    pub observability: ObservabilityConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub algorithm: Option<String>,
    pub depth: Option<i32>,
    pub alpha: Option<f64>,
    pub test_kind: Option<String>,
    pub max_path_length: Option<i32>,
    pub discrete: Option<bool>,
}

impl TetradConfig {
    /// Load configuration with layered resolution.
    ///
    /// A missing `path` falls back to compiled defaults; a path that is given
    /// but does not exist is an error.
    pub fn load(path: Option<&Path>, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Read and parse a TOML file. Unknown keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.test.alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::ValidationFailed {
                field: "test.alpha".to_string(),
                message: format!("must be in (0, 1], got {alpha}"),
            });
        }
        if self.search.depth < -1 {
            return Err(ConfigError::ValidationFailed {
                field: "search.depth".to_string(),
                message: "must be -1 (unbounded) or >= 0".to_string(),
            });
        }
        if self.search.max_path_length < -1 {
            return Err(ConfigError::ValidationFailed {
                field: "search.max_path_length".to_string(),
                message: "must be -1 (unbounded) or >= 0".to_string(),
            });
        }
        if !matches!(self.search.algorithm.as_str(), "pc" | "fci") {
            return Err(ConfigError::ValidationFailed {
                field: "search.algorithm".to_string(),
                message: format!("unknown algorithm '{}'", self.search.algorithm),
            });
        }
        if !matches!(
            self.test.kind.as_str(),
            "fisher-z" | "chi-square" | "g-square" | "cramer-t"
        ) {
            return Err(ConfigError::ValidationFailed {
                field: "test.kind".to_string(),
                message: format!("unknown test '{}'", self.test.kind),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `TETRAD_SEARCH_DEPTH`, `TETRAD_TEST_ALPHA`, etc.
    fn apply_env_overrides(config: &mut TetradConfig) {
        if let Ok(val) = std::env::var("TETRAD_SEARCH_ALGORITHM") {
            config.search.algorithm = val;
        }
        if let Ok(val) = std::env::var("TETRAD_SEARCH_DEPTH") {
            if let Ok(v) = val.parse::<i32>() {
                config.search.depth = v;
            }
        }
        if let Ok(val) = std::env::var("TETRAD_SEARCH_MAX_PATH_LENGTH") {
            if let Ok(v) = val.parse::<i32>() {
                config.search.max_path_length = v;
            }
        }
        if let Ok(val) = std::env::var("TETRAD_TEST_ALPHA") {
            if let Ok(v) = val.parse::<f64>() {
                config.test.alpha = v;
            }
        }
        if let Ok(val) = std::env::var("TETRAD_LOG_LEVEL") {
            config.observability.log_level = val;
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut TetradConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.algorithm {
            config.search.algorithm = v.clone();
        }
        if let Some(v) = cli.depth {
            config.search.depth = v;
        }
        if let Some(v) = cli.alpha {
            config.test.alpha = v;
        }
        if let Some(ref v) = cli.test_kind {
            config.test.kind = v.clone();
        }
        if let Some(v) = cli.max_path_length {
            config.search.max_path_length = v;
        }
        if let Some(v) = cli.discrete {
            config.test.discrete = v;
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
