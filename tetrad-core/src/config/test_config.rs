use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;
use crate::data::ColumnTyping;

/// Independence test configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Significance level, in (0, 1].
    pub alpha: f64,
    /// Test name: "fisher-z", "chi-square", "g-square" or "cramer-t".
    pub kind: String,
    /// Pivot tolerance used when inverting covariance submatrices.
    pub singularity_tolerance: f64,
    /// Read every data column as categorical. Chi-square and G-square imply
    /// this whether or not it is set.
    pub discrete: bool,
}

impl TestConfig {
    /// Column typing the loader should use for this test.
    pub fn column_typing(&self) -> ColumnTyping {
        if self.discrete || matches!(self.kind.as_str(), "chi-square" | "g-square") {
            ColumnTyping::Discrete
        } else {
            ColumnTyping::Inferred
        }
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            alpha: defaults::DEFAULT_ALPHA,
            kind: defaults::DEFAULT_TEST_KIND.to_string(),
            singularity_tolerance: constants::SINGULARITY_TOLERANCE,
            discrete: false,
        }
    }
}
