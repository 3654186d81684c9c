use serde::{Deserialize, Serialize};

use super::defaults;

/// Search subsystem configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Algorithm name: "pc" or "fci".
    pub algorithm: String,
    /// Maximum conditioning-set size, -1 for unbounded.
    pub depth: i32,
    /// Maximum path length for discriminating / possible-d-sep paths, -1 for unbounded.
    pub max_path_length: i32,
    /// Apply Zhang's arrowhead-to-tail rules (R8-R10) in FCI.
    pub complete_rule_set: bool,
    /// Decide colliders conservatively (CPC-style) instead of from recorded sepsets.
    pub conservative: bool,
    /// Run FCI's possible-d-sep edge removal step.
    pub possible_dsep: bool,
    /// Wall-clock budget in seconds; unset means no deadline.
    pub timeout_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: defaults::DEFAULT_ALGORITHM.to_string(),
            depth: defaults::DEFAULT_DEPTH,
            max_path_length: defaults::DEFAULT_MAX_PATH_LENGTH,
            complete_rule_set: defaults::DEFAULT_COMPLETE_RULE_SET,
            conservative: defaults::DEFAULT_CONSERVATIVE,
            possible_dsep: defaults::DEFAULT_POSSIBLE_DSEP,
            timeout_secs: None,
        }
    }
}
