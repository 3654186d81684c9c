// Single source of truth for all default values.

// --- Search ---
pub const DEFAULT_DEPTH: i32 = -1;
pub const DEFAULT_MAX_PATH_LENGTH: i32 = -1;
pub const DEFAULT_ALGORITHM: &str = "pc";
pub const DEFAULT_COMPLETE_RULE_SET: bool = true;
pub const DEFAULT_CONSERVATIVE: bool = false;
pub const DEFAULT_POSSIBLE_DSEP: bool = true;

// --- Independence tests ---
pub const DEFAULT_ALPHA: f64 = 0.05;
pub const DEFAULT_TEST_KIND: &str = "fisher-z";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
