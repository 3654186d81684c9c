/// Tetrad version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Depth value meaning "bounded only by adjacency-set size".
pub const UNBOUNDED_DEPTH: i32 = -1;

/// Path length value meaning "no limit" for discriminating and
/// possible-d-sep path searches.
pub const UNBOUNDED_PATH_LENGTH: i32 = -1;

/// Pivot magnitudes below this are treated as singular when inverting
/// covariance submatrices.
pub const SINGULARITY_TOLERANCE: f64 = 1e-10;

/// Environment variable read by [`crate::tracing::init_tracing`].
pub const LOG_ENV_VAR: &str = "TETRAD_LOG";
