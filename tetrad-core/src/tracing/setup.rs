//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize logging with default settings.
///
/// Reads the `TETRAD_LOG` environment variable for per-module log levels.
/// Format: `TETRAD_LOG=tetrad_search=debug,tetrad_graph=warn`
///
/// Falls back to `tetrad=info` if `TETRAD_LOG` is not set or is invalid.
/// Calling it more than once is harmless.
pub fn init_tracing() {
    init_tracing_with(&ObservabilityConfig::default());
}

/// Initialize logging from an [`ObservabilityConfig`]. `TETRAD_LOG` still
/// wins over the configured level when present.
pub fn init_tracing_with(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let fallback = format!(
            "tetrad={level},tetrad_core={level},tetrad_graph={level},tetrad_search={level}",
            level = config.log_level
        );
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback));

        if config.json {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_target(true))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
        }
    });
}
