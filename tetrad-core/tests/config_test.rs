//! Tests for the Tetrad configuration system.

use std::sync::Mutex;

use tetrad_core::config::{CliOverrides, TetradConfig};
use tetrad_core::data::ColumnTyping;
use tetrad_core::errors::ConfigError;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_tetrad_env_vars() {
    for key in [
        "TETRAD_SEARCH_ALGORITHM",
        "TETRAD_SEARCH_DEPTH",
        "TETRAD_SEARCH_MAX_PATH_LENGTH",
        "TETRAD_TEST_ALPHA",
        "TETRAD_LOG_LEVEL",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = TetradConfig::from_toml("").unwrap();

    assert_eq!(config.search.algorithm, "pc");
    assert_eq!(config.search.depth, -1);
    assert_eq!(config.search.max_path_length, -1);
    assert!(config.search.complete_rule_set);
    assert!(!config.search.conservative);
    assert!(config.search.possible_dsep);
    assert_eq!(config.search.timeout_secs, None);

    assert_eq!(config.test.alpha, 0.05);
    assert_eq!(config.test.kind, "fisher-z");

    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[search]
algorithm = "fci"
depth = 3

[test]
alpha = 0.01
"#;
    let config = TetradConfig::from_toml(toml).unwrap();
    assert_eq!(config.search.algorithm, "fci");
    assert_eq!(config.search.depth, 3);
    assert_eq!(config.test.alpha, 0.01);
    // Non-overridden fields keep defaults.
    assert_eq!(config.test.kind, "fisher-z");
    assert!(config.search.complete_rule_set);
}

#[test]
fn config_roundtrips_through_toml() {
    let mut config = TetradConfig::default();
    config.search.depth = 2;
    config.search.timeout_secs = Some(30);
    let text = config.to_toml().unwrap();
    let back = TetradConfig::from_toml(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn discrete_tests_read_columns_as_categories() {
    let config = TetradConfig::from_toml("").unwrap();
    assert!(!config.test.discrete);
    assert_eq!(config.test.column_typing(), ColumnTyping::Inferred);

    let config = TetradConfig::from_toml("[test]\nkind = \"g-square\"").unwrap();
    assert_eq!(config.test.column_typing(), ColumnTyping::Discrete);

    let config = TetradConfig::from_toml("[test]\ndiscrete = true").unwrap();
    assert_eq!(config.test.kind, "fisher-z");
    assert_eq!(config.test.column_typing(), ColumnTyping::Discrete);
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = TetradConfig::from_toml("[search\ndepth = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn alpha_outside_unit_interval_fails_validation() {
    for alpha in [0.0, -0.1, 1.5, f64::NAN] {
        let mut config = TetradConfig::default();
        config.test.alpha = alpha;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "test.alpha"),
            "alpha {alpha} should be rejected"
        );
    }
    let mut config = TetradConfig::default();
    config.test.alpha = 1.0;
    assert!(config.validate().is_ok());
}

#[test]
fn depth_below_minus_one_fails_validation() {
    let mut config = TetradConfig::default();
    config.search.depth = -2;
    assert!(config.validate().is_err());
}

#[test]
fn unknown_algorithm_fails_validation() {
    let mut config = TetradConfig::default();
    config.search.algorithm = "ges".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn layered_resolution_cli_over_env_over_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_tetrad_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tetrad.toml");
    std::fs::write(
        &path,
        r#"
[search]
depth = 2
max_path_length = 5

[test]
alpha = 0.2
"#,
    )
    .unwrap();

    std::env::set_var("TETRAD_SEARCH_DEPTH", "4");
    std::env::set_var("TETRAD_TEST_ALPHA", "0.1");

    let cli = CliOverrides {
        alpha: Some(0.01),
        ..Default::default()
    };
    let config = TetradConfig::load(Some(&path), Some(&cli)).unwrap();

    // CLI beats env and file.
    assert_eq!(config.test.alpha, 0.01);
    // Env beats file.
    assert_eq!(config.search.depth, 4);
    // File beats defaults.
    assert_eq!(config.search.max_path_length, 5);

    clear_tetrad_env_vars();
}

#[test]
fn load_without_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_tetrad_env_vars();

    let config = TetradConfig::load(None, None).unwrap();
    assert_eq!(config, TetradConfig::default());
}

#[test]
fn load_with_missing_file_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_tetrad_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    let err = TetradConfig::load(Some(&dir.path().join("absent.toml")), None).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}
