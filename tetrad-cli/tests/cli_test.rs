//! End-to-end tests for the command-line driver.

use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;
use tetrad_cli::{execute, load_config, Args};

/// `A --> C <-- B` driven by two unrelated sawtooth inputs.
fn collider_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "A,B,C").unwrap();
    for i in 0..400u32 {
        let a = ((i * 37) % 101) as f64 / 101.0 - 0.5;
        let b = ((i * 53) % 97) as f64 / 97.0 - 0.5;
        let noise = ((i * 11) % 13) as f64 / 130.0;
        writeln!(file, "{a},{b},{}", a + b + noise).unwrap();
    }
    file.flush().unwrap();
    file
}

fn parse_args(data: &NamedTempFile, extra: &[&str]) -> Args {
    let path = data.path().to_string_lossy().to_string();
    let mut argv = vec!["tetrad", "--data", path.as_str()];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn flags_override_defaults() {
    let data = collider_csv();
    let args = parse_args(&data, &["--algorithm", "fci", "--depth", "-1", "--significance", "0.01"]);
    let config = load_config(&args).unwrap();
    assert_eq!(config.search.algorithm, "fci");
    assert_eq!(config.search.depth, -1);
    assert_eq!(config.test.alpha, 0.01);
}

#[test]
fn config_file_is_layered_under_flags() {
    let data = collider_csv();
    let mut toml = NamedTempFile::new().unwrap();
    writeln!(toml, "[search]\nalgorithm = \"fci\"\ndepth = 2\n\n[test]\nalpha = 0.2").unwrap();
    toml.flush().unwrap();
    let path = toml.path().to_string_lossy().to_string();

    let args = parse_args(&data, &["--config", path.as_str(), "--depth", "1"]);
    let config = load_config(&args).unwrap();
    assert_eq!(config.search.algorithm, "fci");
    assert_eq!(config.search.depth, 1);
    assert_eq!(config.test.alpha, 0.2);
}

#[test]
fn invalid_flags_are_reported_with_codes() {
    let data = collider_csv();
    let err = load_config(&parse_args(&data, &["--significance", "2.0"])).unwrap_err();
    assert!(format!("{err:#}").contains("CONFIG_ERROR"));

    let err = load_config(&parse_args(&data, &["--algorithm", "ges"])).unwrap_err();
    assert!(format!("{err:#}").contains("search.algorithm"));
}

#[test]
fn pc_prints_graph() {
    let data = collider_csv();
    let args = parse_args(&data, &["--algorithm", "pc", "--significance", "0.01"]);
    let config = load_config(&args).unwrap();
    let output = execute(&config, &args.data).unwrap();
    assert!(output.starts_with("PC (Fisher Z)"));
    assert!(output.contains("Graph Nodes:\nA;B;C"));
    assert!(output.contains("Graph Edges:"));
}

#[test]
fn missing_data_file_is_an_error() {
    let data = collider_csv();
    let mut args = parse_args(&data, &[]);
    args.data = data.path().with_extension("missing");
    let config = load_config(&args).unwrap();
    let err = execute(&config, &args.data).unwrap_err();
    assert!(format!("{err:#}").contains("reading"));
}

#[test]
fn discrete_data_needs_discrete_test() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "X\tY").unwrap();
    for i in 0..30 {
        writeln!(file, "{}\t{}", if i % 2 == 0 { "lo" } else { "hi" }, if i % 3 == 0 { "a" } else { "b" }).unwrap();
    }
    file.flush().unwrap();

    let args = parse_args(&file, &["--test", "chi-square"]);
    let config = load_config(&args).unwrap();
    let output = execute(&config, &args.data).unwrap();
    assert!(output.starts_with("PC (Chi Square)"));

    let args = parse_args(&file, &["--test", "fisher-z"]);
    let config = load_config(&args).unwrap();
    assert!(execute(&config, &args.data).is_err());
}

/// `X` and `Y` are 0/1/2 codes with `Y` copying `X` two times in three.
fn coded_discrete_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "X,Y,Z").unwrap();
    for i in 0..300u32 {
        let x = i % 3;
        let y = if i % 9 < 6 { x } else { (x + 1) % 3 };
        let z = (i / 3) % 2;
        writeln!(file, "{x},{y},{z}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn integer_coded_columns_reach_discrete_tests() {
    let file = coded_discrete_csv();
    let args = parse_args(&file, &["--test", "g-square"]);
    let config = load_config(&args).unwrap();
    let output = execute(&config, &args.data).unwrap();
    assert!(output.starts_with("PC (G Square)"));
    assert!(output.contains("X --- Y"));
}

#[test]
fn discrete_flag_sets_column_typing() {
    let file = coded_discrete_csv();
    let args = parse_args(&file, &["--discrete"]);
    let config = load_config(&args).unwrap();
    assert!(config.test.discrete);
    // Fisher Z cannot run on categorical columns.
    assert!(execute(&config, &args.data).is_err());
}
