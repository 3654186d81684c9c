//! Command-line driver: load a dataset, build the configured independence
//! test, run PC or FCI, and render the resulting graph.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use tetrad_core::config::CliOverrides;
use tetrad_core::errors::{SearchError, TetradErrorCode};
use tetrad_core::{DataSet, RunContext, SearchStatus, TetradConfig};
use tetrad_search::independence::build_test;
use tetrad_search::{Fci, GraphSearch, IndependenceTest, Pc};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tetrad")]
#[command(version)]
#[command(about = "Causal structure search over tabular data")]
pub struct Args {
    /// Delimited data file with a header line (tab, comma or whitespace)
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,

    /// Search algorithm: pc or fci
    #[arg(short, long, value_name = "NAME")]
    pub algorithm: Option<String>,

    /// Maximum conditioning-set size (-1 for unbounded)
    #[arg(short, long, allow_negative_numbers = true)]
    pub depth: Option<i32>,

    /// Significance level for the independence test
    #[arg(short, long, value_name = "ALPHA")]
    pub significance: Option<f64>,

    /// Independence test: fisher-z, chi-square, g-square or cramer-t
    #[arg(short, long, value_name = "KIND")]
    pub test: Option<String>,

    /// Read every data column as categorical (integer-coded discrete data)
    #[arg(long)]
    pub discrete: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            algorithm: self.algorithm.clone(),
            depth: self.depth,
            alpha: self.significance,
            test_kind: self.test.clone(),
            max_path_length: None,
            discrete: self.discrete.then_some(true),
        }
    }
}

/// Resolve the configuration: flags over environment over file over defaults.
pub fn load_config(args: &Args) -> anyhow::Result<TetradConfig> {
    TetradConfig::load(args.config.as_deref(), Some(&args.overrides()))
        .map_err(|e| anyhow!(e.coded_string()))
        .context("loading configuration")
}

/// Run the configured search over `data_path` and render the result.
pub fn execute(config: &TetradConfig, data_path: &Path) -> anyhow::Result<String> {
    let data = DataSet::from_path_with(data_path, config.test.column_typing())
        .map_err(|e| anyhow!(e.coded_string()))
        .with_context(|| format!("reading {}", data_path.display()))?;
    let test = build_test(&data, &config.test)
        .map_err(|e| anyhow!(e.coded_string()))
        .context("building independence test")?;
    info!(
        test = test.name(),
        variables = data.num_columns(),
        rows = data.num_rows(),
        "loaded dataset"
    );

    let mut ctx = RunContext::new();
    if let Some(secs) = config.search.timeout_secs {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    let search = searcher(config, test.as_ref())?;
    let outcome = search
        .search(&ctx)
        .map_err(|e| anyhow!(e.coded_string()))
        .with_context(|| format!("running {}", search.algorithm_name()))?;

    let mut out = format!("{} ({})\n", search.algorithm_name(), test.name());
    match outcome.status {
        SearchStatus::Complete => {}
        SearchStatus::Cancelled => out.push_str("Search cancelled; graph is partial.\n"),
        SearchStatus::TimedOut => out.push_str("Search timed out; graph is partial.\n"),
    }
    out.push('\n');
    out.push_str(&outcome.data.graph.to_string());
    Ok(out)
}

fn searcher<'a>(config: &TetradConfig, test: &'a dyn IndependenceTest) -> anyhow::Result<Box<dyn GraphSearch + 'a>> {
    let search = &config.search;
    match search.algorithm.as_str() {
        "pc" => Ok(Box::new(
            Pc::new(test)
                .with_depth(search.depth)
                .conservative(search.conservative),
        )),
        "fci" => Ok(Box::new(
            Fci::new(test)
                .with_depth(search.depth)
                .with_max_path_length(search.max_path_length)
                .with_complete_rule_set(search.complete_rule_set)
                .with_possible_dsep(search.possible_dsep)
                .conservative(search.conservative),
        )),
        other => Err(anyhow!(SearchError::UnknownAlgorithm {
            name: other.to_string(),
        }
        .coded_string())),
    }
}
