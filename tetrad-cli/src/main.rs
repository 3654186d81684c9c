use std::process;

use clap::Parser;
use tetrad_cli::{execute, load_config, Args};
use tetrad_core::tracing::init_tracing_with;

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        }
    };
    init_tracing_with(&config.observability);

    match execute(&config, &args.data) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
