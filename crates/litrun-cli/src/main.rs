// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! litrun - literate testing for C++ documentation.

mod cli;
mod commands;
mod compare;
mod output;
mod report;

use clap::Parser;
use litrun_runner::RunnerConfig;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

/// Log to stderr; stdout belongs to the report.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("LITRUN_LOG").unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    output::init();

    match cli.command {
        Commands::Test {
            paths,
            worker,
            precision,
            format,
            fail_fast,
        } => {
            let mut config = RunnerConfig::from_env();
            if let Some(worker) = worker {
                config.worker = worker;
            }
            if let Some(precision) = precision {
                config.args.extend(["--precision".to_string(), precision.to_string()]);
            }
            commands::test::cmd_test(&paths, config, format, fail_fast);
        }
        Commands::Extract { file, format } => commands::extract::cmd_extract(&file, format),
    }
}
