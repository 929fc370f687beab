// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! litrun-worker - executes example code on behalf of `litrun`.
//!
//! Requests arrive on stdin and responses leave on stdout, one JSON object
//! per line. Logs go to stderr. The process exits cleanly when stdin
//! closes.

use std::io;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use litrun_protocol::RequestBuilder;
use litrun_worker::{CalcEngine, Worker};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EngineKind {
    /// Built-in reference engine
    Calc,
}

#[derive(Parser)]
#[command(name = "litrun-worker", version)]
#[command(about = "Execute litrun examples over stdin/stdout", long_about = None)]
struct Args {
    /// Execution engine
    #[arg(long, value_enum, default_value_t = EngineKind::Calc)]
    engine: EngineKind,

    /// Significant digits for floating-point output
    #[arg(long, default_value_t = 6)]
    precision: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("LITRUN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let builder = RequestBuilder::with_precision(args.precision);
    let mut worker = match args.engine {
        EngineKind::Calc => Worker::with_builder(CalcEngine::new(), builder),
    };

    let mut reader = io::stdin().lock();
    let mut writer = io::stdout().lock();
    match worker.serve(&mut reader, &mut writer) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "worker stopped");
            ExitCode::FAILURE
        }
    }
}
