// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "litrun", version)]
#[command(about = "Run the code examples in your documentation", long_about = None)]
pub struct Cli {
    /// Log at debug level unless LITRUN_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every example in the given documents and directories
    Test {
        /// Files or directories to search (default: current directory)
        paths: Vec<PathBuf>,

        /// Worker executable (overrides LITRUN_WORKER)
        #[arg(long)]
        worker: Option<PathBuf>,

        /// Significant digits for floating-point output
        #[arg(long)]
        precision: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,

        /// Stop after the first document with a failure
        #[arg(long)]
        fail_fast: bool,
    },

    /// Show the zones and examples found in one document
    Extract {
        /// Markdown or header file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Human,
    Json,
}
