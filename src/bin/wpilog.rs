// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # wpilog CLI
//!
//! Command-line tool for WPILOG telemetry logs.
//!
//! ## Usage
//!
//! ```sh
//! # Show file information
//! wpilog inspect info match.wpilog
//!
//! # List declared entries
//! wpilog inspect topics match.wpilog --counts
//!
//! # Dump records
//! wpilog inspect records match.wpilog -n 50
//!
//! # Convert to and from JSON topic trees
//! wpilog export json match.wpilog match.json
//! wpilog import json match.json rebuilt.wpilog
//!
//! # Extract topics
//! wpilog extract topics match.wpilog drive.wpilog --prefix /drive
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `warn`).

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use cmd::{ExportCmd, ExtractCmd, ImportCmd, InspectCmd};
use common::{load_config, Result};
use tracing_subscriber::EnvFilter;

/// wpilog - WPILOG telemetry log toolkit
///
/// Inspect, convert and slice WPILOG files.
#[derive(Parser, Clone)]
#[command(name = "wpilog")]
#[command(about = "WPILOG telemetry log toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Strata Contributors")]
struct Cli {
    /// Task harness configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Inspect file contents (info, topics, records)
    #[command(subcommand)]
    Inspect(InspectCmd),

    /// Export a log to another format (json)
    #[command(subcommand)]
    Export(ExportCmd),

    /// Build a log from another format (json)
    #[command(subcommand)]
    Import(ImportCmd),

    /// Extract subsets of data (by topic)
    #[command(subcommand)]
    Extract(ExtractCmd),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Export(cmd) => cmd.run(&config),
        Commands::Import(cmd) => cmd.run(&config),
        Commands::Extract(cmd) => cmd.run(&config),
    }
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
