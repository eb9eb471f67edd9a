// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Export and import commands - convert between WPILOG and JSON topic trees.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

use crate::common::{build_filter, decode_file, encode_tree, Result};
use wpilog_codec::io::write_log;
use wpilog_codec::{HarnessConfig, TopicTree};

/// Export a log to another format.
#[derive(Subcommand, Clone, Debug)]
pub enum ExportCmd {
    /// Decode a log into a JSON topic tree
    Json {
        /// Input WPILOG file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output JSON file (stdout if omitted)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Only export topics matching this regex
        #[arg(long)]
        regex: Option<String>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

/// Import a log from another format.
#[derive(Subcommand, Clone, Debug)]
pub enum ImportCmd {
    /// Encode a JSON topic tree into a log
    Json {
        /// Input JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output WPILOG file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

impl ExportCmd {
    pub fn run(self, config: &HarnessConfig) -> Result<()> {
        match self {
            ExportCmd::Json {
                input,
                output,
                regex,
                pretty,
            } => cmd_export_json(input, output, regex, pretty, config),
        }
    }
}

impl ImportCmd {
    pub fn run(self, config: &HarnessConfig) -> Result<()> {
        match self {
            ImportCmd::Json { input, output } => cmd_import_json(input, output, config),
        }
    }
}

/// Cmd: WPILOG -> JSON
fn cmd_export_json(
    input: PathBuf,
    output: Option<PathBuf>,
    regex: Option<String>,
    pretty: bool,
    config: &HarnessConfig,
) -> Result<()> {
    let filter = build_filter(None, None, regex.as_deref())?;
    let mut tree = decode_file(&input, config)?;
    if !filter.is_all() {
        tree = tree.filtered(&filter);
    }

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            anyhow::anyhow!("Failed to create {}: {e}", path.display())
        })?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &tree)?;
    } else {
        serde_json::to_writer(&mut writer, &tree)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    info!(
        topics = tree.topic_count(),
        samples = tree.sample_count(),
        "exported JSON"
    );
    if let Some(path) = output {
        eprintln!(
            "Exported {} topics ({} samples) to {}",
            tree.topic_count(),
            tree.sample_count(),
            path.display()
        );
    }
    Ok(())
}

/// Cmd: JSON -> WPILOG
fn cmd_import_json(input: PathBuf, output: PathBuf, config: &HarnessConfig) -> Result<()> {
    let file = File::open(&input)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", input.display()))?;
    let tree: TopicTree = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| anyhow::anyhow!("Invalid topic tree JSON in {}: {e}", input.display()))?;

    let topics = tree.topic_count();
    let samples = tree.sample_count();
    let bytes = encode_tree(tree, config)?;
    write_log(&output, &bytes)?;

    println!(
        "Wrote {} topics ({} samples, {} bytes) to {}",
        topics,
        samples,
        bytes.len(),
        output.display()
    );
    Ok(())
}
