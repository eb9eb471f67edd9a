// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Extract command - write a subset of a log to a new log.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{build_filter, decode_file, encode_tree, Result};
use wpilog_codec::io::write_log;
use wpilog_codec::HarnessConfig;

/// Extract subsets of data from logs.
#[derive(Subcommand, Clone, Debug)]
pub enum ExtractCmd {
    /// Extract specific topics
    Topics {
        /// Input WPILOG file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output WPILOG file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Topics to extract (comma-separated, exact names)
        #[arg(value_name = "TOPICS")]
        topics: Option<String>,

        /// Extract topics under these name prefixes (comma-separated)
        #[arg(long)]
        prefix: Option<String>,

        /// Extract topics matching this regex
        #[arg(long)]
        regex: Option<String>,
    },
}

impl ExtractCmd {
    pub fn run(self, config: &HarnessConfig) -> Result<()> {
        match self {
            ExtractCmd::Topics {
                input,
                output,
                topics,
                prefix,
                regex,
            } => cmd_extract_topics(input, output, topics, prefix, regex, config),
        }
    }
}

/// Cmd: Extract topics
fn cmd_extract_topics(
    input: PathBuf,
    output: PathBuf,
    topics: Option<String>,
    prefix: Option<String>,
    regex: Option<String>,
    config: &HarnessConfig,
) -> Result<()> {
    let filter = build_filter(topics.as_deref(), prefix.as_deref(), regex.as_deref())?;
    if filter.is_all() {
        return Err(anyhow::anyhow!(
            "No topics selected; pass TOPICS, --prefix or --regex"
        ));
    }

    let tree = decode_file(&input, config)?.filtered(&filter);
    if tree.topic_count() == 0 {
        return Err(anyhow::anyhow!(
            "No matching topics found in {}",
            input.display()
        ));
    }

    let topics = tree.topic_count();
    let samples = tree.sample_count();
    let bytes = encode_tree(tree, config)?;
    write_log(&output, &bytes)?;

    println!(
        "Extracted {} topics ({} samples) to {}",
        topics,
        samples,
        output.display()
    );
    Ok(())
}
