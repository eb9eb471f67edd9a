// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - show file information, entries and records.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::common::{format_duration, format_timestamp, format_value, require_wpilog, Result};
use wpilog_codec::io::formats::wpilog::ControlType;
use wpilog_codec::{RecordView, TypeTag, WpilogReader};

/// Inspect file contents.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Show header information and a summary
    Info {
        /// Input WPILOG file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List declared entries
    Topics {
        /// Input WPILOG file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only show entries whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Show record counts and time ranges
        #[arg(long)]
        counts: bool,
    },

    /// Dump records with their decoded values
    Records {
        /// Input WPILOG file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum number of records to print
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Only print records for this entry id
        #[arg(short, long)]
        entry: Option<u32>,

        /// Skip control records
        #[arg(long)]
        data_only: bool,
    },
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        match self {
            InspectCmd::Info { input } => cmd_info(input),
            InspectCmd::Topics {
                input,
                filter,
                counts,
            } => cmd_topics(input, filter, counts),
            InspectCmd::Records {
                input,
                limit,
                entry,
                data_only,
            } => cmd_records(input, limit, entry, data_only),
        }
    }
}

fn open(input: &Path) -> Result<WpilogReader> {
    require_wpilog(input)?;
    Ok(WpilogReader::open(input)?)
}

/// Cmd: Show file info
fn cmd_info(input: PathBuf) -> Result<()> {
    let reader = open(&input)?;
    let version = reader.version();

    println!("=== {} ===", input.display());
    println!("Version: {}.{}", version >> 8, version & 0xff);
    if !reader.extra_header().is_empty() {
        println!("Extra header: {}", reader.extra_header());
    }
    println!("Size: {} bytes", reader.file_size());
    println!("Records: {}", reader.record_count());
    println!("Entries: {}", reader.entries().len());

    if let (Some(start), Some(end)) = (reader.start_time(), reader.end_time()) {
        println!("Start: {}", format_timestamp(start));
        println!("End: {}", format_timestamp(end));
        println!("Duration: {}", format_duration(end - start));
    }

    let unframed = reader.file_size() - reader.framed_len() as u64;
    if unframed > 0 {
        println!("Unframed trailing bytes: {unframed}");
    }

    Ok(())
}

/// Cmd: List entries
fn cmd_topics(input: PathBuf, filter: Option<String>, show_counts: bool) -> Result<()> {
    let reader = open(&input)?;

    println!("=== Entries in {} ===", input.display());
    println!();

    for entry in reader.entries() {
        if let Some(ref pattern) = filter {
            if !entry.name.to_lowercase().contains(&pattern.to_lowercase()) {
                continue;
            }
        }

        println!("[{}] {}", entry.id, entry.name);
        println!("  Type: {}", entry.type_name);
        if !entry.metadata.is_empty() {
            println!("  Metadata: {}", entry.metadata);
        }
        if show_counts {
            println!("  Records: {}", entry.record_count);
            if let (Some(first), Some(last)) = (entry.first_timestamp, entry.last_timestamp) {
                println!(
                    "  Range: {} .. {}",
                    format_timestamp(first),
                    format_timestamp(last)
                );
            }
            if entry.finished {
                println!("  Finished");
            }
        }
        println!();
    }

    Ok(())
}

/// Cmd: Dump records
fn cmd_records(
    input: PathBuf,
    limit: Option<usize>,
    entry_filter: Option<u32>,
    data_only: bool,
) -> Result<()> {
    let reader = open(&input)?;
    let mut types: HashMap<u32, TypeTag> = HashMap::new();
    let mut printed = 0usize;

    for (record, view) in reader.records().iter().zip(reader.views()) {
        if limit.is_some_and(|n| printed >= n) {
            break;
        }

        // track declarations even for records that are not printed
        if let Ok(start) = view.start_data() {
            types.insert(start.entry, start.type_tag());
        }

        let shown = if view.is_control() {
            !data_only && entry_filter.map_or(true, |id| control_target(&view) == Some(id))
        } else {
            entry_filter.map_or(true, |id| view.entry() == id)
        };
        if !shown {
            continue;
        }

        println!(
            "@{:<10} {:>14} entry={:<5} {}",
            record.offset,
            format_timestamp(view.timestamp()),
            view.entry(),
            describe(&view, &types)
        );
        printed += 1;
    }

    Ok(())
}

fn control_target(view: &RecordView<'_>) -> Option<u32> {
    match view.control_type()? {
        ControlType::Start => view.start_data().ok().map(|s| s.entry),
        ControlType::Finish => view.finish_entry().ok(),
        ControlType::SetMetadata => view.set_metadata_data().ok().map(|m| m.entry),
    }
}

fn describe(view: &RecordView<'_>, types: &HashMap<u32, TypeTag>) -> String {
    if view.is_control() {
        return match view.control_type() {
            Some(ControlType::Start) => match view.start_data() {
                Ok(s) => format!(
                    "start id={} name={:?} type={:?} metadata={:?}",
                    s.entry, s.name, s.type_name, s.metadata
                ),
                Err(e) => format!("start (malformed: {e})"),
            },
            Some(ControlType::Finish) => match view.finish_entry() {
                Ok(id) => format!("finish id={id}"),
                Err(e) => format!("finish (malformed: {e})"),
            },
            Some(ControlType::SetMetadata) => match view.set_metadata_data() {
                Ok(m) => format!("set-metadata id={} metadata={:?}", m.entry, m.metadata),
                Err(e) => format!("set-metadata (malformed: {e})"),
            },
            None => format!("control (unknown) 0x{}", hex::encode(view.payload())),
        };
    }

    match types.get(&view.entry()) {
        Some(&tag) => match view.get_value(tag) {
            Some(value) => format_value(&value),
            None => format!(
                "<{} bytes, not a {}> 0x{}",
                view.size(),
                tag.wire_name(),
                hex::encode(view.payload())
            ),
        },
        None => format!("<unregistered> 0x{}", hex::encode(view.payload())),
    }
}
