// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::io::IsTerminal as _;
use std::path::Path;

use wpilog_codec::io::detection::{detect_format, FileFormat};
use wpilog_codec::task::{spawn, HarnessConfig, TaskCommand};
use wpilog_codec::{LogValue, TopicFilter, TopicTree};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Resolution of the progress bar.
const PROGRESS_STEPS: u64 = 1000;

/// Format a duration in microseconds to a human-readable string.
pub fn format_duration(micros: u64) -> String {
    let secs = micros / 1_000_000;
    let millis = (micros % 1_000_000) / 1_000;

    if secs >= 3600 {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        format!("{}h {}m", hours, minutes)
    } else if secs >= 60 {
        let minutes = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}m {}s", minutes, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

/// Format a log timestamp (microseconds since log start) as seconds.
pub fn format_timestamp(micros: u64) -> String {
    format!("{}.{:06}s", micros / 1_000_000, micros % 1_000_000)
}

/// Render a sample value on one line. Raw bytes are shown as hex.
pub fn format_value(value: &LogValue) -> String {
    match value {
        LogValue::Boolean(v) => v.to_string(),
        LogValue::Int(v) => v.to_string(),
        LogValue::Float(v) => v.to_string(),
        LogValue::Double(v) => v.to_string(),
        LogValue::String(v) => format!("{v:?}"),
        LogValue::BooleanArray(v) => format!("{v:?}"),
        LogValue::IntArray(v) => format!("{v:?}"),
        LogValue::FloatArray(v) => format!("{v:?}"),
        LogValue::DoubleArray(v) => format!("{v:?}"),
        LogValue::StringArray(v) => format!("{v:?}"),
        LogValue::Raw(v) => format!("0x{}", hex::encode(v)),
    }
}

/// Split a comma-separated topic list, dropping blanks.
pub fn parse_topic_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Build a topic filter from CLI arguments.
///
/// `pattern` is a regex; `prefixes` and `topics` are comma-separated lists.
/// At most one may be given; none keeps everything.
pub fn build_filter(
    topics: Option<&str>,
    prefixes: Option<&str>,
    pattern: Option<&str>,
) -> Result<TopicFilter> {
    match (topics, prefixes, pattern) {
        (None, None, None) => Ok(TopicFilter::All),
        (Some(t), None, None) => Ok(TopicFilter::include(parse_topic_list(t))),
        (None, Some(p), None) => Ok(TopicFilter::prefix(parse_topic_list(p))),
        (None, None, Some(re)) => TopicFilter::regex_include(re)
            .map_err(|e| anyhow::anyhow!("Invalid topic pattern '{re}': {e}")),
        _ => Err(anyhow::anyhow!(
            "Only one of topics, --prefix or --regex may be given"
        )),
    }
}

/// Load the harness configuration, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<HarnessConfig> {
    match path {
        Some(path) => Ok(HarnessConfig::from_file(path)?),
        None => Ok(HarnessConfig::default()),
    }
}

/// Fail unless `path` holds a WPILOG file.
pub fn require_wpilog(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", path.display()));
    }
    if wpilog_codec::io::is_wpilog_file(path) {
        return Ok(());
    }
    match detect_format(path)? {
        FileFormat::Json => Err(anyhow::anyhow!(
            "{} looks like a JSON export; convert it with `wpilog import json` first",
            path.display()
        )),
        _ => Err(anyhow::anyhow!(
            "Not a WPILOG v1.0 file: {}",
            path.display()
        )),
    }
}

/// Decode a log file into a topic tree on the task harness.
pub fn decode_file(path: &Path, config: &HarnessConfig) -> Result<TopicTree> {
    require_wpilog(path)?;
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;

    let pb = ProgressBar::new("Decoding");
    let handle = spawn(TaskCommand::Decode(bytes), config.clone())?;
    let output = handle.wait(|p| pb.set_fraction(p))?;
    pb.finish_with_message("decoded".to_string());

    output
        .into_tree()
        .ok_or_else(|| anyhow::anyhow!("Decode task returned no topic tree"))
}

/// Encode a topic tree on the task harness.
pub fn encode_tree(tree: TopicTree, config: &HarnessConfig) -> Result<Vec<u8>> {
    let pb = ProgressBar::new("Encoding");
    let handle = spawn(TaskCommand::Encode(tree), config.clone())?;
    let output = handle.wait(|p| pb.set_fraction(p))?;
    pb.finish_with_message("encoded".to_string());

    output
        .into_bytes()
        .ok_or_else(|| anyhow::anyhow!("Encode task returned no buffer"))
}

/// Progress bar wrapper for consistent progress reporting.
///
/// Draws only when stderr is a terminal.
pub struct ProgressBar {
    inner: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a new fractional progress bar.
    pub fn new(prefix: impl Into<String>) -> Self {
        let inner = if std::io::stderr().is_terminal() {
            let pb = indicatif::ProgressBar::new(PROGRESS_STEPS);
            if let Ok(style) = indicatif::ProgressStyle::default_bar()
                .template("{prefix:>10} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent}% {msg}")
            {
                pb.set_style(style.progress_chars("=>-"));
            }
            pb.set_prefix(prefix.into());
            Some(pb)
        } else {
            None
        };

        Self { inner }
    }

    /// Set progress as a fraction in `[0, 1]`.
    pub fn set_fraction(&self, fraction: f64) {
        if let Some(pb) = &self.inner {
            pb.set_position((fraction.clamp(0.0, 1.0) * PROGRESS_STEPS as f64) as u64);
        }
    }

    /// Finish the progress bar with a message.
    pub fn finish_with_message(&self, msg: String) {
        if let Some(pb) = &self.inner {
            pb.finish_with_message(msg);
        }
    }
}
