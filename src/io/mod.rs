// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for WPILOG files.
//!
//! This module provides the byte ownership, format detection, entry metadata
//! and topic filtering shared by the format implementation and the CLI.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::CodecError;

pub mod arena;
pub mod detection;
pub mod formats;
pub mod metadata;

// Re-exports
pub use arena::LogArena;
pub use detection::{detect_format, is_wpilog_file, FileFormat};
pub use metadata::EntryInfo;

// Filter for topic selection
pub mod filter;
pub use filter::TopicFilter;

// WPILOG reader
pub use formats::wpilog::WpilogReader;

/// Write an encoded log to `path`, replacing any existing file.
pub fn write_log<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), CodecError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|e| {
        CodecError::io(
            "write_log",
            format!("Failed to create '{}': {e}", path_ref.display()),
        )
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}
