// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File-level WPILOG reader.
//!
//! Owns the log bytes (memory-mapped or in-memory), frames every record once
//! at open time and keeps only the record spans. Entry declarations are
//! summarized from control records so callers can list what a log contains
//! without assembling values.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use super::decoder::LogDecoder;
use super::record::{ControlType, Record, RecordView};
use crate::io::arena::LogArena;
use crate::io::metadata::EntryInfo;
use crate::topic::{TopicAssembler, TopicTree};
use crate::{CodecError, Result};

/// Reader over a complete WPILOG file.
#[derive(Debug)]
pub struct WpilogReader {
    arena: LogArena,
    version: u16,
    extra_header: String,
    records: Vec<Record>,
    entries: Vec<EntryInfo>,
}

impl WpilogReader {
    /// Memory-map and decode a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_arena(LogArena::open(path)?, |_| {})
    }

    /// Decode an in-memory buffer.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_arena(LogArena::from_vec(data), |_| {})
    }

    /// Decode the bytes owned by `arena`, reporting framing progress.
    ///
    /// # Errors
    ///
    /// Fails only when the file header is not a supported WPILOG header.
    /// Damage after the header truncates the record list instead.
    pub fn from_arena<F: FnMut(f64)>(arena: LogArena, progress: F) -> Result<Self> {
        let decoder = LogDecoder::new(arena.data());
        if !decoder.is_valid() {
            return Err(CodecError::parse(
                "WpilogReader",
                format!(
                    "'{}' is not a WPILOG v1.0 file ({} bytes)",
                    arena.path(),
                    arena.len()
                ),
            ));
        }
        let version = decoder.version().unwrap_or_default();
        let extra_header = decoder
            .extra_header()
            .map(|s| s.into_owned())
            .unwrap_or_default();
        let records = decoder.decode(progress);
        let entries = summarize_entries(arena.data(), &records);

        debug!(
            path = arena.path(),
            records = records.len(),
            entries = entries.len(),
            "opened WPILOG"
        );

        Ok(Self {
            arena,
            version,
            extra_header,
            records,
            entries,
        })
    }

    /// Source path, empty for in-memory logs.
    pub fn path(&self) -> &str {
        self.arena.path()
    }

    /// Raw log bytes.
    pub fn data(&self) -> &[u8] {
        self.arena.data()
    }

    /// Size of the log in bytes.
    pub fn file_size(&self) -> u64 {
        self.arena.len() as u64
    }

    /// Format version from the file header.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Extra header string.
    pub fn extra_header(&self) -> &str {
        &self.extra_header
    }

    /// Framed records, in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Framed records joined with their payloads.
    pub fn views(&self) -> impl Iterator<Item = RecordView<'_>> + '_ {
        let data = self.arena.data();
        self.records.iter().map(move |record| record.view(data))
    }

    /// Number of framed records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Offset one past the last framed record.
    ///
    /// Less than [`file_size`](Self::file_size) when the tail of the file
    /// could not be framed.
    pub fn framed_len(&self) -> usize {
        self.records
            .last()
            .map(Record::end_offset)
            .or_else(|| LogDecoder::new(self.arena.data()).records_offset())
            .unwrap_or(0)
    }

    /// Every entry declaration, in declaration order.
    pub fn entries(&self) -> &[EntryInfo] {
        &self.entries
    }

    /// Latest declaration with the given name.
    pub fn entry_by_name(&self, name: &str) -> Option<&EntryInfo> {
        self.entries.iter().rev().find(|e| e.name == name)
    }

    /// Earliest record timestamp.
    pub fn start_time(&self) -> Option<u64> {
        self.records.iter().map(|r| r.timestamp).min()
    }

    /// Latest record timestamp.
    pub fn end_time(&self) -> Option<u64> {
        self.records.iter().map(|r| r.timestamp).max()
    }

    /// Assemble the topic tree.
    pub fn topics(&self) -> TopicTree {
        let mut assembler = TopicAssembler::new();
        for view in self.views() {
            assembler.push(&view);
        }
        assembler.finish()
    }
}

fn summarize_entries(data: &[u8], records: &[Record]) -> Vec<EntryInfo> {
    let mut entries: Vec<EntryInfo> = Vec::new();
    let mut active: HashMap<u32, usize> = HashMap::new();

    for record in records {
        let view = record.view(data);
        if !view.is_control() {
            if let Some(&idx) = active.get(&view.entry()) {
                entries[idx].record_sample(view.timestamp());
            }
            continue;
        }

        let outcome = match view.control_type() {
            Some(ControlType::Start) => view.start_data().map(|start| {
                active.insert(start.entry, entries.len());
                entries.push(EntryInfo::from_start(&start, view.timestamp()));
            }),
            Some(ControlType::Finish) => view.finish_entry().map(|id| {
                if let Some(idx) = active.remove(&id) {
                    entries[idx].finished = true;
                }
            }),
            Some(ControlType::SetMetadata) => view.set_metadata_data().map(|meta| {
                if let Some(&idx) = active.get(&meta.entry) {
                    entries[idx].metadata = meta.metadata;
                }
            }),
            None => Err(CodecError::invalid_control(
                "control",
                format!("unknown control tag {:?}", view.payload().first()),
            )),
        };

        if let Err(e) = outcome {
            warn!(
                offset = record.offset,
                error = %e,
                fields = ?e.log_fields(),
                "skipping malformed control record"
            );
        }
    }

    entries
}
