// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-entry metadata gathered from control records.
//!
//! An entry (a named stream, called a topic once assembled) is declared by a
//! start control record and may be retired by a finish record. These types
//! summarize what a log declares without decoding any values.

use crate::core::TypeTag;
use crate::io::formats::wpilog::StartRecordData;

/// Summary of one declared entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInfo {
    /// Entry id within the log
    pub id: u32,
    /// Entry name (e.g. "/drive/leftVelocity")
    pub name: String,
    /// Declared type string as written in the log
    pub type_name: String,
    /// Latest metadata string
    pub metadata: String,
    /// Number of data records seen for this id while it was declared
    pub record_count: u64,
    /// Timestamp of the start record
    pub start_timestamp: u64,
    /// Timestamp of the first data record
    pub first_timestamp: Option<u64>,
    /// Timestamp of the last data record
    pub last_timestamp: Option<u64>,
    /// Whether a finish record retired this entry
    pub finished: bool,
}

impl EntryInfo {
    /// Create an entry summary from a start record.
    pub fn from_start(data: &StartRecordData, timestamp: u64) -> Self {
        Self {
            id: data.entry,
            name: data.name.clone(),
            type_name: data.type_name.clone(),
            metadata: data.metadata.clone(),
            record_count: 0,
            start_timestamp: timestamp,
            first_timestamp: None,
            last_timestamp: None,
            finished: false,
        }
    }

    /// Resolve the declared type string.
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::from_type_name(&self.type_name)
    }

    /// Count a data record at `timestamp`.
    pub fn record_sample(&mut self, timestamp: u64) {
        self.record_count += 1;
        self.first_timestamp.get_or_insert(timestamp);
        self.last_timestamp = Some(timestamp);
    }
}
