// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! WPILOG format implementation.
//!
//! WPILOG is an append-only binary log of timestamped records. Each data
//! record belongs to an entry id; control records (entry id 0) declare,
//! retire and annotate those ids. This module provides:
//! - a zero-copy decoder that frames records without copying payloads
//! - typed payload accessors for the eleven payload shapes
//! - an encoder that picks the narrowest header widths per record
//! - a file-level reader that owns a memory-mapped log

// Re-export constants at module level for convenience
pub use constants::{
    CONTROL_ENTRY, CONTROL_FINISH, CONTROL_SET_METADATA, CONTROL_START, FILE_HEADER_SIZE,
    WPILOG_MAGIC, WPILOG_VERSION,
};

pub mod constants;
pub mod cursor;

// Low-level codec
pub mod decoder;
pub mod encoder;
pub mod record;

// File-level reader
pub mod reader;

// Re-exports
pub use cursor::ByteCursor;
pub use decoder::{is_valid, HeaderWidths, LogDecoder, RecordIter};
pub use encoder::{min_byte_width, LogEncoder};
pub use reader::WpilogReader;
pub use record::{ControlType, MetadataRecordData, Record, RecordBuf, RecordView, StartRecordData};
