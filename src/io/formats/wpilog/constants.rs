// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! WPILOG format constants.
//!
//! Magic bytes, the supported version, control record tags and the widths of
//! the variable-length record header fields. The decoder and encoder both
//! read from here so the two sides cannot drift apart.

/// File magic at offset 0.
pub const WPILOG_MAGIC: &[u8; 6] = b"WPILOG";

/// Supported format version (major 1, minor 0).
pub const WPILOG_VERSION: u16 = 0x0100;

/// Smallest buffer that can hold magic, version and extra header length.
pub const FILE_HEADER_SIZE: usize = 12;

/// Offset of the little-endian extra header length field.
pub const EXTRA_HEADER_LEN_OFFSET: usize = 8;

/// Entry id reserved for control records.
pub const CONTROL_ENTRY: u32 = 0;

/// Control tag: declare an entry.
pub const CONTROL_START: u8 = 0;
/// Control tag: retire an entry.
pub const CONTROL_FINISH: u8 = 1;
/// Control tag: replace an entry's metadata string.
pub const CONTROL_SET_METADATA: u8 = 2;

/// Exact payload length of a finish control record.
pub const FINISH_PAYLOAD_LEN: usize = 5;

/// Minimum bytes left before the decoder attempts another record.
pub const MIN_RECORD_REMAINING: usize = 4;

/// Maximum byte width of the entry id field.
pub const MAX_ENTRY_WIDTH: usize = 4;
/// Maximum byte width of the payload size field.
pub const MAX_SIZE_WIDTH: usize = 4;
/// Maximum byte width of the timestamp field.
pub const MAX_TIMESTAMP_WIDTH: usize = 8;
