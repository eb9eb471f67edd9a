// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! WPILOG decoder.
//!
//! # File layout
//!
//! ```text
//! offset 0    [6]  "WPILOG"
//! offset 6    [2]  version, u16 LE (0x0100)
//! offset 8    [4]  extra header length N, u32 LE
//! offset 12   [N]  extra header, UTF-8
//! offset 12+N ...  records
//! ```
//!
//! # Record layout
//!
//! ```text
//! byte 0    control: bits[0:2) entry width - 1
//!                    bits[2:4) payload size width - 1
//!                    bits[4:7) timestamp width - 1
//! entry id, payload size, timestamp   (LE unsigned, widths from byte 0)
//! payload
//! ```
//!
//! Decoding never fails. A bad file header yields no records; a record that
//! cannot be framed (truncated header, truncated payload, timestamp outside
//! the signed 64-bit range) ends the stream and everything framed before it
//! is returned.

use std::borrow::Cow;

use tracing::debug;

use super::constants::{
    EXTRA_HEADER_LEN_OFFSET, FILE_HEADER_SIZE, MIN_RECORD_REMAINING, WPILOG_MAGIC, WPILOG_VERSION,
};
use super::cursor::ByteCursor;
use super::record::{Record, RecordView};
use crate::{CodecError, Result};

/// Check whether `data` starts with a supported WPILOG header.
pub fn is_valid(data: &[u8]) -> bool {
    LogDecoder::new(data).is_valid()
}

/// Widths of the three variable-length header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderWidths {
    pub entry: usize,
    pub payload_size: usize,
    pub timestamp: usize,
}

impl HeaderWidths {
    /// Unpack widths from a record control byte.
    #[inline]
    pub fn from_control_byte(control: u8) -> Self {
        Self {
            entry: (control & 0x3) as usize + 1,
            payload_size: ((control >> 2) & 0x3) as usize + 1,
            timestamp: ((control >> 4) & 0x7) as usize + 1,
        }
    }

    /// Pack widths into a record control byte.
    #[inline]
    pub fn to_control_byte(&self) -> u8 {
        ((self.entry - 1) | ((self.payload_size - 1) << 2) | ((self.timestamp - 1) << 4)) as u8
    }

    /// Control byte plus the three fields.
    #[inline]
    pub fn header_len(&self) -> usize {
        1 + self.entry + self.payload_size + self.timestamp
    }
}

/// Decoder over a complete in-memory log.
#[derive(Debug, Clone, Copy)]
pub struct LogDecoder<'a> {
    cursor: ByteCursor<'a>,
}

impl<'a> LogDecoder<'a> {
    /// Create a decoder over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
        }
    }

    /// Check the minimum size, magic and version.
    pub fn is_valid(&self) -> bool {
        self.cursor.len() >= FILE_HEADER_SIZE
            && self
                .cursor
                .read_fixed_bytes(0, WPILOG_MAGIC.len())
                .is_ok_and(|magic| magic == WPILOG_MAGIC)
            && self.version() == Some(WPILOG_VERSION)
    }

    /// Version field, if the buffer is long enough to hold one.
    pub fn version(&self) -> Option<u16> {
        self.cursor.read_u16_le(WPILOG_MAGIC.len()).ok()
    }

    /// Extra header string, if the header is valid and complete.
    pub fn extra_header(&self) -> Option<Cow<'a, str>> {
        if !self.is_valid() {
            return None;
        }
        let len = self.cursor.read_u32_le(EXTRA_HEADER_LEN_OFFSET).ok()? as usize;
        self.cursor.read_utf8(FILE_HEADER_SIZE, len).ok()
    }

    /// Offset of the first record, if the header is valid and complete.
    pub fn records_offset(&self) -> Option<usize> {
        if !self.is_valid() {
            return None;
        }
        let len = self.cursor.read_u32_le(EXTRA_HEADER_LEN_OFFSET).ok()? as usize;
        let start = FILE_HEADER_SIZE.checked_add(len)?;
        (start <= self.cursor.len()).then_some(start)
    }

    /// Iterate framed records.
    pub fn records(&self) -> RecordIter<'a> {
        let pos = self.records_offset();
        if pos.is_none() {
            debug!(len = self.cursor.len(), "invalid WPILOG header, no records");
        }
        RecordIter {
            cursor: self.cursor,
            pos: pos.unwrap_or(self.cursor.len()),
            done: pos.is_none(),
        }
    }

    /// Iterate framed records joined with their payloads.
    pub fn views(&self) -> impl Iterator<Item = RecordView<'a>> + 'a {
        let cursor = self.cursor;
        let data = cursor.read_fixed_bytes(0, cursor.len()).unwrap_or(&[]);
        self.records().map(move |record| record.view(data))
    }

    /// Frame every record, reporting `position / len` after each one.
    pub fn decode<F: FnMut(f64)>(&self, mut progress: F) -> Vec<Record> {
        let total = self.cursor.len().max(1) as f64;
        let mut iter = self.records();
        let mut records = Vec::new();
        while let Some(record) = iter.next() {
            records.push(record);
            progress(iter.position() as f64 / total);
        }
        records
    }
}

/// Iterator over framed records.
///
/// Stops for good at the first record that cannot be framed.
#[derive(Debug, Clone)]
pub struct RecordIter<'a> {
    cursor: ByteCursor<'a>,
    pos: usize,
    done: bool,
}

impl RecordIter<'_> {
    /// Offset of the next record to be framed.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn frame(&self) -> Result<Option<Record>> {
        let pos = self.pos;
        if self.cursor.remaining(pos) < MIN_RECORD_REMAINING {
            return Ok(None);
        }

        let widths = HeaderWidths::from_control_byte(self.cursor.read_u8(pos)?);
        let header_len = widths.header_len();
        if self.cursor.remaining(pos) < header_len {
            return Err(CodecError::buffer_too_short(
                header_len,
                self.cursor.remaining(pos),
                pos as u64,
            ));
        }

        let mut field = pos + 1;
        let entry = self.cursor.read_var_uint(field, widths.entry)?;
        field += widths.entry;
        let payload_len = self.cursor.read_var_uint(field, widths.payload_size)?;
        field += widths.payload_size;
        let timestamp = self.cursor.read_var_uint(field, widths.timestamp)?;

        if timestamp > i64::MAX as u64 {
            return Err(CodecError::parse(
                "RecordIter",
                format!("timestamp {timestamp} at offset {pos} is negative as a signed value"),
            ));
        }

        let payload_offset = pos + header_len;
        let payload_len = usize::try_from(payload_len)
            .map_err(|_| CodecError::payload_too_large(usize::MAX))?;
        // bounds-check only; the payload stays in place
        self.cursor.read_fixed_bytes(payload_offset, payload_len)?;

        Ok(Some(Record {
            // entry width is at most 4 bytes
            entry: entry as u32,
            timestamp,
            offset: pos,
            payload_offset,
            payload_len,
        }))
    }
}

impl Iterator for RecordIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.done {
            return None;
        }
        match self.frame() {
            Ok(Some(record)) => {
                self.pos = record.end_offset();
                Some(record)
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                debug!(offset = self.pos, error = %e, "stopping at unframeable record");
                self.done = true;
                None
            }
        }
    }
}
