// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! WPILOG encoder.
//!
//! Records are queued in call order and serialized in that order by
//! [`LogEncoder::build`]. Each record header uses the narrowest width that
//! holds its entry id, payload size and timestamp, so a boolean sample on a
//! small entry id costs four header bytes.
//!
//! # Example
//!
//! ```
//! use wpilog_codec::io::formats::wpilog::{LogEncoder, RecordBuf, StartRecordData};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut encoder = LogEncoder::new();
//! encoder.add_record(RecordBuf::control_start(
//!     0,
//!     &StartRecordData::new(1, "/robot/enabled", "boolean", ""),
//! ))?;
//! encoder.add_record(RecordBuf::boolean(1, 0, true))?;
//! let bytes = encoder.build(|_| {});
//! assert_eq!(&bytes[..6], b"WPILOG");
//! # Ok(())
//! # }
//! ```

use byteorder::{LittleEndian, WriteBytesExt};

use super::constants::{WPILOG_MAGIC, WPILOG_VERSION};
use super::decoder::HeaderWidths;
use super::record::RecordBuf;
use crate::{CodecError, Result};

/// Serializes queued records into a complete log buffer.
#[derive(Debug, Clone, Default)]
pub struct LogEncoder {
    extra_header: String,
    records: Vec<RecordBuf>,
    payload_bytes: usize,
}

impl LogEncoder {
    /// Create an encoder with an empty extra header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extra header string written after the version.
    pub fn with_extra_header(mut self, extra_header: impl Into<String>) -> Self {
        self.extra_header = extra_header.into();
        self
    }

    /// Queue a record.
    ///
    /// # Errors
    ///
    /// Rejects timestamps above `i64::MAX` (the decoder would read them as
    /// negative) and payloads that do not fit the 32-bit size field.
    pub fn add_record(&mut self, record: RecordBuf) -> Result<()> {
        if record.timestamp > i64::MAX as u64 {
            return Err(CodecError::invalid_timestamp(record.timestamp));
        }
        if u32::try_from(record.payload.len()).is_err() {
            return Err(CodecError::payload_too_large(record.payload.len()));
        }
        self.payload_bytes += record.payload.len();
        self.records.push(record);
        Ok(())
    }

    /// Queued records, in order.
    pub fn records(&self) -> &[RecordBuf] {
        &self.records
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records are queued.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize header and records, reporting `written / total` after each
    /// record.
    pub fn build<F: FnMut(f64)>(&self, mut progress: F) -> Vec<u8> {
        // upper bound: 17-byte headers
        let capacity = 12 + self.extra_header.len() + self.records.len() * 17 + self.payload_bytes;
        let mut buf = Vec::with_capacity(capacity);

        buf.extend_from_slice(WPILOG_MAGIC);
        // writes into a Vec cannot fail
        let _ = buf.write_u16::<LittleEndian>(WPILOG_VERSION);
        let _ = buf.write_u32::<LittleEndian>(self.extra_header.len() as u32);
        buf.extend_from_slice(self.extra_header.as_bytes());

        let total = self.records.len() as f64;
        for (i, record) in self.records.iter().enumerate() {
            write_record(&mut buf, record);
            progress((i + 1) as f64 / total);
        }

        buf
    }
}

/// Narrowest little-endian width (at least 1 byte) that holds `value`.
pub fn min_byte_width(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

fn write_record(buf: &mut Vec<u8>, record: &RecordBuf) {
    let payload_len = record.payload.len() as u64;
    let widths = HeaderWidths {
        entry: min_byte_width(record.entry as u64),
        payload_size: min_byte_width(payload_len),
        timestamp: min_byte_width(record.timestamp),
    };

    buf.push(widths.to_control_byte());
    write_var_uint(buf, record.entry as u64, widths.entry);
    write_var_uint(buf, payload_len, widths.payload_size);
    write_var_uint(buf, record.timestamp, widths.timestamp);
    buf.extend_from_slice(&record.payload);
}

fn write_var_uint(buf: &mut Vec<u8>, value: u64, width: usize) {
    let _ = buf.write_uint::<LittleEndian>(value, width);
}
