// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bounds-checked little-endian reads over a byte buffer.
//!
//! All reads take an absolute offset and never advance any state; the
//! decoder owns its position. A read that would run past the end of the
//! buffer returns [`CodecError::BufferTooShort`] instead of panicking, which
//! is what lets the decoder treat truncation as end-of-stream.
//!
//! # Example
//!
//! ```
//! use wpilog_codec::io::formats::wpilog::cursor::ByteCursor;
//!
//! let data = [0x34, 0x12, 0xff];
//! let cursor = ByteCursor::new(&data);
//! assert_eq!(cursor.read_u16_le(0).unwrap(), 0x1234);
//! assert_eq!(cursor.read_var_uint(1, 2).unwrap(), 0xff12);
//! assert_eq!(cursor.read_var_uint(2, 2).ok(), None);
//! ```

use std::borrow::Cow;

use byteorder::{ByteOrder, LittleEndian};

use crate::{CodecError, Result};

/// Read-only view over a contiguous byte buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Length of the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the underlying buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes available from `offset` to the end of the buffer.
    #[inline]
    pub fn remaining(&self, offset: usize) -> usize {
        self.data.len().saturating_sub(offset)
    }

    /// Borrow `len` bytes at `offset`.
    pub fn read_fixed_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset
            .checked_add(len)
            .ok_or_else(|| CodecError::buffer_too_short(len, 0, offset as u64))?;
        if end > self.data.len() {
            return Err(CodecError::buffer_too_short(
                len,
                self.remaining(offset),
                offset as u64,
            ));
        }
        Ok(&self.data[offset..end])
    }

    /// Read a single byte.
    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.read_fixed_bytes(offset, 1)?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&self, offset: usize) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_fixed_bytes(offset, 2)?))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&self, offset: usize) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_fixed_bytes(offset, 4)?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&self, offset: usize) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_fixed_bytes(offset, 8)?))
    }

    /// Read a little-endian unsigned integer `byte_len` bytes wide (1 to 8),
    /// zero-extended to 64 bits.
    pub fn read_var_uint(&self, offset: usize, byte_len: usize) -> Result<u64> {
        if byte_len == 0 || byte_len > 8 {
            return Err(CodecError::parse(
                "ByteCursor::read_var_uint",
                format!("integer width {byte_len} outside 1..=8"),
            ));
        }
        let bytes = self.read_fixed_bytes(offset, byte_len)?;
        Ok(LittleEndian::read_uint(bytes, byte_len))
    }

    /// Read `len` bytes at `offset` as UTF-8, replacing invalid sequences
    /// with U+FFFD.
    pub fn read_utf8(&self, offset: usize, len: usize) -> Result<Cow<'a, str>> {
        Ok(String::from_utf8_lossy(self.read_fixed_bytes(offset, len)?))
    }

    /// Read a u32 length prefix followed by that many UTF-8 bytes.
    ///
    /// Returns the string and the offset just past it.
    pub fn read_prefixed_utf8(&self, offset: usize) -> Result<(Cow<'a, str>, usize)> {
        let len = self.read_u32_le(offset)? as usize;
        let start = offset + 4;
        let text = self.read_utf8(start, len)?;
        Ok((text, start + len))
    }
}
