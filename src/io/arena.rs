// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Backing storage for decoded logs.
//!
//! Decoded [`Record`](crate::io::formats::wpilog::Record)s only carry payload
//! spans, so whatever owns the bytes must outlive them. `LogArena` is that
//! owner: either a read-only memory map of a file or a buffer handed in by
//! the caller. Readers borrow from the arena; nothing is copied until a typed
//! accessor is called.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wpilog_codec::io::arena::LogArena;
//!
//! let arena = LogArena::open("match_12.wpilog")?;
//! let header: &[u8] = arena.slice(0, 6)?;
//! assert_eq!(header, b"WPILOG");
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use crate::CodecError;

enum Storage {
    Mapped(memmap2::Mmap),
    Owned(Vec<u8>),
}

/// Owner of a complete log buffer.
pub struct LogArena {
    storage: Storage,
    /// Source path for diagnostics (empty for in-memory buffers)
    path: String,
}

impl LogArena {
    /// Memory-map a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CodecError> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_string_lossy().to_string();

        let file = File::open(path_ref).map_err(|e| {
            CodecError::io("LogArena", format!("Failed to open file '{path_str}': {e}"))
        })?;

        // The map is read-only and owned by the arena; every slice handed out
        // borrows from the arena.
        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| {
            CodecError::io("LogArena", format!("Failed to mmap file '{path_str}': {e}"))
        })?;

        Ok(Self {
            storage: Storage::Mapped(mmap),
            path: path_str,
        })
    }

    /// Take ownership of an in-memory buffer.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            storage: Storage::Owned(data),
            path: String::new(),
        }
    }

    /// Source path, empty for in-memory buffers.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Check if the bytes come from a memory-mapped file.
    pub fn is_mapped(&self) -> bool {
        matches!(self.storage, Storage::Mapped(_))
    }

    /// All bytes.
    pub fn data(&self) -> &[u8] {
        match &self.storage {
            Storage::Mapped(mmap) => &mmap[..],
            Storage::Owned(vec) => vec.as_slice(),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Borrow `len` bytes at `offset` with bounds checking.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds.
    pub fn slice(&self, offset: usize, len: usize) -> Result<&[u8], CodecError> {
        let data = self.data();
        let end = offset
            .checked_add(len)
            .ok_or_else(|| CodecError::buffer_too_short(len, 0, offset as u64))?;

        if end > data.len() {
            let available = data.len().saturating_sub(offset);
            return Err(CodecError::buffer_too_short(len, available, offset as u64));
        }

        Ok(&data[offset..end])
    }
}

impl Deref for LogArena {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.data()
    }
}

impl AsRef<[u8]> for LogArena {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}

impl std::fmt::Debug for LogArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogArena")
            .field("path", &self.path)
            .field("mapped", &self.is_mapped())
            .field("len", &self.len())
            .finish()
    }
}
