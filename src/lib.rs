// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # wpilog-codec
//!
//! Reader and writer for WPILOG, the binary telemetry log format used to
//! persist time-stamped robot data streams.
//!
//! The library is organized in layers:
//! - `core/` - error type and the closed set of value types
//! - `io/formats/wpilog/` - byte cursor, record framing, decoder, encoder
//!   and a memory-mapped file reader
//! - `topic/` - the in-memory topic tree and the adapters between it and
//!   the record stream
//! - `task/` - background decode/encode with throttled progress
//!
//! ## Example: Reading a log
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wpilog_codec::WpilogReader;
//!
//! let reader = WpilogReader::open("match_12.wpilog")?;
//! for entry in reader.entries() {
//!     println!("{} ({}): {} records", entry.name, entry.type_name, entry.record_count);
//! }
//! let tree = reader.topics();
//! println!("{} samples", tree.sample_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Writing a log
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wpilog_codec::{decode_topics, encode_topics, LogValue, TopicLog, TopicTree};
//!
//! let mut tree = TopicTree::new();
//! tree.insert_log(
//!     "/drive/leftVelocity",
//!     TopicLog::new("double").with_sample(20_000, LogValue::Double(1.5)),
//! );
//! let bytes = encode_topics(&tree, |_| {})?;
//! assert!(decode_topics(&bytes, |_| {}).bit_eq(&tree));
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{CodecError, LogValue, Result, Sample, TypeTag};

// I/O types (arena, detection, metadata, filter, formats)
pub mod io;

// Re-export key I/O types
pub use io::formats::wpilog::{
    LogDecoder, LogEncoder, Record, RecordBuf, RecordView, StartRecordData, WpilogReader,
};
pub use io::{EntryInfo, TopicFilter};

// Topic tree and adapters
pub mod topic;

pub use topic::{decode_topics, encode_topics, TopicAssembler, TopicLog, TopicTree};

// Background task harness
pub mod task;

pub use task::{HarnessConfig, TaskCommand, TaskHandle, TaskMessage, TaskOutput};
