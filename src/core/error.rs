// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for wpilog-codec.
//!
//! Structural problems in a log file are *not* errors: the decoder stops at
//! the first record it cannot frame and returns what it has. The variants
//! below cover contract violations (asking a data record for its start
//! payload, encoding a timestamp the format cannot carry), short reads
//! reported by the byte cursor, I/O, and background task failures.

use std::fmt;

/// Errors that can occur during log encoding, decoding, and task execution.
#[derive(Debug, Clone)]
pub enum CodecError {
    /// Parse error in a header or payload
    ParseError {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Buffer too short for requested read
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Offset of the read
        offset: u64,
    },

    /// Control record payload did not match its declared control type
    InvalidControlRecord {
        /// Control type name ("start", "finish", "set-metadata")
        kind: &'static str,
        /// Why the payload was rejected
        reason: String,
    },

    /// A control accessor was called on a data record
    NotAControlRecord {
        /// Entry id of the offending record
        entry: u32,
    },

    /// Timestamp outside the range representable in a log file
    InvalidTimestamp {
        /// The rejected timestamp
        timestamp: u64,
    },

    /// Payload larger than a record can describe
    PayloadTooLarge {
        /// Payload length in bytes
        len: usize,
    },

    /// File system error
    Io {
        /// Operation that failed
        context: String,
        /// Error message
        message: String,
    },

    /// Background task ended without producing a result
    TaskFailed {
        /// Failure description
        reason: String,
    },

    /// Other error
    Other(String),
}

impl CodecError {
    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, offset: u64) -> Self {
        CodecError::BufferTooShort {
            requested,
            available,
            offset,
        }
    }

    /// Create an invalid control record error.
    pub fn invalid_control(kind: &'static str, reason: impl Into<String>) -> Self {
        CodecError::InvalidControlRecord {
            kind,
            reason: reason.into(),
        }
    }

    /// Create a "not a control record" error.
    pub fn not_control(entry: u32) -> Self {
        CodecError::NotAControlRecord { entry }
    }

    /// Create an invalid timestamp error.
    pub fn invalid_timestamp(timestamp: u64) -> Self {
        CodecError::InvalidTimestamp { timestamp }
    }

    /// Create a payload too large error.
    pub fn payload_too_large(len: usize) -> Self {
        CodecError::PayloadTooLarge { len }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::Io {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a task failure error.
    pub fn task_failed(reason: impl Into<String>) -> Self {
        CodecError::TaskFailed {
            reason: reason.into(),
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::ParseError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::BufferTooShort {
                requested,
                available,
                offset,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("offset", offset.to_string()),
            ],
            CodecError::InvalidControlRecord { kind, reason } => {
                vec![("kind", kind.to_string()), ("reason", reason.clone())]
            }
            CodecError::NotAControlRecord { entry } => vec![("entry", entry.to_string())],
            CodecError::InvalidTimestamp { timestamp } => {
                vec![("timestamp", timestamp.to_string())]
            }
            CodecError::PayloadTooLarge { len } => vec![("len", len.to_string())],
            CodecError::Io { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::TaskFailed { reason } => vec![("reason", reason.clone())],
            CodecError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::ParseError { context, message } => {
                write!(f, "Parse error in {context}: {message}")
            }
            CodecError::BufferTooShort {
                requested,
                available,
                offset,
            } => write!(
                f,
                "Buffer too short: requested {requested} bytes at offset {offset}, but only {available} bytes available"
            ),
            CodecError::InvalidControlRecord { kind, reason } => {
                write!(f, "Invalid {kind} control record: {reason}")
            }
            CodecError::NotAControlRecord { entry } => {
                write!(f, "Record for entry {entry} is not a control record")
            }
            CodecError::InvalidTimestamp { timestamp } => {
                write!(f, "Timestamp {timestamp} exceeds the signed 64-bit range")
            }
            CodecError::PayloadTooLarge { len } => {
                write!(f, "Payload of {len} bytes exceeds the 32-bit size field")
            }
            CodecError::Io { context, message } => write!(f, "I/O error in {context}: {message}"),
            CodecError::TaskFailed { reason } => write!(f, "Task failed: {reason}"),
            CodecError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::Io {
            context: "IO".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for wpilog-codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
