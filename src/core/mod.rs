// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout wpilog-codec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error handling
//! - [`TypeTag`] - Closed set of declared payload types
//! - [`LogValue`] - Decoded sample values

pub mod error;
pub mod value;

pub use error::{CodecError, Result};
pub use value::{type_name_to_tree, type_name_to_wire, LogValue, Sample, TypeTag};
