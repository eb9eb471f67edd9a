// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File format implementations.
//!
//! - [`wpilog`]: WPILOG binary telemetry log support

pub mod wpilog;
