// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod export;
mod extract;
mod inspect;

pub use export::{ExportCmd, ImportCmd};
pub use extract::ExtractCmd;
pub use inspect::InspectCmd;
