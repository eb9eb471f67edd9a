// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Topic layer: the in-memory tree and the adapters between it and the
//! record stream.
//!
//! - [`assembler`] - records to tree (decode direction)
//! - [`flatten`] - tree to records (encode direction)
//! - [`tree`] - the tree itself

pub mod assembler;
pub mod flatten;
pub mod tree;

pub use assembler::{assemble, decode_topics, AssemblyStats, TopicAssembler};
pub use flatten::{encode_topics, flatten, FIRST_ENTRY_ID};
pub use tree::{TopicLog, TopicNode, TopicTree, TOPIC_SEPARATOR};
