// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Topic flattening (encode direction).
//!
//! Walks the tree depth first and emits, per typed topic with samples, one
//! start record timestamped at the first sample followed by one data record
//! per sample. Entry ids are handed out from 1 in walk order.

use tracing::warn;

use crate::core::type_name_to_wire;
use crate::io::formats::wpilog::{LogEncoder, RecordBuf, StartRecordData};
use crate::topic::tree::TopicTree;
use crate::Result;

/// First entry id given to a flattened topic.
pub const FIRST_ENTRY_ID: u32 = 1;

/// Flatten a tree into encoder records.
///
/// Samples whose value shape does not match the topic's declared type are
/// skipped, since the decoder could not read them back.
pub fn flatten(tree: &TopicTree) -> Vec<RecordBuf> {
    let mut records = Vec::with_capacity(tree.topic_count() + tree.sample_count());
    let mut next_entry = FIRST_ENTRY_ID;

    for (name, log) in tree.leaves() {
        let Some(first) = log.samples.first() else {
            continue;
        };
        let entry = next_entry;
        next_entry += 1;

        records.push(RecordBuf::control_start(
            first.timestamp,
            &StartRecordData::new(
                entry,
                name.as_str(),
                type_name_to_wire(&log.type_name),
                log.metadata.as_str(),
            ),
        ));

        let tag = log.type_tag();
        for sample in &log.samples {
            if sample.value.type_tag() != tag {
                warn!(
                    topic = %name,
                    declared = %log.type_name,
                    timestamp = sample.timestamp,
                    "skipping sample that does not match the topic type"
                );
                continue;
            }
            records.push(RecordBuf::from_value(entry, sample.timestamp, &sample.value));
        }
    }

    records
}

/// Encode a tree into a complete log buffer.
///
/// # Errors
///
/// Fails if a sample timestamp is above `i64::MAX`.
pub fn encode_topics<F: FnMut(f64)>(tree: &TopicTree, progress: F) -> Result<Vec<u8>> {
    let mut encoder = LogEncoder::new();
    for record in flatten(tree) {
        encoder.add_record(record)?;
    }
    Ok(encoder.build(progress))
}
