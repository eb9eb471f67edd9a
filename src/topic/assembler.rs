// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Topic assembly (decode direction).
//!
//! Replays the control sub-protocol over a decoded record stream:
//! - start registers `{name, type}` for an entry id
//! - finish retires the id
//! - set-metadata updates the topic's metadata
//!
//! Data records are interpreted through the type most recently declared for
//! their id and appended to that topic's log. Data for ids that are not
//! active, and payloads that do not fit the declared shape, are dropped and
//! counted; telemetry from a robot is routinely incomplete, so none of this
//! is an error.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::core::{type_name_to_tree, Sample, TypeTag};
use crate::io::formats::wpilog::{ControlType, LogDecoder, RecordView};
use crate::topic::tree::{TopicLog, TopicTree};
use crate::{CodecError, Result};

/// Counters collected while assembling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Records seen
    pub records: u64,
    /// Control records seen
    pub control_records: u64,
    /// Samples appended to the tree
    pub samples: u64,
    /// Start records applied
    pub topics_started: u64,
    /// Finish records that retired an active id
    pub topics_finished: u64,
    /// Data records for ids with no active start
    pub dropped_unregistered: u64,
    /// Data records whose payload did not fit the declared type
    pub dropped_mismatched: u64,
    /// Control records that could not be parsed
    pub malformed_control: u64,
}

impl AssemblyStats {
    /// Total data records dropped.
    pub fn dropped(&self) -> u64 {
        self.dropped_unregistered + self.dropped_mismatched
    }
}

#[derive(Debug, Clone)]
struct ActiveEntry {
    name: String,
    tag: TypeTag,
}

/// Incremental record-to-tree assembler.
#[derive(Debug, Default)]
pub struct TopicAssembler {
    tree: TopicTree,
    active: HashMap<u32, ActiveEntry>,
    stats: AssemblyStats,
}

impl TopicAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one record.
    pub fn push(&mut self, view: &RecordView<'_>) {
        self.stats.records += 1;
        if view.is_control() {
            self.stats.control_records += 1;
            if let Err(e) = self.apply_control(view) {
                self.stats.malformed_control += 1;
                warn!(
                    timestamp = view.timestamp(),
                    error = %e,
                    fields = ?e.log_fields(),
                    "dropping malformed control record"
                );
            }
        } else {
            self.apply_data(view);
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> &AssemblyStats {
        &self.stats
    }

    /// Ids currently declared and not finished.
    pub fn active_entries(&self) -> usize {
        self.active.len()
    }

    /// Consume the assembler, returning the tree.
    pub fn finish(self) -> TopicTree {
        self.finish_with_stats().0
    }

    /// Consume the assembler, returning the tree and counters.
    pub fn finish_with_stats(self) -> (TopicTree, AssemblyStats) {
        debug!(
            records = self.stats.records,
            samples = self.stats.samples,
            dropped = self.stats.dropped(),
            "topic assembly finished"
        );
        (self.tree, self.stats)
    }

    fn apply_control(&mut self, view: &RecordView<'_>) -> Result<()> {
        match view.control_type() {
            Some(ControlType::Start) => {
                let start = view.start_data()?;
                let type_name = type_name_to_tree(&start.type_name).to_string();
                let tag = TypeTag::from_type_name(&type_name);

                match self.tree.get_mut(&start.name) {
                    Some(log) if log.type_name == type_name => {
                        log.metadata = start.metadata;
                    }
                    existing => {
                        if let Some(log) = existing {
                            warn!(
                                topic = %start.name,
                                old_type = %log.type_name,
                                new_type = %type_name,
                                "topic redeclared with a different type, resetting its log"
                            );
                        }
                        self.tree.insert_log(
                            &start.name,
                            TopicLog::new(type_name).with_metadata(start.metadata),
                        );
                        // ids still bound to the old log would feed it the old shape
                        let name = &start.name;
                        self.active.retain(|entry, active| {
                            let stale = *entry != start.entry && active.name == *name;
                            if stale {
                                debug!(
                                    entry,
                                    topic = %name,
                                    "retiring entry bound to reset topic"
                                );
                            }
                            !stale
                        });
                    }
                }

                if let Some(previous) = self.active.insert(
                    start.entry,
                    ActiveEntry {
                        name: start.name,
                        tag,
                    },
                ) {
                    debug!(entry = start.entry, previous = %previous.name, "entry id reused");
                }
                self.stats.topics_started += 1;
            }
            Some(ControlType::Finish) => {
                let entry = view.finish_entry()?;
                if self.active.remove(&entry).is_some() {
                    self.stats.topics_finished += 1;
                }
            }
            Some(ControlType::SetMetadata) => {
                let meta = view.set_metadata_data()?;
                if let Some(active) = self.active.get(&meta.entry) {
                    if let Some(log) = self.tree.get_mut(&active.name) {
                        log.metadata = meta.metadata;
                    }
                }
            }
            None => {
                return Err(CodecError::invalid_control(
                    "control",
                    format!("unknown control tag {:?}", view.payload().first()),
                ));
            }
        }
        Ok(())
    }

    fn apply_data(&mut self, view: &RecordView<'_>) {
        let Some(active) = self.active.get(&view.entry()) else {
            self.stats.dropped_unregistered += 1;
            return;
        };
        let Some(value) = view.get_value(active.tag) else {
            self.stats.dropped_mismatched += 1;
            return;
        };
        if self
            .tree
            .push_sample(&active.name, Sample::new(view.timestamp(), value))
        {
            self.stats.samples += 1;
        }
    }
}

/// Assemble a tree from a record stream.
pub fn assemble<'a, I>(views: I) -> TopicTree
where
    I: IntoIterator<Item = RecordView<'a>>,
{
    let mut assembler = TopicAssembler::new();
    for view in views {
        assembler.push(&view);
    }
    assembler.finish()
}

/// Decode a log buffer straight into a topic tree.
///
/// Progress covers framing in `[0, 0.5]` and assembly in `(0.5, 1]`. An
/// invalid header yields an empty tree.
pub fn decode_topics<F: FnMut(f64)>(data: &[u8], mut progress: F) -> TopicTree {
    let records = LogDecoder::new(data).decode(|p| progress(p * 0.5));

    let total = records.len() as f64;
    let mut assembler = TopicAssembler::new();
    for (i, record) in records.iter().enumerate() {
        assembler.push(&record.view(data));
        progress(0.5 + (i + 1) as f64 / total * 0.5);
    }
    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogValue;
    use crate::io::formats::wpilog::{RecordBuf, StartRecordData};

    fn start(ts: u64, entry: u32, name: &str, type_name: &str) -> RecordBuf {
        RecordBuf::control_start(ts, &StartRecordData::new(entry, name, type_name, ""))
    }

    fn run(records: &[RecordBuf]) -> (TopicTree, AssemblyStats) {
        let mut assembler = TopicAssembler::new();
        for record in records {
            assembler.push(&record.as_view());
        }
        assembler.finish_with_stats()
    }

    #[test]
    fn test_start_then_data() {
        let (tree, stats) = run(&[
            start(0, 1, "a/b", "boolean"),
            RecordBuf::boolean(1, 5, true),
            RecordBuf::boolean(1, 6, false),
        ]);
        let log = tree.get("a/b").unwrap();
        assert_eq!(log.type_name, "boolean");
        assert_eq!(
            log.samples,
            vec![
                Sample::new(5, LogValue::Boolean(true)),
                Sample::new(6, LogValue::Boolean(false))
            ]
        );
        assert_eq!(stats.samples, 2);
        assert_eq!(tree.start_time(), Some(5));
        assert_eq!(tree.end_time(), Some(6));
    }

    #[test]
    fn test_int_aliases_remapped() {
        let (tree, _) = run(&[
            start(0, 1, "i", "int64"),
            start(0, 2, "ia", "int64[]"),
            RecordBuf::integer(1, 1, -9),
            RecordBuf::integer_array(2, 1, &[1, 2, 3]),
        ]);
        assert_eq!(tree.get("i").unwrap().type_name, "int");
        assert_eq!(tree.get("ia").unwrap().type_name, "int[]");
        assert_eq!(tree.get("i").unwrap().samples[0].value, LogValue::Int(-9));
    }

    #[test]
    fn test_unregistered_dropped() {
        let (tree, stats) = run(&[RecordBuf::double(7, 0, 1.0), start(1, 1, "/a", "double")]);
        assert_eq!(tree.topic_count(), 1);
        assert!(tree.get("/a").unwrap().is_empty());
        assert_eq!(stats.dropped_unregistered, 1);
        assert_eq!(tree.start_time(), None);
    }

    #[test]
    fn test_mismatched_payload_dropped() {
        let (tree, stats) = run(&[start(0, 1, "/a", "double"), RecordBuf::boolean(1, 1, true)]);
        assert!(tree.get("/a").unwrap().is_empty());
        assert_eq!(stats.dropped_mismatched, 1);
    }

    #[test]
    fn test_finish_retires_id() {
        let (tree, stats) = run(&[
            start(0, 1, "/a", "int64"),
            RecordBuf::integer(1, 1, 1),
            RecordBuf::control_finish(2, 1),
            RecordBuf::integer(1, 3, 2),
        ]);
        assert_eq!(tree.get("/a").unwrap().len(), 1);
        assert_eq!(stats.topics_finished, 1);
        assert_eq!(stats.dropped_unregistered, 1);
    }

    #[test]
    fn test_set_metadata() {
        let (tree, _) = run(&[
            start(0, 1, "/a", "string"),
            RecordBuf::control_set_metadata(1, 1, "{\"source\":\"NT\"}"),
            RecordBuf::control_set_metadata(1, 9, "ignored"),
        ]);
        assert_eq!(tree.get("/a").unwrap().metadata, "{\"source\":\"NT\"}");
    }

    #[test]
    fn test_redeclare_same_type_appends() {
        let (tree, _) = run(&[
            start(0, 1, "/a", "double"),
            RecordBuf::double(1, 1, 1.0),
            RecordBuf::control_finish(2, 1),
            start(3, 4, "/a", "double"),
            RecordBuf::double(4, 4, 2.0),
        ]);
        assert_eq!(tree.get("/a").unwrap().len(), 2);
    }

    #[test]
    fn test_redeclare_other_type_resets() {
        let (tree, _) = run(&[
            start(0, 1, "/a", "double"),
            RecordBuf::double(1, 1, 1.0),
            start(3, 1, "/a", "string"),
            RecordBuf::string(1, 4, "x"),
        ]);
        let log = tree.get("/a").unwrap();
        assert_eq!(log.type_name, "string");
        assert_eq!(log.samples, vec![Sample::new(4, LogValue::String("x".into()))]);
    }

    #[test]
    fn test_redeclare_other_type_while_old_id_active() {
        let (tree, stats) = run(&[
            start(0, 1, "/a", "double"),
            start(1, 2, "/a", "string"),
            RecordBuf::double(1, 2, 2.0),
            RecordBuf::string(2, 3, "x"),
        ]);
        let log = tree.get("/a").unwrap();
        assert_eq!(log.type_name, "string");
        assert_eq!(log.samples, vec![Sample::new(3, LogValue::String("x".into()))]);
        assert!(log.samples.iter().all(|s| s.value.type_tag() == log.type_tag()));
        assert_eq!(stats.dropped_unregistered, 1);
    }

    #[test]
    fn test_redeclare_same_type_while_old_id_active() {
        let mut assembler = TopicAssembler::new();
        for record in [
            start(0, 1, "/a", "double"),
            start(1, 2, "/a", "double"),
            RecordBuf::double(1, 2, 1.0),
            RecordBuf::double(2, 3, 2.0),
        ] {
            assembler.push(&record.as_view());
        }
        assert_eq!(assembler.active_entries(), 2);
        let (tree, stats) = assembler.finish_with_stats();
        let log = tree.get("/a").unwrap();
        assert_eq!(
            log.samples,
            vec![
                Sample::new(2, LogValue::Double(1.0)),
                Sample::new(3, LogValue::Double(2.0))
            ]
        );
        assert_eq!(stats.dropped(), 0);
    }

    #[test]
    fn test_unknown_type_is_raw_and_json_is_string() {
        let (tree, _) = run(&[
            start(0, 1, "/p", "struct:Pose2d"),
            start(0, 2, "/j", "json"),
            RecordBuf::raw(1, 1, &[1, 2, 3]),
            RecordBuf::string(2, 1, "{}"),
        ]);
        let pose = tree.get("/p").unwrap();
        assert_eq!(pose.type_name, "struct:Pose2d");
        assert_eq!(pose.samples[0].value, LogValue::Raw(vec![1, 2, 3]));
        let json = tree.get("/j").unwrap();
        assert_eq!(json.type_name, "json");
        assert_eq!(json.samples[0].value, LogValue::String("{}".into()));
    }

    #[test]
    fn test_malformed_control_counted() {
        let records = [
            RecordBuf::new(0, 0, vec![9]),
            RecordBuf::new(0, 0, vec![1, 1, 0]),
            RecordBuf::new(0, 0, vec![]),
        ];
        let (tree, stats) = run(&records);
        assert!(tree.is_empty());
        assert_eq!(stats.malformed_control, 3);
        assert_eq!(stats.control_records, 3);
    }

    #[test]
    fn test_decode_topics_progress() {
        let mut encoder = crate::io::formats::wpilog::LogEncoder::new();
        encoder.add_record(start(0, 1, "/a", "float")).unwrap();
        encoder.add_record(RecordBuf::float(1, 1, 0.5)).unwrap();
        let bytes = encoder.build(|_| {});

        let mut reports = Vec::new();
        let tree = decode_topics(&bytes, |p| reports.push(p));
        assert_eq!(tree.get("/a").unwrap().samples[0].value, LogValue::Float(0.5));
        assert!(reports.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(reports.last().copied(), Some(1.0));
    }

    #[test]
    fn test_decode_topics_invalid_header() {
        let tree = decode_topics(b"garbage", |_| panic!("no progress expected"));
        assert!(tree.is_empty());
    }
}
