// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use wpilog_codec::io::formats::wpilog::{LogEncoder, RecordBuf, StartRecordData};
use wpilog_codec::{LogValue, TopicLog, TopicTree};

// ============================================================================
// Temp files
// ============================================================================

/// Get a unique temporary directory for test files.
pub fn temp_dir(tag: &str) -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "wpilog_{}_{}_{}",
        tag,
        std::process::id(),
        random
    ))
}

/// Create a temporary file path with cleanup guard.
pub fn temp_path(tag: &str, name: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir(tag);
    fs::create_dir_all(&dir).ok();
    let path = dir.join(name);
    (path, CleanupGuard(dir))
}

/// Cleanup guard for test temporary files.
#[derive(Debug)]
pub struct CleanupGuard(pub PathBuf);

impl CleanupGuard {
    pub fn dir(&self) -> &PathBuf {
        &self.0
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

// ============================================================================
// Sample data
// ============================================================================

/// One topic per type tag, with short names and edge-case values.
pub fn all_types_tree() -> TopicTree {
    let mut tree = TopicTree::new();
    tree.insert_log(
        "b",
        TopicLog::new("boolean")
            .with_sample(0, LogValue::Boolean(true))
            .with_sample(1, LogValue::Boolean(false)),
    );
    tree.insert_log(
        "i",
        TopicLog::new("int")
            .with_sample(2, LogValue::Int(i64::MIN))
            .with_sample(3, LogValue::Int(-1))
            .with_sample(4, LogValue::Int(i64::MAX)),
    );
    tree.insert_log(
        "f",
        TopicLog::new("float")
            .with_sample(5, LogValue::Float(f32::NAN))
            .with_sample(6, LogValue::Float(-0.0))
            .with_sample(7, LogValue::Float(f32::MIN_POSITIVE)),
    );
    tree.insert_log(
        "d",
        TopicLog::new("double")
            .with_sample(8, LogValue::Double(f64::NAN))
            .with_sample(9, LogValue::Double(f64::NEG_INFINITY))
            .with_sample(10, LogValue::Double(-0.0))
            .with_sample(11, LogValue::Double(std::f64::consts::PI)),
    );
    tree.insert_log(
        "s",
        TopicLog::new("string")
            .with_metadata("{\"unit\":\"none\"}")
            .with_sample(12, LogValue::String(String::new()))
            .with_sample(13, LogValue::String("héllo wörld ✓".into())),
    );
    tree.insert_log(
        "/B",
        TopicLog::new("boolean[]")
            .with_sample(14, LogValue::BooleanArray(vec![]))
            .with_sample(15, LogValue::BooleanArray(vec![true, false, true])),
    );
    tree.insert_log(
        "/I",
        TopicLog::new("int[]").with_sample(16, LogValue::IntArray(vec![1, 2, 3])),
    );
    tree.insert_log(
        "/F",
        TopicLog::new("float[]").with_sample(17, LogValue::FloatArray(vec![0.5, f32::INFINITY])),
    );
    tree.insert_log(
        "/D",
        TopicLog::new("double[]").with_sample(18, LogValue::DoubleArray(vec![-1.25, 1e300])),
    );
    tree.insert_log(
        "/S",
        TopicLog::new("string[]")
            .with_sample(19, LogValue::StringArray(vec![]))
            .with_sample(
                20,
                LogValue::StringArray(vec!["a".into(), String::new(), "ß".into()]),
            ),
    );
    tree.insert_log(
        "r",
        TopicLog::new("raw").with_sample(1 << 40, LogValue::Raw(vec![0, 255, 7])),
    );
    tree
}

/// A small log with control traffic: metadata updates, a finished entry and
/// a data record for an undeclared id.
pub fn control_traffic_log() -> Vec<u8> {
    let mut encoder = LogEncoder::new().with_extra_header("team=1234");
    let records = vec![
        RecordBuf::control_start(1_000, &StartRecordData::new(1, "/robot/enabled", "boolean", "")),
        RecordBuf::control_start(1_000, &StartRecordData::new(2, "/drive/speed", "double", "m/s")),
        RecordBuf::boolean(1, 1_000, true),
        RecordBuf::double(2, 1_020, 0.5),
        RecordBuf::double(3, 1_030, 9.9),
        RecordBuf::control_set_metadata(1_040, 2, "ft/s"),
        RecordBuf::double(2, 1_040, 1.5),
        RecordBuf::control_finish(1_060, 2),
        RecordBuf::double(2, 1_080, 2.5),
        RecordBuf::boolean(1, 1_100, false),
    ];
    for record in records {
        encoder.add_record(record).unwrap();
    }
    encoder.build(|_| {})
}

/// Deterministic pseudo-random generator for property-style tests.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 ^ (self.0 >> 29)
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}
