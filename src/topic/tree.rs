// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! In-memory topic tree.
//!
//! Topic names are split on `/` into nodes. Empty segments are kept, so
//! `"/drive/left"` lives at `"" -> "drive" -> "left"` and joins back to the
//! same string. A node holding a [`TopicLog`] is a typed topic; intermediate
//! nodes created only to reach deeper topics are untyped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{LogValue, Sample, TypeTag};
use crate::io::filter::TopicFilter;

/// Separator between topic name segments.
pub const TOPIC_SEPARATOR: char = '/';

/// Typed time series for one topic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopicLog {
    /// Type name in tree spelling (`int`, `int[]`, otherwise as declared)
    pub type_name: String,
    /// Metadata string from the latest start or set-metadata record
    #[serde(default)]
    pub metadata: String,
    /// Samples in append order
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl TopicLog {
    /// Create an empty log.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            metadata: String::new(),
            samples: Vec::new(),
        }
    }

    /// Set the metadata string.
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// Append a sample (builder form).
    pub fn with_sample(mut self, timestamp: u64, value: LogValue) -> Self {
        self.samples.push(Sample::new(timestamp, value));
        self
    }

    /// Resolve the type name.
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::from_type_name(&self.type_name)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Earliest sample timestamp.
    pub fn min_timestamp(&self) -> Option<u64> {
        self.samples.iter().map(|s| s.timestamp).min()
    }

    /// Latest sample timestamp.
    pub fn max_timestamp(&self) -> Option<u64> {
        self.samples.iter().map(|s| s.timestamp).max()
    }

    /// Compare with bit-exact float semantics.
    pub fn bit_eq(&self, other: &TopicLog) -> bool {
        self.type_name == other.type_name
            && self.metadata == other.metadata
            && self.samples.len() == other.samples.len()
            && self
                .samples
                .iter()
                .zip(&other.samples)
                .all(|(a, b)| a.timestamp == b.timestamp && a.value.bit_eq(&b.value))
    }
}

/// A node in the topic tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopicNode {
    /// Present on typed nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<TopicLog>,
    /// Child segments, in lexicographic order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, TopicNode>,
}

impl TopicNode {
    /// Check if this node carries a typed log.
    pub fn is_typed(&self) -> bool {
        self.log.is_some()
    }

    /// Child by segment name.
    pub fn child(&self, segment: &str) -> Option<&TopicNode> {
        self.children.get(segment)
    }
}

/// Topic tree assembled from (or flattened into) a log.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopicTree {
    /// Untyped root; every topic hangs below it
    pub root: TopicNode,
    /// Earliest timestamp over all samples added to the tree
    #[serde(default)]
    pub start_time: Option<u64>,
    /// Latest timestamp over all samples added to the tree
    #[serde(default)]
    pub end_time: Option<u64>,
}

impl TopicTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the log at `name`, returning the previous log.
    ///
    /// Time bounds are widened by the new log's samples; they are never
    /// narrowed by replacement.
    pub fn insert_log(&mut self, name: &str, log: TopicLog) -> Option<TopicLog> {
        for sample in &log.samples {
            self.observe(sample.timestamp);
        }
        self.node_entry(name).log.replace(log)
    }

    /// Log at `name`, if that node is typed.
    pub fn get(&self, name: &str) -> Option<&TopicLog> {
        self.node(name).and_then(|node| node.log.as_ref())
    }

    /// Mutable log at `name`.
    ///
    /// Samples pushed through this reference do not update the tree time
    /// bounds; use [`push_sample`](Self::push_sample) for that.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TopicLog> {
        let mut node = &mut self.root;
        for segment in name.split(TOPIC_SEPARATOR) {
            node = node.children.get_mut(segment)?;
        }
        node.log.as_mut()
    }

    /// Node at `name`, typed or not.
    pub fn node(&self, name: &str) -> Option<&TopicNode> {
        name.split(TOPIC_SEPARATOR)
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Append a sample to the log at `name`.
    ///
    /// Returns `false` (and drops the sample) if there is no log there.
    pub fn push_sample(&mut self, name: &str, sample: Sample) -> bool {
        let timestamp = sample.timestamp;
        match self.get_mut(name) {
            Some(log) => {
                log.samples.push(sample);
                self.observe(timestamp);
                true
            }
            None => false,
        }
    }

    /// Typed topics as `(full name, log)`, depth first.
    ///
    /// A node's own log comes before its children; children are visited in
    /// lexicographic order.
    pub fn leaves(&self) -> impl Iterator<Item = (String, &TopicLog)> + '_ {
        let mut out = Vec::new();
        for (segment, child) in &self.root.children {
            collect_leaves(child, segment.clone(), &mut out);
        }
        out.into_iter()
    }

    /// Number of typed topics.
    pub fn topic_count(&self) -> usize {
        self.leaves().count()
    }

    /// Total number of samples across all topics.
    pub fn sample_count(&self) -> usize {
        self.leaves().map(|(_, log)| log.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<u64> {
        self.end_time
    }

    /// Copy of the tree holding only topics the filter keeps.
    pub fn filtered(&self, filter: &TopicFilter) -> TopicTree {
        let mut tree = TopicTree::new();
        for (name, log) in self.leaves() {
            if filter.should_include(&name) {
                tree.insert_log(&name, log.clone());
            }
        }
        tree
    }

    /// Compare with bit-exact float semantics.
    pub fn bit_eq(&self, other: &TopicTree) -> bool {
        let ours: Vec<_> = self.leaves().collect();
        let theirs: Vec<_> = other.leaves().collect();
        self.start_time == other.start_time
            && self.end_time == other.end_time
            && ours.len() == theirs.len()
            && ours
                .iter()
                .zip(&theirs)
                .all(|((na, la), (nb, lb))| na == nb && la.bit_eq(lb))
    }

    fn node_entry(&mut self, name: &str) -> &mut TopicNode {
        let mut node = &mut self.root;
        for segment in name.split(TOPIC_SEPARATOR) {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node
    }

    fn observe(&mut self, timestamp: u64) {
        self.start_time = Some(self.start_time.map_or(timestamp, |t| t.min(timestamp)));
        self.end_time = Some(self.end_time.map_or(timestamp, |t| t.max(timestamp)));
    }
}

fn collect_leaves<'a>(node: &'a TopicNode, name: String, out: &mut Vec<(String, &'a TopicLog)>) {
    if let Some(log) = &node.log {
        out.push((name.clone(), log));
    }
    for (segment, child) in &node.children {
        collect_leaves(child, format!("{name}{TOPIC_SEPARATOR}{segment}"), out);
    }
}
