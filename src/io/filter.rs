// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Topic filtering.
//!
//! Selects topics by full name when extracting a subset of a log, either
//! while walking decoded entries or when pruning an assembled
//! [`TopicTree`](crate::topic::TopicTree).

use std::fmt;
use std::sync::Arc;

use crate::io::metadata::EntryInfo;

/// Filter for selecting topics by name.
#[derive(Clone, Default)]
pub enum TopicFilter {
    /// Keep all topics
    #[default]
    All,
    /// Keep only the named topics
    Include(Vec<String>),
    /// Drop the named topics
    Exclude(Vec<String>),
    /// Keep topics under any of the given name prefixes
    Prefix(Vec<String>),
    /// Keep topics matching a regex
    RegexInclude(Arc<regex::Regex>),
    /// Drop topics matching a regex
    RegexExclude(Arc<regex::Regex>),
    /// Custom predicate
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl fmt::Debug for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.debug_tuple("All").finish(),
            Self::Include(v) => f.debug_tuple("Include").field(v).finish(),
            Self::Exclude(v) => f.debug_tuple("Exclude").field(v).finish(),
            Self::Prefix(v) => f.debug_tuple("Prefix").field(v).finish(),
            Self::RegexInclude(re) => f.debug_tuple("RegexInclude").field(&re.as_str()).finish(),
            Self::RegexExclude(re) => f.debug_tuple("RegexExclude").field(&re.as_str()).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<fn>").finish(),
        }
    }
}

impl TopicFilter {
    /// Check if a topic should be kept.
    pub fn should_include(&self, topic: &str) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Include(topics) => topics.iter().any(|t| t == topic),
            TopicFilter::Exclude(topics) => !topics.iter().any(|t| t == topic),
            TopicFilter::Prefix(prefixes) => prefixes.iter().any(|p| topic.starts_with(p.as_str())),
            TopicFilter::RegexInclude(re) => re.is_match(topic),
            TopicFilter::RegexExclude(re) => !re.is_match(topic),
            TopicFilter::Custom(f) => f(topic),
        }
    }

    /// Check if an entry should be kept.
    pub fn includes_entry(&self, entry: &EntryInfo) -> bool {
        self.should_include(&entry.name)
    }

    /// Check if this filter keeps everything.
    pub fn is_all(&self) -> bool {
        matches!(self, TopicFilter::All)
    }

    /// Create an include filter from topic names.
    pub fn include(topics: Vec<String>) -> Self {
        Self::Include(topics)
    }

    /// Create an exclude filter from topic names.
    pub fn exclude(topics: Vec<String>) -> Self {
        Self::Exclude(topics)
    }

    /// Create a prefix filter.
    pub fn prefix(prefixes: Vec<String>) -> Self {
        Self::Prefix(prefixes)
    }

    /// Create a regex include filter.
    pub fn regex_include(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(|re| Self::RegexInclude(Arc::new(re)))
    }

    /// Create a regex exclude filter.
    pub fn regex_exclude(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(|re| Self::RegexExclude(Arc::new(re)))
    }

    /// Create a custom filter from a function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}
