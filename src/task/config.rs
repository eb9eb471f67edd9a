// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Task harness configuration.
//!
//! Built in code with `with_*` setters or loaded from TOML:
//!
//! ```toml
//! [harness]
//! progress_interval_ms = 16
//! channel_capacity = 64
//! thread_name = "wpilog-task"
//! ```
//!
//! Missing keys keep their defaults.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{CodecError, Result};

/// Default minimum time between forwarded progress messages.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(16);

/// Default bound of the worker-to-caller channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Default worker thread name.
pub const DEFAULT_THREAD_NAME: &str = "wpilog-task";

/// Configuration for one harness task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Minimum wall time between forwarded progress messages
    pub progress_interval: Duration,
    /// Capacity of the bounded message channel
    pub channel_capacity: usize,
    /// Name given to the worker thread
    pub thread_name: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    harness: HarnessSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HarnessSection {
    progress_interval_ms: Option<u64>,
    channel_capacity: Option<usize>,
    thread_name: Option<String>,
}

impl HarnessConfig {
    /// Set the progress interval.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Set the worker thread name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Fails on invalid TOML, unknown keys, a zero channel capacity, or a
    /// thread name with a NUL byte.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| CodecError::parse("HarnessConfig", e.to_string()))?;
        let section = file.harness;

        let mut config = Self::default();
        if let Some(ms) = section.progress_interval_ms {
            config.progress_interval = Duration::from_millis(ms);
        }
        if let Some(capacity) = section.channel_capacity {
            if capacity == 0 {
                return Err(CodecError::parse(
                    "HarnessConfig",
                    "channel_capacity must be at least 1",
                ));
            }
            config.channel_capacity = capacity;
        }
        if let Some(name) = section.thread_name {
            if name.contains('\0') {
                return Err(CodecError::parse(
                    "HarnessConfig",
                    "thread_name must not contain NUL bytes",
                ));
            }
            config.thread_name = name;
        }
        Ok(config)
    }

    /// Load a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let text = std::fs::read_to_string(path_ref).map_err(|e| {
            CodecError::io(
                "HarnessConfig",
                format!("Failed to read '{}': {e}", path_ref.display()),
            )
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.progress_interval, Duration::from_millis(16));
        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.thread_name, "wpilog-task");
    }

    #[test]
    fn test_builder() {
        let config = HarnessConfig::default()
            .with_progress_interval(Duration::ZERO)
            .with_channel_capacity(2)
            .with_thread_name("decode");
        assert_eq!(config.progress_interval, Duration::ZERO);
        assert_eq!(config.channel_capacity, 2);
        assert_eq!(config.thread_name, "decode");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = HarnessConfig::from_toml_str("[harness]\nprogress_interval_ms = 100\n").unwrap();
        assert_eq!(config.progress_interval, Duration::from_millis(100));
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);

        let empty = HarnessConfig::from_toml_str("").unwrap();
        assert_eq!(empty, HarnessConfig::default());
    }

    #[test]
    fn test_from_toml_full() {
        let text = r#"
            [harness]
            progress_interval_ms = 0
            channel_capacity = 8
            thread_name = "bg"
        "#;
        let config = HarnessConfig::from_toml_str(text).unwrap();
        assert_eq!(
            config,
            HarnessConfig::default()
                .with_progress_interval(Duration::ZERO)
                .with_channel_capacity(8)
                .with_thread_name("bg")
        );
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        assert!(HarnessConfig::from_toml_str("[harness]\nchannel_capacity = 0").is_err());
        assert!(HarnessConfig::from_toml_str("[harness]\nunknown = 1").is_err());
        assert!(HarnessConfig::from_toml_str("[harness").is_err());
        let nul_name = "[harness]\nthread_name = \"bad\\u0000name\"\n";
        assert!(HarnessConfig::from_toml_str(nul_name).is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = HarnessConfig::from_file("/nonexistent/wpilog.toml").unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
    }
}
