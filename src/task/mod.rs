// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Background task harness.
//!
//! Runs one full decode or encode on a named worker thread and reports back
//! over a bounded channel:
//!
//! ```text
//! caller                     worker
//!   spawn(command) ------->  run codec
//!   <------------------------ Progress(p)   zero or more, strictly increasing
//!   <------------------------ Finish(out) | Error(e)   exactly one
//! ```
//!
//! The codec reports progress after every record; the harness forwards at
//! most one progress message per [`HarnessConfig::progress_interval`].
//! A panic inside the worker is caught and delivered as
//! [`CodecError::TaskFailed`]. There is no cancellation: dropping the handle
//! detaches the worker, which runs to completion and discards its messages.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wpilog_codec::task::{spawn, HarnessConfig, TaskCommand};
//!
//! let bytes = std::fs::read("match_12.wpilog")?;
//! let handle = spawn(TaskCommand::Decode(bytes), HarnessConfig::default())?;
//! let tree = handle
//!     .wait(|p| eprintln!("{:.0}%", p * 100.0))?
//!     .into_tree()
//!     .unwrap_or_default();
//! println!("{} topics", tree.topic_count());
//! # Ok(())
//! # }
//! ```

pub mod config;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::debug;

pub use config::HarnessConfig;

use crate::topic::{decode_topics, encode_topics, TopicTree};
use crate::{CodecError, Result};

/// Work to run on the harness.
#[derive(Debug, Clone)]
pub enum TaskCommand {
    /// Decode a log buffer into a topic tree
    Decode(Vec<u8>),
    /// Encode a topic tree into a log buffer
    Encode(TopicTree),
}

impl TaskCommand {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskCommand::Decode(_) => "decode",
            TaskCommand::Encode(_) => "encode",
        }
    }

    fn run(self, progress: &mut dyn FnMut(f64)) -> Result<TaskOutput> {
        match self {
            TaskCommand::Decode(bytes) => Ok(TaskOutput::Decoded(decode_topics(&bytes, progress))),
            TaskCommand::Encode(tree) => encode_topics(&tree, progress).map(TaskOutput::Encoded),
        }
    }
}

/// Result of a finished task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    /// Topic tree from a decode
    Decoded(TopicTree),
    /// Log buffer from an encode
    Encoded(Vec<u8>),
}

impl TaskOutput {
    pub fn into_tree(self) -> Option<TopicTree> {
        match self {
            TaskOutput::Decoded(tree) => Some(tree),
            TaskOutput::Encoded(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            TaskOutput::Encoded(bytes) => Some(bytes),
            TaskOutput::Decoded(_) => None,
        }
    }
}

/// Message from worker to caller.
#[derive(Debug)]
pub enum TaskMessage {
    /// Fraction complete, in `[0, 1]`
    Progress(f64),
    /// Terminal success
    Finish(TaskOutput),
    /// Terminal failure
    Error(CodecError),
}

impl TaskMessage {
    /// Check if this message ends the task.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskMessage::Progress(_))
    }
}

/// Rate limiter for progress values.
///
/// Passes a value only if it is strictly greater than the last value passed
/// and at least `interval` has elapsed since then. The first value always
/// passes. Values are clamped to `[0, 1]`; `NaN` never passes.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    last: Option<(Instant, f64)>,
}

impl ProgressThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Offer a progress value observed now.
    pub fn offer(&mut self, progress: f64) -> Option<f64> {
        self.offer_at(progress, Instant::now())
    }

    /// Offer a progress value observed at `now`.
    pub fn offer_at(&mut self, progress: f64, now: Instant) -> Option<f64> {
        if progress.is_nan() {
            return None;
        }
        let progress = progress.clamp(0.0, 1.0);
        if let Some((at, value)) = self.last {
            if progress <= value || now.saturating_duration_since(at) < self.interval {
                return None;
            }
        }
        self.last = Some((now, progress));
        Some(progress)
    }

    /// Last value passed.
    pub fn last_value(&self) -> Option<f64> {
        self.last.map(|(_, value)| value)
    }
}

/// Caller side of a running task.
#[derive(Debug)]
pub struct TaskHandle {
    receiver: Receiver<TaskMessage>,
    thread: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Block for the next message; `None` once the worker is gone.
    pub fn recv(&self) -> Option<TaskMessage> {
        self.receiver.recv().ok()
    }

    /// Block for the next message for at most `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TaskMessage> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Iterate messages until the worker is gone.
    pub fn iter(&self) -> impl Iterator<Item = TaskMessage> + '_ {
        self.receiver.iter()
    }

    /// Worker thread name.
    pub fn thread_name(&self) -> Option<&str> {
        self.thread.as_ref().and_then(|t| t.thread().name())
    }

    /// Wait for the terminal message, forwarding progress to `on_progress`.
    ///
    /// # Errors
    ///
    /// Returns the task's error, or [`CodecError::TaskFailed`] if the worker
    /// went away without a terminal message.
    pub fn wait<F: FnMut(f64)>(mut self, mut on_progress: F) -> Result<TaskOutput> {
        let outcome = loop {
            match self.receiver.recv() {
                Ok(TaskMessage::Progress(p)) => on_progress(p),
                Ok(TaskMessage::Finish(output)) => break Ok(output),
                Ok(TaskMessage::Error(e)) => break Err(e),
                Err(_) => {
                    break Err(CodecError::task_failed(
                        "worker exited without a terminal message",
                    ))
                }
            }
        };
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        outcome
    }
}

/// Run a codec command on a worker thread.
///
/// # Errors
///
/// Fails only if the worker thread cannot be created.
pub fn spawn(command: TaskCommand, config: HarnessConfig) -> Result<TaskHandle> {
    let kind = command.kind();
    spawn_job(kind, config, move |progress| command.run(progress))
}

/// Run an arbitrary job under the harness protocol.
///
/// The job receives a progress sink; values pushed into it are throttled and
/// forwarded as [`TaskMessage::Progress`].
pub fn spawn_job<F>(kind: &'static str, config: HarnessConfig, job: F) -> Result<TaskHandle>
where
    F: FnOnce(&mut dyn FnMut(f64)) -> Result<TaskOutput> + Send + 'static,
{
    if config.thread_name.contains('\0') {
        return Err(CodecError::task_failed(format!(
            "failed to spawn {kind} worker: thread name contains a NUL byte"
        )));
    }
    let (sender, receiver) = bounded(config.channel_capacity);
    let interval = config.progress_interval;

    let thread = thread::Builder::new()
        .name(config.thread_name)
        .spawn(move || run_worker(kind, interval, sender, job))
        .map_err(|e| CodecError::task_failed(format!("failed to spawn {kind} worker: {e}")))?;

    Ok(TaskHandle {
        receiver,
        thread: Some(thread),
    })
}

fn run_worker<F>(kind: &'static str, interval: Duration, sender: Sender<TaskMessage>, job: F)
where
    F: FnOnce(&mut dyn FnMut(f64)) -> Result<TaskOutput>,
{
    debug!(kind, "task started");
    let started = Instant::now();

    let mut throttle = ProgressThrottle::new(interval);
    let progress_sender = sender.clone();
    let mut sink = |p: f64| {
        if let Some(p) = throttle.offer(p) {
            // a dropped handle is not an error; the task still completes
            let _ = progress_sender.send(TaskMessage::Progress(p));
        }
    };

    let message = match panic::catch_unwind(AssertUnwindSafe(|| job(&mut sink))) {
        Ok(Ok(output)) => TaskMessage::Finish(output),
        Ok(Err(e)) => TaskMessage::Error(e),
        Err(payload) => TaskMessage::Error(CodecError::task_failed(format!(
            "{kind} task panicked: {}",
            panic_message(payload.as_ref())
        ))),
    };

    debug!(
        kind,
        ok = matches!(message, TaskMessage::Finish(_)),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "task finished"
    );
    let _ = sender.send(message);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogValue;
    use crate::topic::TopicLog;

    fn sample_tree() -> TopicTree {
        let mut tree = TopicTree::new();
        let mut log = TopicLog::new("double");
        for i in 0..500u64 {
            log.samples
                .push(crate::core::Sample::new(i * 20_000, LogValue::Double(i as f64)));
        }
        tree.insert_log("/drive/speed", log);
        tree.insert_log(
            "/robot/enabled",
            TopicLog::new("boolean").with_sample(0, LogValue::Boolean(true)),
        );
        tree
    }

    fn fast() -> HarnessConfig {
        HarnessConfig::default().with_progress_interval(Duration::ZERO)
    }

    #[test]
    fn test_throttle_interval() {
        let start = Instant::now();
        let mut throttle = ProgressThrottle::new(Duration::from_millis(16));
        assert_eq!(throttle.offer_at(0.1, start), Some(0.1));
        assert_eq!(throttle.offer_at(0.2, start + Duration::from_millis(5)), None);
        assert_eq!(
            throttle.offer_at(0.3, start + Duration::from_millis(16)),
            Some(0.3)
        );
        assert_eq!(throttle.last_value(), Some(0.3));
    }

    #[test]
    fn test_throttle_strictly_increasing() {
        let start = Instant::now();
        let mut throttle = ProgressThrottle::new(Duration::ZERO);
        assert_eq!(throttle.offer_at(0.5, start), Some(0.5));
        assert_eq!(throttle.offer_at(0.5, start), None);
        assert_eq!(throttle.offer_at(0.4, start), None);
        assert_eq!(throttle.offer_at(f64::NAN, start), None);
        assert_eq!(throttle.offer_at(7.0, start), Some(1.0));
        assert_eq!(throttle.offer_at(2.0, start), None);
    }

    #[test]
    fn test_encode_then_decode() {
        let tree = sample_tree();
        let bytes = spawn(TaskCommand::Encode(tree.clone()), fast())
            .unwrap()
            .wait(|_| {})
            .unwrap()
            .into_bytes()
            .unwrap();

        let mut progress = Vec::new();
        let decoded = spawn(TaskCommand::Decode(bytes), fast())
            .unwrap()
            .wait(|p| progress.push(p))
            .unwrap()
            .into_tree()
            .unwrap();

        assert!(decoded.bit_eq(&tree));
        assert!(!progress.is_empty());
        assert!(progress.windows(2).all(|w| w[0] < w[1]));
        assert!(progress.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_exactly_one_terminal_message() {
        let handle = spawn(TaskCommand::Encode(sample_tree()), fast()).unwrap();
        let messages: Vec<TaskMessage> = handle.iter().collect();
        let terminal = messages.iter().filter(|m| m.is_terminal()).count();
        assert_eq!(terminal, 1);
        assert!(messages.last().unwrap().is_terminal());
    }

    #[test]
    fn test_codec_error_reported() {
        let mut tree = TopicTree::new();
        tree.insert_log(
            "/t",
            TopicLog::new("boolean").with_sample(u64::MAX, LogValue::Boolean(false)),
        );
        let err = spawn(TaskCommand::Encode(tree), fast())
            .unwrap()
            .wait(|_| {})
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_panic_becomes_error() {
        let handle = spawn_job("sensor", fast(), |_| panic!("boom")).unwrap();
        match handle.wait(|_| {}) {
            Err(CodecError::TaskFailed { reason }) => {
                assert!(reason.contains("sensor"));
                assert!(reason.contains("boom"));
            }
            other => panic!("expected TaskFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_thread_name() {
        let handle = spawn(
            TaskCommand::Decode(Vec::new()),
            fast().with_thread_name("wpilog-sensor"),
        )
        .unwrap();
        assert_eq!(handle.thread_name(), Some("wpilog-sensor"));
        let tree = handle.wait(|_| {}).unwrap().into_tree().unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_nul_thread_name_rejected() {
        let err = spawn(
            TaskCommand::Decode(Vec::new()),
            fast().with_thread_name("bad\0name"),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::TaskFailed { .. }));
    }

    #[test]
    fn test_dropped_handle_detaches() {
        // capacity 1 would block a worker whose receiver is still alive;
        // with the handle gone, sends fail fast and the worker exits
        let handle = spawn(
            TaskCommand::Encode(sample_tree()),
            fast().with_channel_capacity(1),
        )
        .unwrap();
        drop(handle);
    }
}
