//! Run reporter handed to every pipeline component
//!
//! Components never log through process-wide state of their own; they receive a
//! `&dyn Reporter` for the duration of one run. [`TracingReporter`] forwards to
//! `tracing` (the subscriber is installed once by the binary), [`RecordingReporter`]
//! keeps messages in memory for tests and embedders.

use std::sync::Mutex;

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

/// Sink for progress and diagnostic messages of one run
pub trait Reporter {
    fn report(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.report(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.report(Level::Warn, message);
    }
}

/// Reporter emitting `tracing` events tagged with the run's package name
#[derive(Debug, Clone)]
pub struct TracingReporter {
    package: String,
}

impl TracingReporter {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }
}

impl Reporter for TracingReporter {
    fn report(&self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!(package = %self.package, "{message}"),
            Level::Info => tracing::info!(package = %self.package, "{message}"),
            Level::Warn => tracing::warn!(package = %self.package, "{message}"),
        }
    }
}

/// Reporter that keeps every message
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Whether any message at `level` contains `needle`
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}
