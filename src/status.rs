//! The status sink: a single write-only text channel.
//!
//! Every user-visible state transition (files added, file removed, order
//! changed, processing started, success, a specific failure) writes exactly
//! one human-readable message here. Implementations decide presentation:
//! plain console lines, JSON lines for machine consumers, or an in-memory
//! buffer for tests.

use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Write-only channel for human-readable status messages.
pub trait StatusSink {
    /// Write one status message.
    fn write(&self, message: &str);
}

impl<T: StatusSink + ?Sized> StatusSink for Arc<T> {
    fn write(&self, message: &str) {
        (**self).write(message);
    }
}

/// Console sink printing one status line per message.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    quiet: bool,
}

impl ConsoleSink {
    /// Create a console sink.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress all status output
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl StatusSink for ConsoleSink {
    fn write(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }
}

/// One status record as emitted by [`JsonSink`].
#[derive(Debug, Serialize)]
struct StatusRecord<'a> {
    status: &'a str,
}

/// Sink emitting one JSON object per line, for scripts and automation.
#[derive(Debug, Clone, Default)]
pub struct JsonSink;

impl JsonSink {
    /// Create a JSON-lines sink.
    pub fn new() -> Self {
        Self
    }

    fn render(message: &str) -> String {
        // serde_json cannot fail on a struct of one string field.
        serde_json::to_string(&StatusRecord { status: message })
            .unwrap_or_else(|_| String::from("{}"))
    }
}

impl StatusSink for JsonSink {
    fn write(&self, message: &str) {
        println!("{}", Self::render(message));
    }
}

/// In-memory sink recording every message, for assertions in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages written so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    /// Number of messages written.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl StatusSink for MemorySink {
    fn write(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}
