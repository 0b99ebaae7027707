// crates/dynform-core/src/runtime/events.rs
// ============================================================================
// Module: Form Events
// Description: Structured lifecycle events and JSON-line sinks.
// Purpose: Emit form activity without binding to a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The runtime reports node allocation, value changes, validation
//! settlement, stale async results, and transport retries as
//! [`FormEvent`] values. Sinks receive a [`FormEventRecord`] stamped with
//! the emission time and route it wherever the host wants: stderr, an
//! append-only file, memory for tests, or nowhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::ControlPath;
use crate::core::ControlStatus;
use crate::core::NodeKind;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Form lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    /// A control node was allocated in the store.
    NodeAllocated {
        /// Path of the node.
        path: ControlPath,
        /// Kind of the node.
        kind: NodeKind,
    },
    /// A leaf value changed through user input.
    ValueChanged {
        /// Path of the leaf.
        path: ControlPath,
        /// Generation after the change.
        generation: u64,
    },
    /// A leaf validation finished.
    ValidationSettled {
        /// Path of the leaf.
        path: ControlPath,
        /// Resulting status.
        status: ControlStatus,
        /// Failure keys reported.
        errors: Vec<String>,
    },
    /// An async result arrived for an outdated value and was dropped.
    StaleResultDiscarded {
        /// Path of the leaf.
        path: ControlPath,
        /// Generation the result was computed for.
        ticket_generation: u64,
        /// Generation of the leaf on arrival.
        current_generation: u64,
    },
    /// A transport call failed and will be retried.
    TransportRetry {
        /// Target URL.
        url: String,
        /// Retry number, starting at 1.
        attempt: u32,
        /// Delay before the retry.
        delay_ms: u64,
        /// Failure kind label.
        error_kind: &'static str,
    },
    /// A transport call failed after all retries.
    TransportExhausted {
        /// Target URL.
        url: String,
        /// Attempts made, including the first.
        attempts: u32,
        /// Failure kind label.
        error_kind: &'static str,
    },
}

/// Event stamped with its emission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormEventRecord {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event payload.
    #[serde(flatten)]
    pub event: FormEvent,
}

impl FormEventRecord {
    /// Stamps an event with the current time.
    #[must_use]
    pub fn now(event: FormEvent) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            timestamp_ms,
            event,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for form events.
pub trait FormEventSink: Send + Sync {
    /// Records one event.
    fn record(&self, record: &FormEventRecord);

    /// Stamps and records an event.
    fn emit(&self, event: FormEvent) {
        self.record(&FormEventRecord::now(event));
    }
}

/// Writes events to stderr as JSON lines.
pub struct StderrEventSink;

impl FormEventSink for StderrEventSink {
    fn record(&self, record: &FormEventRecord) {
        if let Ok(payload) = serde_json::to_string(record) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Appends events to a file as JSON lines.
pub struct FileEventSink {
    /// Append-only log file.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens or creates the log file for appending.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl FormEventSink for FileEventSink {
    fn record(&self, record: &FormEventRecord) {
        if let Ok(payload) = serde_json::to_string(record)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
        }
    }
}

/// Drops every event.
pub struct NoopEventSink;

impl FormEventSink for NoopEventSink {
    fn record(&self, _record: &FormEventRecord) {}
}

/// Keeps events in memory.
#[derive(Default)]
pub struct MemoryEventSink {
    /// Recorded events in emission order.
    events: Mutex<Vec<FormEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<FormEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl FormEventSink for MemoryEventSink {
    fn record(&self, record: &FormEventRecord) {
        if let Ok(mut events) = self.events.lock() {
            events.push(record.event.clone());
        }
    }
}
