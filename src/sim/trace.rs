//! Chrome Trace Event emission
//!
//! The trace is an append-only sequence of complete ("ph":"X") span
//! events. It needs no polymorphism; a flat record with a single
//! discriminator is sufficient. This is intentionally a subset of the
//! Chrome Trace Event format so outputs load directly in a trace
//! viewer.

use serde::{Deserialize, Serialize};

/// One complete span event, with microsecond timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event name.
    pub name: String,
    /// Category (used for lane coloring in a trace viewer).
    pub cat: String,
    /// Phase. Always `"X"` (complete event) in this subset.
    pub ph: String,
    /// Start timestamp, in microseconds.
    pub ts: f64,
    /// Duration, in microseconds.
    pub dur: f64,
    /// Process id. Always `1`; this engine emits a single logical
    /// process.
    pub pid: i64,
    /// Thread id. Always `1`.
    pub tid: i64,
}

/// An ordered, append-only sequence of trace events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "traceEvents")]
    events: Vec<Event>,
}

impl Trace {
    /// An empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one complete event spanning `[start_ms, end_ms)`.
    /// Milliseconds are converted to microseconds at the boundary.
    pub fn add_complete(&mut self, name: impl Into<String>, cat: impl Into<String>, start_ms: f64, end_ms: f64) {
        self.events.push(Event {
            name: name.into(),
            cat: cat.into(),
            ph: "X".to_string(),
            ts: start_ms * 1000.0,
            dur: (end_ms - start_ms) * 1000.0,
            pid: 1,
            tid: 1,
        });
    }

    /// Placeholder hook for future metadata events (process/thread
    /// naming). A no-op today, kept so callers have a stable place to
    /// finalize a trace before serializing it.
    pub fn finalize(&mut self) {}

    /// The events recorded so far, in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
