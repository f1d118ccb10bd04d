//! # Notifications emitted by arrival processes.
//!
//! A process emits exactly two kinds of notification:
//! - [`EventKind::Arrival`] once per generated event,
//! - [`EventKind::Finished`] once per run, when the process stops.
//!
//! The [`Event`] struct carries extra metadata (ordinal, elapsed time, reason)
//! that observers are free to ignore.
//!
//! ## Ordering guarantees
//! Each event has a sequence number (`seq`) that increases monotonically across
//! all processes. For one process, events are published in the order their
//! timers fired.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use arrivals::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Arrival, "uniform")
//!     .with_arrival(3)
//!     .with_elapsed(Duration::from_millis(30));
//!
//! assert_eq!(ev.kind.as_str(), "arrival");
//! assert_eq!(ev.arrival, Some(3));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of process notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// One generated arrival.
    ///
    /// Sets:
    /// - `arrival`: 1-based ordinal within the current run
    /// - `elapsed`: time since the run started
    Arrival,

    /// The run ended, either through `stop()` or because its duration expired.
    ///
    /// Emitted exactly once per run.
    ///
    /// Sets:
    /// - `reason`: [`FinishReason`]
    /// - `elapsed`: time since the run started
    Finished,
}

impl EventKind {
    /// Returns the notification name (`"arrival"` or `"finished"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Arrival => "arrival",
            EventKind::Finished => "finished",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishReason {
    /// `stop()` was called.
    Stopped,
    /// The configured duration elapsed.
    Expired,
}

/// Process notification with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Notification classification.
    pub kind: EventKind,
    /// Name of the emitting process.
    pub process: Arc<str>,
    /// Arrival ordinal within the run (starting from 1).
    pub arrival: Option<u64>,
    /// Time since the run started.
    pub elapsed: Option<Duration>,
    /// Set on [`EventKind::Finished`].
    pub reason: Option<FinishReason>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind, process: impl Into<Arc<str>>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            process: process.into(),
            arrival: None,
            elapsed: None,
            reason: None,
        }
    }

    /// Creates an arrival event.
    #[inline]
    pub fn arrival(process: impl Into<Arc<str>>, ordinal: u64, elapsed: Duration) -> Self {
        Event::new(EventKind::Arrival, process)
            .with_arrival(ordinal)
            .with_elapsed(elapsed)
    }

    /// Creates a finished event.
    #[inline]
    pub fn finished(process: impl Into<Arc<str>>, reason: FinishReason, elapsed: Duration) -> Self {
        Event::new(EventKind::Finished, process)
            .with_reason(reason)
            .with_elapsed(elapsed)
    }

    /// Attaches an arrival ordinal.
    #[inline]
    pub fn with_arrival(mut self, n: u64) -> Self {
        self.arrival = Some(n);
        self
    }

    /// Attaches the time elapsed since the run started.
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed = Some(d);
        self
    }

    /// Attaches a finish reason.
    #[inline]
    pub fn with_reason(mut self, reason: FinishReason) -> Self {
        self.reason = Some(reason);
        self
    }

    #[inline]
    pub fn is_arrival(&self) -> bool {
        matches!(self.kind, EventKind::Arrival)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.kind, EventKind::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::Arrival, "p");
        let b = Event::new(EventKind::Arrival, "p");
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_finished_carries_reason() {
        let ev = Event::finished("poisson", FinishReason::Expired, Duration::from_secs(1));
        assert!(ev.is_finished());
        assert_eq!(ev.reason, Some(FinishReason::Expired));
        assert_eq!(ev.elapsed, Some(Duration::from_secs(1)));
        assert_eq!(ev.arrival, None);
        assert_eq!(ev.kind.to_string(), "finished");
    }
}
