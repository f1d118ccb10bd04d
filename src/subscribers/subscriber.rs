//! # Observer trait.
//!
//! Provides [`Subscribe`], the extension point for reacting to `arrival` and
//! `finished` notifications.
//!
//! Each subscriber registered on a process builder gets:
//! - **Dedicated worker task** (runs independently of the timers)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged)
//!
//! ## Rules
//! - A slow subscriber only affects its own queue; timers never wait for it.
//! - Queue overflow drops the event **for this subscriber only** (logged at warn).
//! - Events are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use async_trait::async_trait;
//! use arrivals::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct Counter(AtomicU64);
//!
//! #[async_trait]
//! impl Subscribe for Counter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::Arrival {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Observer of process notifications.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single notification.
    ///
    /// Called from a dedicated worker task, not from the timer callback.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose; override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber (clamped to >= 1).
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
