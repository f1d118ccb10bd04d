//! Process notifications: types and broadcast bus.
//!
//! This module groups the notification **data model** and the **bus** every
//! arrival process publishes to.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`FinishReason`] notification classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `UniformProcess` and `PoissonProcess` timer callbacks, and their `stop()`.
//! - **Consumers**: receivers from `subscribe()`, and the listener that forwards
//!   to a `SubscriberSet` when subscribers were registered at build time.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, FinishReason};
