//! # Observers of arrival processes.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out
//! that feeds subscribers registered on a process builder.
//!
//! ## Architecture
//! ```text
//!   timer callback ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                              ├──► LogWriter
//!                                                              ├──► Custom
//!                                                              └──► ...
//! ```
//!
//! Callers that prefer a stream can skip subscribers entirely and read from
//! `process.subscribe()` instead.

#[cfg(feature = "logging")]
mod embedded;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
