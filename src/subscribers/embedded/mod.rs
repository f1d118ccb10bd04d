//! # Built-in subscribers
//!
//! - [`LogWriter`]: logs notifications through `tracing` (demo/debug).

mod log;

pub use log::LogWriter;
