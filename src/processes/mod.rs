//! # Arrival processes.
//!
//! - [`ArrivalProcess`] trait implemented by every process
//! - [`UniformProcess`] fixed-interval arrivals
//! - [`PoissonProcess`] exponentially distributed gaps
//! - [`ProcessBuilder`] shared builder ([`UniformBuilder`], [`PoissonBuilder`])
//! - [`uniform_process`], [`poisson_process`] one-call constructors
//!
//! ## Lifecycle
//! ```text
//! build() ─► Stopped ─start()─► Running ─┬─ tick ──────► Arrival (stays Running)
//!               ▲                        ├─ stop() ────► Finished(Stopped)
//!               └────────────────────────┴─ expiry ────► Finished(Expired)
//! ```
//! A stopped process can be started again; the new run starts from zero.

mod builder;
mod poisson;
mod process;
mod uniform;

pub use builder::ProcessBuilder;
pub use poisson::{PoissonBuilder, PoissonParams, PoissonProcess};
pub use process::ArrivalProcess;
pub use uniform::{UniformBuilder, UniformParams, UniformProcess};

use crate::error::ArrivalError;

/// Creates a stopped uniform process ticking every `tick_interval_ms`, optionally
/// finishing after `duration_ms`.
///
/// Must be called inside a tokio runtime.
///
/// `Some(0.0)` is a zero-length run that finishes without arrivals, not an
/// unlimited one; pass `None` to run until `stop()`.
///
/// # Example
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), arrivals::ArrivalError> {
/// let p = arrivals::uniform_process(10.0, Some(35.0))?;
/// p.start().stop();
/// assert!(!p.is_running());
/// # Ok(())
/// # }
/// ```
pub fn uniform_process(
    tick_interval_ms: f64,
    duration_ms: Option<f64>,
) -> Result<UniformProcess, ArrivalError> {
    let builder = UniformProcess::builder(tick_interval_ms);
    match duration_ms {
        Some(ms) => builder.duration_ms(ms).build(),
        None => builder.build(),
    }
}

/// Creates a stopped Poisson process with mean gap `mean_ms`, optionally
/// finishing once the summed gaps reach `duration_ms`.
///
/// Must be called inside a tokio runtime.
///
/// `Some(0.0)` finishes on the first firing without arrivals; pass `None` to
/// run until `stop()`.
pub fn poisson_process(mean_ms: f64, duration_ms: Option<f64>) -> Result<PoissonProcess, ArrivalError> {
    let builder = PoissonProcess::builder(mean_ms);
    match duration_ms {
        Some(ms) => builder.duration_ms(ms).build(),
        None => builder.build(),
    }
}
