//! # Arrival process abstraction.
//!
//! [`ArrivalProcess`] is the capability both [`UniformProcess`](crate::UniformProcess)
//! and [`PoissonProcess`](crate::PoissonProcess) implement: a running/stopped
//! state, a notification stream and `start`/`stop`.
//!
//! The concrete types also offer inherent `start`/`stop` returning `&Self` for
//! chaining; the trait methods are object-safe so processes can be held as
//! `Arc<dyn ArrivalProcess>`.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use arrivals::{ArrivalProcess, poisson_process, uniform_process};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), arrivals::ArrivalError> {
//! let fleet: Vec<Arc<dyn ArrivalProcess>> = vec![
//!     Arc::new(uniform_process(10.0, None)?),
//!     Arc::new(poisson_process(5.0, None)?),
//! ];
//! for p in &fleet {
//!     p.start();
//! }
//! assert!(fleet.iter().all(|p| p.is_running()));
//! for p in &fleet {
//!     p.stop();
//! }
//! # Ok(())
//! # }
//! ```

use tokio::sync::broadcast;

use crate::events::Event;

/// Generator of `arrival` / `finished` notifications.
pub trait ArrivalProcess: Send + Sync + 'static {
    /// Process name carried by every notification.
    fn name(&self) -> &str;

    /// Starts a run. No-op if already running.
    fn start(&self);

    /// Stops the current run and emits `finished`. No-op if already stopped.
    fn stop(&self);

    /// True between `start()` and the end of the run.
    fn is_running(&self) -> bool;

    /// New receiver for notifications published from now on.
    fn subscribe(&self) -> broadcast::Receiver<Event>;
}
