//! # arrivals
//!
//! **arrivals** generates synthetic event arrival streams and notifies observers
//! each time an arrival occurs.
//!
//! Two models are provided:
//! - [`UniformProcess`]: one arrival every fixed tick interval;
//! - [`PoissonProcess`]: gaps drawn independently from an exponential distribution.
//!
//! Both optionally finish on their own after a configured duration, and both emit
//! exactly two kinds of notification: `arrival` (per event) and `finished`
//! (once per run).
//!
//! ## Architecture
//! ```text
//!   uniform_process(tick, dur)        poisson_process(mean, dur)
//!              │                                  │
//!              ▼                                  ▼
//!   ┌────────────────────┐             ┌────────────────────┐
//!   │   UniformProcess   │             │   PoissonProcess   │
//!   │ repeating(tick)    │             │ at(due + dt) ────┐ │
//!   │ once(dur + tick/2) │             │   ▲              │ │
//!   └─────────┬──────────┘             │   └── re-arm ◄───┘ │
//!             │                        └─────────┬──────────┘
//!             │  Scheduler (injected; TokioScheduler by default)
//!             ▼                                  ▼
//!        publish(Event)                     publish(Event)
//!             ▼                                  ▼
//!   ┌────────────────────┐             ┌────────────────────┐
//!   │  Bus (broadcast)   │             │  Bus (broadcast)   │
//!   └───┬────────────┬───┘             └───┬────────────┬───┘
//!       ▼            ▼                     ▼            ▼
//!  subscribe()   SubscriberSet        subscribe()   SubscriberSet
//!   receivers    (per-sub queues)      receivers    (per-sub queues)
//! ```
//!
//! ### Lifecycle
//! ```text
//! Stopped ──start()──► Running ──tick──► Running          (publish Arrival)
//!    ▲                    │
//!    └── stop() / expiry ─┘                               (publish Finished once)
//! ```
//!
//! ## Features
//! | Area              | Description                                             | Key types / traits                          |
//! |-------------------|---------------------------------------------------------|---------------------------------------------|
//! | **Processes**     | Uniform and Poisson arrival generators                  | [`UniformProcess`], [`PoissonProcess`], [`ArrivalProcess`] |
//! | **Notifications** | Typed `arrival` / `finished` events on a broadcast bus   | [`Event`], [`EventKind`], [`FinishReason`]  |
//! | **Observers**     | Async subscribers with isolated bounded queues          | [`Subscribe`], [`SubscriberSet`]            |
//! | **Timers**        | Injectable scheduling capability                        | [`Scheduler`], [`TokioScheduler`]           |
//! | **Sampling**      | Inverse-transform exponential sampler                   | [`ExponentialSampler`]                      |
//! | **Errors**        | Construction-time validation                            | [`ArrivalError`]                            |
//! | **Configuration** | Bus capacity, minimum delay, RNG seed                   | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber (renders events via `tracing`).
//!
//! ## Example
//! ```rust
//! use arrivals::{EventKind, FinishReason, poisson_process};
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let p = poisson_process(5.0, Some(1_000.0))?;
//!     let mut rx = p.subscribe();
//!     p.start();
//!
//!     let mut arrivals = 0u64;
//!     let finished = loop {
//!         let ev = rx.recv().await?;
//!         match ev.kind {
//!             EventKind::Arrival => arrivals += 1,
//!             EventKind::Finished => break ev,
//!         }
//!     };
//!
//!     assert_eq!(finished.reason, Some(FinishReason::Expired));
//!     assert!(finished.elapsed.unwrap_or_default().as_millis() >= 1_000);
//!     assert!(arrivals > 0);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod processes;
mod sampling;
mod scheduler;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::Config;
pub use error::ArrivalError;
pub use events::{Bus, Event, EventKind, FinishReason};
pub use processes::{
    ArrivalProcess, PoissonBuilder, PoissonParams, PoissonProcess, ProcessBuilder,
    UniformBuilder, UniformParams, UniformProcess, poisson_process, uniform_process,
};
pub use sampling::ExponentialSampler;
pub use scheduler::{OnceCallback, RepeatingCallback, Scheduler, TimerHandle, TokioScheduler};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
