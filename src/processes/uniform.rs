//! # Uniform (fixed-interval) arrival process.
//!
//! Emits an `arrival` every `tick` after `start()`, optionally finishing after a
//! configured duration.
//!
//! ## Timers
//! ```text
//! start() ──► repeating(tick)            ─► tick k at start + k·tick ─► Arrival(k)
//!        └──► once(duration + tick / 2)  ─► finish(Expired)            (if duration set)
//! ```
//!
//! The half-tick grace on the expiry timer lets the last tick inside the window
//! (`k·tick <= duration`) be delivered before the run ends. Ticks scheduled past
//! `duration` that fire inside the grace window are swallowed, so the arrival
//! count never depends on which of two coinciding timers runs first.
//!
//! ## Example
//! ```
//! use arrivals::{EventKind, uniform_process};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let p = uniform_process(10.0, Some(35.0))?;
//! let mut rx = p.subscribe();
//! p.start();
//!
//! let mut arrivals = 0;
//! loop {
//!     match rx.recv().await?.kind {
//!         EventKind::Arrival => arrivals += 1,
//!         EventKind::Finished => break,
//!     }
//! }
//! assert_eq!(arrivals, 3);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::trace;

use super::builder::{ProcessBuilder, millis};
use super::process::ArrivalProcess;
use crate::core::lifecycle::Lifecycle;
use crate::error::{ArrivalError, positive_ms};
use crate::events::{Event, FinishReason};

/// Process-specific builder parameter: the tick interval.
#[derive(Debug, Clone, Copy)]
pub struct UniformParams {
    tick_ms: f64,
}

/// Builder for [`UniformProcess`].
pub type UniformBuilder = ProcessBuilder<UniformParams>;

/// Per-run state: ticks seen so far (delivered or swallowed).
#[derive(Default)]
struct UniformRun {
    ticks: u64,
}

struct UniformInner {
    tick: Duration,
    duration: Option<Duration>,
    life: Lifecycle<UniformRun>,
}

/// Fixed-interval arrival process.
///
/// Cloning yields another handle to the same process.
#[derive(Clone)]
pub struct UniformProcess {
    inner: Arc<UniformInner>,
}

impl UniformProcess {
    /// Starts building a process that ticks every `tick_interval_ms` milliseconds.
    pub fn builder(tick_interval_ms: f64) -> UniformBuilder {
        ProcessBuilder::new(UniformParams {
            tick_ms: tick_interval_ms,
        })
    }

    /// Starts a run: arms the repeating tick timer and, if a duration is set,
    /// the expiry timer.
    ///
    /// Calling `start()` on a running process does nothing.
    pub fn start(&self) -> &Self {
        let inner = &self.inner;
        let mut run = inner.life.lock();
        let Some(generation) = inner.life.begin(&mut run, |m| m.ticks = 0) else {
            return self;
        };

        let weak = Arc::downgrade(inner);
        let ticker = inner.life.scheduler().schedule_repeating(
            inner.tick,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_tick(generation);
                }
            }),
        );
        inner.life.track(&mut run, ticker);

        if let Some(duration) = inner.duration {
            let weak = Arc::downgrade(inner);
            let expiry = inner.life.scheduler().schedule_once(
                duration.saturating_add(inner.tick / 2),
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_expiry(generation);
                    }
                }),
            );
            inner.life.track(&mut run, expiry);
        }
        self
    }

    /// Stops the run, cancels its timers and emits `finished`.
    ///
    /// Calling `stop()` on a stopped process does nothing.
    pub fn stop(&self) -> &Self {
        let life = &self.inner.life;
        let mut run = life.lock();
        let elapsed = life.since_start(&run);
        life.finish(&mut run, FinishReason::Stopped, elapsed);
        self
    }

    /// Process name carried by notifications.
    pub fn name(&self) -> &str {
        self.inner.life.name()
    }

    pub fn is_running(&self) -> bool {
        self.inner.life.is_running()
    }

    /// New receiver for notifications published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.life.bus().subscribe()
    }

    pub fn tick_interval(&self) -> Duration {
        self.inner.tick
    }

    pub fn duration(&self) -> Option<Duration> {
        self.inner.duration
    }

    /// Arrivals delivered in the current (or last) run.
    pub fn arrivals(&self) -> u64 {
        self.inner.life.lock().arrivals
    }
}

impl UniformInner {
    fn on_tick(&self, generation: u64) {
        let mut run = self.life.lock();
        if !run.is_current(generation) {
            return;
        }
        run.model.ticks += 1;
        let ticks = run.model.ticks;

        if let Some(duration) = self.duration {
            let due = self.tick.as_nanos().saturating_mul(u128::from(ticks));
            if due > duration.as_nanos() {
                trace!(process = self.life.name(), tick = ticks, "tick past duration swallowed");
                return;
            }
        }
        let elapsed = self.life.since_start(&run);
        self.life.arrival(&mut run, elapsed);
    }

    fn on_expiry(&self, generation: u64) {
        let mut run = self.life.lock();
        if !run.is_current(generation) {
            return;
        }
        let elapsed = self.life.since_start(&run);
        self.life.finish(&mut run, FinishReason::Expired, elapsed);
    }
}

impl ProcessBuilder<UniformParams> {
    /// Validates parameters and creates a stopped [`UniformProcess`].
    pub fn build(self) -> Result<UniformProcess, ArrivalError> {
        let tick_ms = positive_ms(self.kind.tick_ms, |value| {
            ArrivalError::InvalidTickInterval { value }
        })?;
        let tick = millis(tick_ms);
        if tick.is_zero() {
            return Err(ArrivalError::InvalidTickInterval { value: tick_ms });
        }
        let duration = self.checked_duration()?;
        let life = self.assemble("uniform", UniformRun::default())?;

        Ok(UniformProcess {
            inner: Arc::new(UniformInner {
                tick,
                duration,
                life,
            }),
        })
    }
}

impl ArrivalProcess for UniformProcess {
    fn name(&self) -> &str {
        UniformProcess::name(self)
    }

    fn start(&self) {
        UniformProcess::start(self);
    }

    fn stop(&self) {
        UniformProcess::stop(self);
    }

    fn is_running(&self) -> bool {
        UniformProcess::is_running(self)
    }

    fn subscribe(&self) -> broadcast::Receiver<Event> {
        UniformProcess::subscribe(self)
    }
}
