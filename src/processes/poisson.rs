//! # Poisson (memoryless) arrival process.
//!
//! Gaps between arrivals are drawn independently from an exponential
//! distribution with the configured mean (see [`ExponentialSampler`]).
//!
//! ## Loop
//! ```text
//! start() ─► due = now
//!            arm: dt = sample(), due += dt, armed_at = now, at(due) ─┐
//!                                                                  ▼
//!            fire: elapsed += now - armed_at
//!                  ├─ elapsed >= duration ─► finish(Expired), arm nothing
//!                  └─ otherwise           ─► arm next, then publish Arrival
//! ```
//!
//! The next timer is armed **before** `arrival` is published: observers always
//! see a process that has already scheduled its next event. Each firing arms a
//! fresh one-shot timer from the scheduler callback, so long runs never grow the
//! call stack.
//!
//! Deadlines are anchored to the previous **due** instant, not to the moment the
//! previous timer fired. Rounding by the timer wheel therefore never accumulates:
//! gaps shorter than the timer resolution fire as a burst, and the long-run rate
//! stays `1 / mean`.
//!
//! `elapsed` sums the measured gaps on the scheduler clock (nanosecond
//! resolution), so rounding does not compound over many short intervals.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use super::builder::ProcessBuilder;
use super::process::ArrivalProcess;
use crate::core::lifecycle::{Lifecycle, Run};
use crate::error::{ArrivalError, positive_ms};
use crate::events::{Event, FinishReason};
use crate::sampling::ExponentialSampler;
use crate::scheduler::deadline_after;

/// Process-specific builder parameter: the mean gap.
#[derive(Debug, Clone, Copy)]
pub struct PoissonParams {
    mean_ms: f64,
}

/// Builder for [`PoissonProcess`].
pub type PoissonBuilder = ProcessBuilder<PoissonParams>;

/// Per-run state. The sampler persists across runs; `elapsed` resets.
struct PoissonRun {
    sampler: ExponentialSampler,
    elapsed: Duration,
    armed_at: Instant,
    due: Instant,
}

struct PoissonInner {
    duration: Option<Duration>,
    life: Lifecycle<PoissonRun>,
}

/// Memoryless arrival process.
///
/// Cloning yields another handle to the same process.
#[derive(Clone)]
pub struct PoissonProcess {
    inner: Arc<PoissonInner>,
}

impl PoissonProcess {
    /// Starts building a process whose gaps average `mean_ms` milliseconds.
    pub fn builder(mean_ms: f64) -> PoissonBuilder {
        ProcessBuilder::new(PoissonParams { mean_ms })
    }

    /// Starts a run and arms the first gap.
    ///
    /// Calling `start()` on a running process does nothing.
    pub fn start(&self) -> &Self {
        let inner = &self.inner;
        let mut run = inner.life.lock();
        let now = inner.life.scheduler().now();
        let Some(generation) = inner.life.begin(&mut run, |m| {
            m.elapsed = Duration::ZERO;
            m.due = now;
        }) else {
            return self;
        };
        inner.arm(&mut run, generation);
        self
    }

    /// Stops the run, cancels the pending gap and emits `finished`.
    ///
    /// Calling `stop()` on a stopped process does nothing.
    pub fn stop(&self) -> &Self {
        let life = &self.inner.life;
        let mut run = life.lock();
        let elapsed = run.model.elapsed;
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

    /// Mean gap in milliseconds.
    pub fn mean_ms(&self) -> f64 {
        self.inner.life.lock().model.sampler.mean_ms()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.inner.duration
    }

    /// Sum of the measured gaps in the current (or last) run.
    pub fn elapsed(&self) -> Duration {
        self.inner.life.lock().model.elapsed
    }

    /// Arrivals delivered in the current (or last) run.
    pub fn arrivals(&self) -> u64 {
        self.inner.life.lock().arrivals
    }
}

impl PoissonInner {
    /// Draws the next gap and arms a one-shot timer at the end of it.
    fn arm(self: &Arc<Self>, run: &mut Run<PoissonRun>, generation: u64) {
        let scheduler = self.life.scheduler();
        let dt = run.model.sampler.next_delay();
        run.model.due = deadline_after(run.model.due, dt);
        run.model.armed_at = scheduler.now();

        let weak = Arc::downgrade(self);
        let timer = scheduler.schedule_at(
            run.model.due,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_fire(generation);
                }
            }),
        );
        // At most one gap is pending; the previous handle belongs to the timer that just fired.
        run.timers.clear();
        self.life.track(run, timer);
    }

    fn on_fire(self: &Arc<Self>, generation: u64) {
        let mut run = self.life.lock();
        if !run.is_current(generation) {
            return;
        }
        let gap = self
            .life
            .scheduler()
            .now()
            .saturating_duration_since(run.model.armed_at);
        run.model.elapsed = run.model.elapsed.saturating_add(gap);
        let elapsed = run.model.elapsed;

        if self.duration.is_some_and(|limit| elapsed >= limit) {
            self.life.finish(&mut run, FinishReason::Expired, elapsed);
            return;
        }
        self.arm(&mut run, generation);
        self.life.arrival(&mut run, elapsed);
    }
}

impl ProcessBuilder<PoissonParams> {
    /// Fixes the sampler seed for a reproducible stream.
    pub fn seed(mut self, seed: u64) -> Self {
        self.cfg.seed = Some(seed);
        self
    }

    /// Validates parameters and creates a stopped [`PoissonProcess`].
    pub fn build(self) -> Result<PoissonProcess, ArrivalError> {
        let mean_ms = positive_ms(self.kind.mean_ms, |value| ArrivalError::InvalidMean { value })?;
        let duration = self.checked_duration()?;
        let sampler = ExponentialSampler::new(mean_ms, self.cfg.seed)?
            .with_min_delay(self.cfg.min_delay_clamped());
        let now = Instant::now();
        let model = PoissonRun {
            sampler,
            elapsed: Duration::ZERO,
            armed_at: now,
            due: now,
        };
        let life = self.assemble("poisson", model)?;

        Ok(PoissonProcess {
            inner: Arc::new(PoissonInner { duration, life }),
        })
    }
}

impl ArrivalProcess for PoissonProcess {
    fn name(&self) -> &str {
        PoissonProcess::name(self)
    }

    fn start(&self) {
        PoissonProcess::start(self);
    }

    fn stop(&self) {
        PoissonProcess::stop(self);
    }

    fn is_running(&self) -> bool {
        PoissonProcess::is_running(self)
    }

    fn subscribe(&self) -> broadcast::Receiver<Event> {
        PoissonProcess::subscribe(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_rejects_bad_mean() {
        assert_eq!(
            PoissonProcess::builder(0.0).build().err(),
            Some(ArrivalError::InvalidMean { value: 0.0 })
        );
        assert!(PoissonProcess::builder(-1.0).build().is_err());
        assert!(PoissonProcess::builder(f64::INFINITY).build().is_err());
        assert!(
            PoissonProcess::builder(5.0)
                .duration_ms(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_duration_converted_once() {
        let p = PoissonProcess::builder(5.0)
            .duration_ms(1_000.0)
            .seed(1)
            .build()
            .expect("valid");
        assert_eq!(p.duration(), Some(Duration::from_nanos(1_000_000_000)));
        assert_eq!(p.mean_ms(), 5.0);
        assert_eq!(p.elapsed(), Duration::ZERO);
        assert!(!p.is_running());
    }
}
