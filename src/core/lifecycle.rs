//! # Run lifecycle shared by arrival processes.
//!
//! Every process owns one [`Lifecycle`]: its name, its [`Bus`], the injected
//! [`Scheduler`] and the mutable [`Run`] state behind a mutex.
//!
//! ## State machine
//! ```text
//!             start()                    tick
//!  Stopped ─────────────► Running ◄──────────────┐
//!     ▲                     │  └─────────────────┘ publish Arrival
//!     │  stop() / expiry    │
//!     └─────────────────────┘ cancel timers, publish Finished (once)
//! ```
//!
//! ## Rules
//! - Each `start()` from `Stopped` opens a new **generation**; timer callbacks
//!   carry the generation they were armed in and do nothing if it is no longer
//!   current (stale) or the process is stopped.
//! - Callbacks, `start()` and `stop()` all mutate [`Run`] under the same lock and
//!   publish while holding it, so per-process notifications keep timer order and
//!   nothing is published after the `stop()` that ended the run has returned.
//! - `Finished` is published exactly once per generation.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::events::{Bus, Event, FinishReason};
use crate::scheduler::{Scheduler, TimerHandle};

/// Running/stopped status of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Stopped,
    Running,
}

/// Mutable state of the current (or last) run.
///
/// `S` is the per-process extra state (tick counter, elapsed accumulator, ...).
pub(crate) struct Run<S> {
    pub status: Status,
    pub generation: u64,
    pub started: Instant,
    pub arrivals: u64,
    pub timers: Vec<TimerHandle>,
    pub model: S,
}

impl<S> Run<S> {
    /// True if a callback armed in `generation` may still act.
    #[inline]
    pub fn is_current(&self, generation: u64) -> bool {
        self.status == Status::Running && self.generation == generation
    }
}

/// Name, bus, scheduler and run state of one process.
pub(crate) struct Lifecycle<S> {
    name: Arc<str>,
    bus: Bus,
    scheduler: Arc<dyn Scheduler>,
    run: Mutex<Run<S>>,
}

impl<S> Lifecycle<S> {
    pub fn new(name: Arc<str>, bus: Bus, scheduler: Arc<dyn Scheduler>, model: S) -> Self {
        let started = scheduler.now();
        Self {
            name,
            bus,
            scheduler,
            run: Mutex::new(Run {
                status: Status::Stopped,
                generation: 0,
                started,
                arrivals: 0,
                timers: Vec::new(),
                model,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler.as_ref()
    }

    /// Locks the run state.
    ///
    /// A poisoned lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, Run<S>> {
        self.run.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_running(&self) -> bool {
        self.lock().status == Status::Running
    }

    /// Transitions `Stopped → Running`, letting `reset` clear per-run state.
    ///
    /// Returns the new generation, or `None` if the process was already running.
    pub fn begin(&self, run: &mut Run<S>, reset: impl FnOnce(&mut S)) -> Option<u64> {
        if run.status == Status::Running {
            debug!(process = %self.name, "start ignored: already running");
            return None;
        }
        run.status = Status::Running;
        run.generation += 1;
        run.started = self.scheduler.now();
        run.arrivals = 0;
        reset(&mut run.model);
        debug!(process = %self.name, generation = run.generation, "run started");
        Some(run.generation)
    }

    /// Records an armed timer so `finish` can cancel it.
    pub fn track(&self, run: &mut Run<S>, timer: TimerHandle) {
        run.timers.push(timer);
    }

    /// Counts and publishes one arrival.
    pub fn arrival(&self, run: &mut Run<S>, elapsed: Duration) {
        run.arrivals += 1;
        self.bus
            .publish(Event::arrival(Arc::clone(&self.name), run.arrivals, elapsed));
    }

    /// Transitions `Running → Stopped`: cancels owned timers and publishes `Finished`.
    ///
    /// Returns `false` (and publishes nothing) if the process was already stopped.
    pub fn finish(&self, run: &mut Run<S>, reason: FinishReason, elapsed: Duration) -> bool {
        if run.status == Status::Stopped {
            return false;
        }
        for timer in run.timers.drain(..) {
            self.scheduler.cancel(&timer);
        }
        run.status = Status::Stopped;
        debug!(
            process = %self.name,
            generation = run.generation,
            arrivals = run.arrivals,
            ?reason,
            ?elapsed,
            "run finished"
        );
        self.bus
            .publish(Event::finished(Arc::clone(&self.name), reason, elapsed));
        true
    }

    /// Wall-clock time since the current run started.
    pub fn since_start(&self, run: &Run<S>) -> Duration {
        self.scheduler.now().saturating_duration_since(run.started)
    }
}

impl<S> Drop for Lifecycle<S> {
    fn drop(&mut self) {
        let run = self.run.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        for timer in run.timers.drain(..) {
            self.scheduler.cancel(&timer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::scheduler::TokioScheduler;

    fn lifecycle() -> Lifecycle<u32> {
        let sched = TokioScheduler::new().expect("runtime");
        Lifecycle::new(Arc::from("test"), Bus::new(16), Arc::new(sched), 0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_begin_is_noop_while_running() {
        let life = lifecycle();
        let mut run = life.lock();
        assert_eq!(life.begin(&mut run, |m| *m = 1), Some(1));
        assert_eq!(life.begin(&mut run, |m| *m = 2), None);
        assert_eq!(run.model, 1);
        assert!(run.is_current(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_publishes_once_and_bumps_generation_on_restart() {
        let life = lifecycle();
        let mut rx = life.bus().subscribe();
        {
            let mut run = life.lock();
            life.begin(&mut run, |_| {});
            life.arrival(&mut run, Duration::from_millis(1));
            assert!(life.finish(&mut run, FinishReason::Stopped, Duration::ZERO));
            assert!(!life.finish(&mut run, FinishReason::Stopped, Duration::ZERO));
            assert!(!run.is_current(1));
            assert_eq!(life.begin(&mut run, |_| {}), Some(2));
            assert_eq!(run.arrivals, 0);
        }

        let first = rx.recv().await.expect("arrival");
        assert_eq!(first.kind, EventKind::Arrival);
        assert_eq!(first.arrival, Some(1));
        let second = rx.recv().await.expect("finished");
        assert_eq!(second.reason, Some(FinishReason::Stopped));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_cancels_tracked_timers() {
        let life = lifecycle();
        let mut run = life.lock();
        life.begin(&mut run, |_| {});
        let timer = life
            .scheduler()
            .schedule_once(Duration::from_secs(1), Box::new(|| {}));
        let token = timer.token().clone();
        life.track(&mut run, timer);

        life.finish(&mut run, FinishReason::Expired, Duration::ZERO);
        assert!(token.is_cancelled());
        assert!(run.timers.is_empty());
    }
}
