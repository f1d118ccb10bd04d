//! # Tokio-backed scheduler.
//!
//! [`TokioScheduler`] arms each timer as a small task on a tokio runtime:
//!
//! ```text
//! schedule_at        ──► spawn { select! { cancelled ─► exit, sleep_until(deadline) ─► cb() } }
//! schedule_once      ──► schedule_at(now + delay)
//! schedule_repeating ──► spawn { interval_at(start + period, period)
//!                                loop { select! { cancelled ─► exit, tick ─► cb() } } }
//! cancel             ──► token.cancel()
//! ```
//!
//! Deadlines are computed when the timer is armed, not when the task is first
//! polled, so spawn latency does not shift the schedule. Cancellation is polled
//! first (`biased`), so a timer cancelled before its deadline never runs its callback.
//!
//! Resolution follows the tokio timer wheel (1 ms).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::select;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

use super::{OnceCallback, RepeatingCallback, Scheduler, TimerHandle, deadline_after};
use crate::error::ArrivalError;

/// Scheduler that runs timers as tasks on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: Handle,
    active: Arc<AtomicUsize>,
}

impl TokioScheduler {
    /// Creates a scheduler bound to the runtime of the calling context.
    ///
    /// Returns [`ArrivalError::NoRuntime`] when called outside a tokio runtime.
    pub fn new() -> Result<Self, ArrivalError> {
        let handle = Handle::try_current().map_err(|_| ArrivalError::NoRuntime)?;
        Ok(Self::with_handle(handle))
    }

    /// Creates a scheduler bound to an explicit runtime handle.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of timer tasks that have not exited yet.
    ///
    /// A cancelled timer counts until its task observes the cancellation.
    pub fn active_timers(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}

/// Keeps `active` accurate however the timer task exits.
struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn enter(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(active))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerHandle {
        self.schedule_at(deadline_after(self.now(), delay), callback)
    }

    fn schedule_at(&self, deadline: Instant, callback: OnceCallback) -> TimerHandle {
        let timer = TimerHandle::new();
        let token = timer.token().clone();
        let id = timer.id();
        let guard = ActiveGuard::enter(&self.active);

        self.handle.spawn(async move {
            let _guard = guard;
            select! {
                biased;
                _ = token.cancelled() => {
                    trace!(timer = id, "one-shot timer cancelled");
                }
                _ = time::sleep_until(deadline) => {
                    callback();
                }
            }
        });
        timer
    }

    fn schedule_repeating(&self, interval: Duration, mut callback: RepeatingCallback) -> TimerHandle {
        let timer = TimerHandle::new();
        let token = timer.token().clone();
        let id = timer.id();
        let period = interval.max(Duration::from_nanos(1));
        let start = deadline_after(self.now(), period);
        let guard = ActiveGuard::enter(&self.active);

        self.handle.spawn(async move {
            let _guard = guard;
            let mut ticker = time::interval_at(start, period);
            // Burst keeps every tick on the start + k·period grid.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                select! {
                    biased;
                    _ = token.cancelled() => {
                        trace!(timer = id, "repeating timer cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        callback();
                    }
                }
            }
        });
        timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_new_outside_runtime_fails() {
        assert_eq!(TokioScheduler::new().err(), Some(ArrivalError::NoRuntime));
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_fires_after_delay() {
        let sched = TokioScheduler::new().expect("runtime");
        let fired = Arc::new(Mutex::new(None));
        let start = Instant::now();

        let slot = Arc::clone(&fired);
        let _h = sched.schedule_once(
            Duration::from_millis(25),
            Box::new(move || *slot.lock().unwrap() = Some(Instant::now())),
        );

        time::sleep(Duration::from_millis(30)).await;
        let at = fired.lock().unwrap().expect("timer fired");
        let waited = at - start;
        assert!(waited >= Duration::from_millis(25), "fired early: {waited:?}");
        assert!(waited < Duration::from_millis(26), "fired late: {waited:?}");
        assert_eq!(sched.active_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_once_never_fires() {
        let sched = TokioScheduler::new().expect("runtime");
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let h = sched.schedule_once(
            Duration::from_millis(10),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        sched.cancel(&h);
        sched.cancel(&h);

        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(h.is_cancelled());
        assert_eq!(sched.active_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_ticks_on_fixed_grid() {
        let sched = TokioScheduler::new().expect("runtime");
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();

        let sink = Arc::clone(&ticks);
        let h = sched.schedule_repeating(
            Duration::from_millis(10),
            Box::new(move || sink.lock().unwrap().push(Instant::now() - start)),
        );

        time::sleep(Duration::from_millis(45)).await;
        sched.cancel(&h);
        time::sleep(Duration::from_millis(30)).await;

        let got = ticks.lock().unwrap().clone();
        assert_eq!(got.len(), 4, "ticks: {got:?}");
        for (k, at) in got.iter().enumerate() {
            let due = Duration::from_millis(10 * (k as u64 + 1));
            assert!(*at >= due && *at < due + Duration::from_millis(1), "tick {k} at {at:?}");
        }
        assert_eq!(sched.active_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_at_past_deadline_fires_without_waiting() {
        let sched = TokioScheduler::new().expect("runtime");
        let start = Instant::now();
        time::sleep(Duration::from_millis(3)).await;

        let fired = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3u64 {
            let slot = Arc::clone(&fired);
            let _h = sched.schedule_at(
                start + Duration::from_micros(200 * n),
                Box::new(move || slot.lock().unwrap().push(Instant::now())),
            );
        }
        assert!(fired.lock().unwrap().is_empty(), "fired inside schedule_at");

        tokio::task::yield_now().await;
        time::sleep(Duration::from_millis(1)).await;
        let got = fired.lock().unwrap().clone();
        assert_eq!(got.len(), 3);
        assert!(got.iter().all(|at| *at - start < Duration::from_millis(4)));
    }
}
