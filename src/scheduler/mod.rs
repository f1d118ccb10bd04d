//! Timer capability injected into arrival processes.
//!
//! Processes never touch tokio timers directly; they arm and cancel timers through
//! a [`Scheduler`]. The default implementation, [`TokioScheduler`], spawns one
//! lightweight task per timer on a tokio runtime. Substituting another
//! implementation (a different runtime, a high-resolution timer facility, a test
//! double) requires no change to process logic.
//!
//! ## Contract
//! ```text
//! schedule_once(delay, cb)         ─► TimerHandle   cb runs once after `delay`
//! schedule_at(deadline, cb)        ─► TimerHandle   cb runs once at `deadline` (at once if past)
//! schedule_repeating(period, cb)   ─► TimerHandle   cb runs at start + k·period, k = 1, 2, ...
//! cancel(&handle)                                   cb never starts after cancel returns
//! now()                                             monotonic clock used for elapsed time
//! ```
//!
//! ## Rules
//! - `cancel` is idempotent; cancelling a fired or already-cancelled timer is a no-op.
//! - Callbacks are never invoked from inside `schedule_*` itself; processes arm
//!   timers while holding their state lock.
//! - Repeating timers are free-running: tick `k` is due at `start + k·period`,
//!   independent of how long earlier callbacks took.

mod runtime;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub use runtime::TokioScheduler;

/// Callback fired by a one-shot timer.
pub type OnceCallback = Box<dyn FnOnce() + Send + 'static>;

/// Callback fired on every tick of a repeating timer.
pub type RepeatingCallback = Box<dyn FnMut() + Send + 'static>;

static TIMER_IDS: AtomicU64 = AtomicU64::new(1);

/// Handle to an armed timer.
///
/// Owned by whoever armed the timer; pass it to [`Scheduler::cancel`] to disarm.
pub struct TimerHandle {
    id: u64,
    token: CancellationToken,
}

impl TimerHandle {
    /// Creates a fresh handle with a unique id and its own cancellation token.
    ///
    /// Custom [`Scheduler`] implementations use this to mint handles.
    pub fn new() -> Self {
        Self {
            id: TIMER_IDS.fetch_add(1, Ordering::Relaxed),
            token: CancellationToken::new(),
        }
    }

    /// Unique timer id (for logs).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Token cancelled when the timer is disarmed.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// True once the timer has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for TimerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Scheduling capability used by arrival processes.
pub trait Scheduler: Send + Sync + 'static {
    /// Arms a one-shot timer that fires `callback` after `delay`.
    fn schedule_once(&self, delay: Duration, callback: OnceCallback) -> TimerHandle;

    /// Arms a one-shot timer that fires `callback` at `deadline`.
    ///
    /// A deadline already in the past fires as soon as possible, never from
    /// inside this call.
    fn schedule_at(&self, deadline: Instant, callback: OnceCallback) -> TimerHandle {
        self.schedule_once(deadline.saturating_duration_since(self.now()), callback)
    }

    /// Arms a repeating timer that fires `callback` every `interval`.
    fn schedule_repeating(&self, interval: Duration, callback: RepeatingCallback) -> TimerHandle;

    /// Disarms a timer. Must not fail for unknown, fired or already-cancelled handles.
    fn cancel(&self, handle: &TimerHandle) {
        handle.token.cancel();
    }

    /// Current instant on the clock the timers run against.
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Far-future fallback for deadlines that would overflow the clock (~30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Computes `from + delay`, saturating to a far-future deadline instead of panicking.
pub(crate) fn deadline_after(from: Instant, delay: Duration) -> Instant {
    from.checked_add(delay).unwrap_or_else(|| from + FAR_FUTURE)
}
