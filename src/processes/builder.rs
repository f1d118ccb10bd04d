//! # Process builder.
//!
//! [`ProcessBuilder`] collects the parameters shared by both process types
//! (duration, name, config, scheduler, subscribers). The process-specific part
//! `K` holds the defining parameter (tick interval or mean), and `build()` is
//! provided per process type.
//!
//! Validation happens in `build()`, so a builder chain never panics.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use arrivals::{Config, PoissonProcess};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), arrivals::ArrivalError> {
//! let p = PoissonProcess::builder(5.0)
//!     .name("checkout")
//!     .duration(Duration::from_secs(1))
//!     .config(Config { seed: Some(7), ..Config::default() })
//!     .build()?;
//! assert_eq!(p.name(), "checkout");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::core::Config;
use crate::core::lifecycle::Lifecycle;
use crate::error::{ArrivalError, duration_ms};
use crate::events::Bus;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for arrival processes.
pub struct ProcessBuilder<K> {
    pub(crate) kind: K,
    pub(crate) duration_ms: Option<f64>,
    pub(crate) name: Option<Arc<str>>,
    pub(crate) cfg: Config,
    pub(crate) scheduler: Option<Arc<dyn Scheduler>>,
    pub(crate) subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<K> ProcessBuilder<K> {
    pub(crate) fn new(kind: K) -> Self {
        Self {
            kind,
            duration_ms: None,
            name: None,
            cfg: Config::default(),
            scheduler: None,
            subscribers: Vec::new(),
        }
    }

    /// Total lifetime in milliseconds (must be finite and `>= 0`).
    pub fn duration_ms(mut self, ms: f64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    /// Total lifetime.
    pub fn duration(self, d: Duration) -> Self {
        self.duration_ms(d.as_secs_f64() * 1_000.0)
    }

    /// Overrides the process name carried by notifications.
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the plumbing configuration.
    pub fn config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Injects the timer capability (defaults to a [`TokioScheduler`] on the current runtime).
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Adds one observer.
    pub fn subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(sub);
        self
    }

    /// Adds observers.
    ///
    /// Subscribers receive notifications through dedicated workers with bounded
    /// queues; registering any requires a tokio runtime at `build()`.
    pub fn subscribers(mut self, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers.extend(subs);
        self
    }

    /// Validates the optional duration and converts it once.
    pub(crate) fn checked_duration(&self) -> Result<Option<Duration>, ArrivalError> {
        Ok(duration_ms(self.duration_ms)?.map(millis))
    }

    /// Creates bus, scheduler and subscriber workers, and wraps them with `model`.
    pub(crate) fn assemble<S>(self, default_name: &str, model: S) -> Result<Lifecycle<S>, ArrivalError> {
        let name = self.name.unwrap_or_else(|| Arc::from(default_name));
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let scheduler: Arc<dyn Scheduler> = match self.scheduler {
            Some(s) => s,
            None => Arc::new(TokioScheduler::new()?),
        };

        if !self.subscribers.is_empty() {
            let rt = Handle::try_current().map_err(|_| ArrivalError::NoRuntime)?;
            let set = SubscriberSet::new(self.subscribers, &rt);
            // Detached: exits when the process (and its bus) is dropped.
            let _listener = set.listen(bus.subscribe(), &rt);
        }

        Ok(Lifecycle::new(name, bus, scheduler, model))
    }
}

/// Converts validated milliseconds to a [`Duration`], rounded to the nearest
/// nanosecond and saturating on overflow.
pub(crate) fn millis(ms: f64) -> Duration {
    let nanos = (ms * 1_000_000.0).round();
    if nanos >= u64::MAX as f64 {
        Duration::MAX
    } else {
        Duration::from_nanos(nanos as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_conversion() {
        assert_eq!(millis(35.0), Duration::from_millis(35));
        assert_eq!(millis(0.5), Duration::from_micros(500));
        assert_eq!(millis(1e300), Duration::MAX);
    }

    #[test]
    fn test_duration_setter_round_trips_millis() {
        let b = ProcessBuilder::new(()).duration(Duration::from_millis(1_000));
        assert_eq!(b.checked_duration(), Ok(Some(Duration::from_secs(1))));

        let b = ProcessBuilder::new(()).duration_ms(-1.0);
        assert_eq!(
            b.checked_duration(),
            Err(ArrivalError::InvalidDuration { value: -1.0 })
        );
    }
}
