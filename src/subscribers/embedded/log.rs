//! # LogWriter: notification logger
//!
//! A minimal subscriber that renders each notification as a `tracing` event at
//! info level. Install any `tracing` subscriber to see the output.
//!
//! ## Example output (tracing-subscriber fmt)
//! ```text
//! INFO arrivals: arrival process="uniform" n=1 elapsed=10ms
//! INFO arrivals: arrival process="uniform" n=2 elapsed=20ms
//! INFO arrivals: finished process="uniform" reason=Expired elapsed=40ms
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Notification logger subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Arrival => {
                info!(
                    target: "arrivals",
                    process = %e.process,
                    n = e.arrival.unwrap_or(0),
                    elapsed = ?e.elapsed.unwrap_or_default(),
                    "arrival"
                );
            }
            EventKind::Finished => {
                info!(
                    target: "arrivals",
                    process = %e.process,
                    reason = ?e.reason,
                    elapsed = ?e.elapsed.unwrap_or_default(),
                    "finished"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
