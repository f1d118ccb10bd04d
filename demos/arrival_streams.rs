//! # Example: arrival_streams
//!
//! Runs a uniform and a Poisson process side by side.
//!
//! Shows how to:
//! - Build processes with the one-call constructors and the builder.
//! - Attach the built-in [`LogWriter`] and a custom [`Subscribe`] implementation.
//! - Wait for `finished` on a broadcast receiver.
//!
//! ## Flow
//! ```text
//! uniform_process(100, 1000) ──► Bus ──► LogWriter (tracing)
//! PoissonProcess::builder(50) ──► Bus ──► GapStats (custom)
//!                                  └────► main: rx.recv() until Finished
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=arrivals=info cargo run --example arrival_streams --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use arrivals::{
    ArrivalProcess, Event, EventKind, LogWriter, PoissonProcess, Subscribe, UniformProcess,
};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

/// Tracks arrivals and the time of the last one, reporting on `finished`.
#[derive(Default)]
struct GapStats {
    arrivals: AtomicU64,
    last_us: AtomicU64,
}

#[async_trait::async_trait]
impl Subscribe for GapStats {
    async fn on_event(&self, ev: &Event) {
        let at = ev.elapsed.unwrap_or_default();
        match ev.kind {
            EventKind::Arrival => {
                self.arrivals.fetch_add(1, Ordering::Relaxed);
                self.last_us.store(at.as_micros() as u64, Ordering::Relaxed);
            }
            EventKind::Finished => {
                let n = self.arrivals.load(Ordering::Relaxed);
                let last = Duration::from_micros(self.last_us.load(Ordering::Relaxed));
                let mean = if n == 0 { Duration::ZERO } else { last / n as u32 };
                println!(
                    "[stats] {}: {n} arrivals, mean gap {mean:?}, finished after {at:?} ({:?})",
                    ev.process,
                    ev.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "gap-stats"
    }
}

async fn wait_finished(mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(ev) if ev.is_finished() => return,
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arrivals=info")),
        )
        .init();

    let uniform = UniformProcess::builder(100.0)
        .name("heartbeat")
        .duration(Duration::from_secs(1))
        .subscriber(Arc::new(LogWriter::new()))
        .build()?;

    let poisson = PoissonProcess::builder(50.0)
        .name("requests")
        .duration(Duration::from_secs(2))
        .seed(7)
        .subscriber(Arc::new(GapStats::default()))
        .build()?;

    let processes: Vec<Arc<dyn ArrivalProcess>> = vec![Arc::new(uniform), Arc::new(poisson)];
    let waits: Vec<_> = processes
        .iter()
        .map(|p| tokio::spawn(wait_finished(p.subscribe())))
        .collect();

    for p in &processes {
        p.start();
    }
    for w in waits {
        w.await?;
    }

    // Let subscriber workers drain their queues.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
