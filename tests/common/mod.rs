#![allow(dead_code)]

use std::time::Duration;

use arrivals::Event;
use tokio::sync::broadcast::Receiver;
use tokio::time::Instant;

/// Receives until (and including) the first `Finished`, stamping each event
/// with the virtual time elapsed since `t0`.
pub async fn until_finished(rx: &mut Receiver<Event>, t0: Instant) -> Vec<(Duration, Event)> {
    let mut out = Vec::new();
    loop {
        let ev = tokio::time::timeout(Duration::from_secs(3_600), rx.recv())
            .await
            .expect("process never finished")
            .expect("bus closed or lagged");
        let done = ev.is_finished();
        out.push((t0.elapsed(), ev));
        if done {
            return out;
        }
    }
}

/// Counts arrivals in a collected stream.
pub fn arrivals(events: &[(Duration, Event)]) -> usize {
    events.iter().filter(|(_, e)| e.is_arrival()).count()
}

/// Counts finished notifications in a collected stream.
pub fn finishes(events: &[(Duration, Event)]) -> usize {
    events.iter().filter(|(_, e)| e.is_finished()).count()
}

/// Asserts that nothing more is published within `quiet`.
pub async fn assert_silent(rx: &mut Receiver<Event>, quiet: Duration) {
    tokio::time::sleep(quiet).await;
    assert!(rx.try_recv().is_err(), "unexpected event after finish");
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
