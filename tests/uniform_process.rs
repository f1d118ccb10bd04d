mod common;

use std::sync::Arc;
use std::time::Duration;

use arrivals::{
    ArrivalError, ArrivalProcess, EventKind, FinishReason, TokioScheduler, UniformProcess,
    uniform_process,
};
use common::{arrivals, assert_silent, finishes, ms, until_finished};
use tokio::time::{self, Instant};

#[tokio::test(start_paused = true)]
async fn three_arrivals_then_finished_at_duration_plus_half_tick() {
    let p = uniform_process(10.0, Some(35.0)).expect("valid");
    let mut rx = p.subscribe();
    let t0 = Instant::now();
    p.start();

    let events = until_finished(&mut rx, t0).await;
    assert_eq!(arrivals(&events), 3);
    assert_eq!(finishes(&events), 1);

    for (k, (at, ev)) in events.iter().take(3).enumerate() {
        let due = ms(10 * (k as u64 + 1));
        assert_eq!(ev.kind, EventKind::Arrival);
        assert_eq!(ev.arrival, Some(k as u64 + 1));
        assert!(*at >= due && *at < due + ms(1), "arrival {k} at {at:?}");
    }

    let (at, fin) = &events[3];
    assert_eq!(fin.reason, Some(FinishReason::Expired));
    assert!(*at >= ms(40) && *at < ms(41), "finished at {at:?}");
    assert!(!p.is_running());

    assert_silent(&mut rx, ms(200)).await;
    assert_eq!(p.arrivals(), 3);
}

#[tokio::test(start_paused = true)]
async fn finished_lands_within_one_tick_of_duration() {
    for &(tick, duration) in &[(10u64, 30u64), (10, 35), (7, 50), (3, 0), (25, 100)] {
        let p = uniform_process(tick as f64, Some(duration as f64)).expect("valid");
        let mut rx = p.subscribe();
        let t0 = Instant::now();
        p.start();

        let events = until_finished(&mut rx, t0).await;
        let (at, _) = events.last().expect("finished");
        assert!(
            *at >= ms(duration) && *at <= ms(duration + tick),
            "tick={tick} duration={duration}: finished at {at:?}"
        );
        assert_eq!(
            arrivals(&events) as u64,
            duration / tick,
            "tick={tick} duration={duration}"
        );
        assert_eq!(finishes(&events), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn running_n_ticks_yields_n_to_n_plus_one_arrivals() {
    let p = uniform_process(10.0, None).expect("valid");
    let mut rx = p.subscribe();
    p.start();

    time::sleep(ms(100) + ms(5)).await;
    let n = p.arrivals();
    assert!((10..=11).contains(&n), "arrivals = {n}");

    p.stop();
    let mut kinds = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        kinds.push(ev.kind);
    }
    assert_eq!(kinds.last(), Some(&EventKind::Finished));
    assert_eq!(kinds.iter().filter(|k| **k == EventKind::Finished).count(), 1);
    assert_silent(&mut rx, ms(100)).await;
}

#[tokio::test(start_paused = true)]
async fn stop_ends_arrivals_and_finishes_once() {
    let p = uniform_process(10.0, Some(1_000.0)).expect("valid");
    let mut rx = p.subscribe();
    p.start();

    time::sleep(ms(25)).await;
    p.stop().stop();

    let events = until_finished(&mut rx, Instant::now()).await;
    assert_eq!(arrivals(&events), 2);
    let (_, fin) = events.last().expect("finished");
    assert_eq!(fin.reason, Some(FinishReason::Stopped));

    assert_silent(&mut rx, ms(2_000)).await;
}

#[tokio::test(start_paused = true)]
async fn stop_on_stopped_process_emits_nothing() {
    let p = uniform_process(10.0, None).expect("valid");
    let mut rx = p.subscribe();
    p.stop();
    assert_silent(&mut rx, ms(50)).await;
}

#[tokio::test(start_paused = true)]
async fn double_start_does_not_double_the_rate() {
    let sched = TokioScheduler::new().expect("runtime");
    let p = UniformProcess::builder(10.0)
        .scheduler(Arc::new(sched.clone()))
        .build()
        .expect("valid");
    p.start().start();
    assert_eq!(sched.active_timers(), 1);

    time::sleep(ms(55)).await;
    assert_eq!(p.arrivals(), 5);
    p.stop();
}

#[tokio::test(start_paused = true)]
async fn restart_after_finished_begins_fresh_run() {
    let p = uniform_process(10.0, Some(20.0)).expect("valid");
    let mut rx = p.subscribe();

    p.start();
    let first = until_finished(&mut rx, Instant::now()).await;
    assert_eq!(arrivals(&first), 2);

    p.start();
    assert!(p.is_running());
    let second = until_finished(&mut rx, Instant::now()).await;
    let ordinals: Vec<_> = second.iter().filter_map(|(_, e)| e.arrival).collect();
    assert_eq!(ordinals, vec![1, 2]);
    assert_eq!(finishes(&second), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_last_handle_cancels_timers() {
    let sched = TokioScheduler::new().expect("runtime");
    let p = UniformProcess::builder(10.0)
        .duration(Duration::from_secs(10))
        .scheduler(Arc::new(sched.clone()))
        .build()
        .expect("valid");
    p.start();
    assert_eq!(sched.active_timers(), 2);

    let clone = p.clone();
    drop(p);
    time::sleep(ms(15)).await;
    assert_eq!(sched.active_timers(), 2, "a live clone keeps the run going");
    assert_eq!(clone.arrivals(), 1);

    drop(clone);
    time::sleep(ms(1)).await;
    assert_eq!(sched.active_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn usable_through_trait_object() {
    let p: Arc<dyn ArrivalProcess> = Arc::new(uniform_process(5.0, Some(12.0)).expect("valid"));
    let mut rx = p.subscribe();
    p.start();
    let events = until_finished(&mut rx, Instant::now()).await;
    assert_eq!(arrivals(&events), 2);
    assert!(events.iter().all(|(_, e)| &*e.process == p.name()));
}

#[tokio::test]
async fn invalid_parameters_are_rejected() {
    assert_eq!(
        uniform_process(0.0, None).err(),
        Some(ArrivalError::InvalidTickInterval { value: 0.0 })
    );
    assert_eq!(
        uniform_process(10.0, Some(-5.0)).err(),
        Some(ArrivalError::InvalidDuration { value: -5.0 })
    );
}
