use std::time::{Duration, Instant};

use vessel_app::sink::CollectingSink;
use vessel_app::state::Session;
use vessel_core::commands::VesselCommand;
use vessel_core::constants::{DEFAULT_END, DEFAULT_START};
use vessel_core::enums::RunPhase;
use vessel_core::events::VesselEvent;
use vessel_core::state::VesselSnapshot;
use vessel_sim::engine::SimConfig;

fn fast_config() -> SimConfig {
    SimConfig {
        tick_period_ms: 5,
        ..Default::default()
    }
}

fn wait_until(session: &Session, pred: impl Fn(&VesselSnapshot) -> bool) -> VesselSnapshot {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if let Some(snap) = session.latest_snapshot().unwrap() {
            if pred(&snap) {
                return snap;
            }
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("condition not reached before deadline");
}

#[test]
fn test_full_trip_through_session() {
    let sink = CollectingSink::default();
    let emitted = sink.snapshots();
    let session = Session::new();
    session
        .start(fast_config(), 50_000.0, Box::new(sink))
        .unwrap();
    assert!(session.is_running());

    let done = wait_until(&session, |s| s.phase == RunPhase::Complete);
    session.stop().unwrap();
    assert!(!session.is_running());

    assert_eq!(done.position, DEFAULT_END);
    assert_eq!(done.metrics.time_remaining_secs, Some(0));
    assert_eq!(done.metrics.fraction_complete, Some(1.0));

    let emitted = emitted.lock().unwrap();
    assert_eq!(emitted[0].position, DEFAULT_START);
    let fractions: Vec<f64> = emitted
        .iter()
        .map(|s| s.metrics.fraction_complete.unwrap())
        .collect();
    assert!(
        fractions.windows(2).all(|w| w[0] <= w[1]),
        "fractions not monotonic: {fractions:?}"
    );
    let arrivals = emitted
        .iter()
        .flat_map(|s| s.events.iter())
        .filter(|e| matches!(e, VesselEvent::Arrived { .. }))
        .count();
    assert_eq!(arrivals, 1);
}

#[test]
fn test_second_start_is_refused() {
    let session = Session::new();
    session
        .start(fast_config(), 1.0, Box::new(CollectingSink::default()))
        .unwrap();
    let err = session
        .start(fast_config(), 1.0, Box::new(CollectingSink::default()))
        .unwrap_err();
    assert_eq!(err.to_string(), "Simulation already running");

    session.stop().unwrap();
    session
        .start(fast_config(), 1.0, Box::new(CollectingSink::default()))
        .unwrap();
    session.stop().unwrap();
}

#[test]
fn test_stop_holds_position() {
    let session = Session::new();
    session
        .start(fast_config(), 1.0, Box::new(CollectingSink::default()))
        .unwrap();
    session.send_command(VesselCommand::SetSpeed { kmh: 0.0 }).unwrap();

    let stopped = wait_until(&session, |s| s.speed_kmh == 0.0);
    std::thread::sleep(Duration::from_millis(30));
    let later = session.latest_snapshot().unwrap().unwrap();
    session.stop().unwrap();

    assert_eq!(later.position, stopped.position);
    assert!(later.position.is_finite());
    assert_eq!(later.metrics.time_remaining_secs, None);
}

#[test]
fn test_commands_after_stop_fail() {
    let session = Session::new();
    session
        .start(fast_config(), 1.0, Box::new(CollectingSink::default()))
        .unwrap();
    session.stop().unwrap();
    assert!(session.send_command(VesselCommand::IncreaseSpeed).is_err());
}
