//! Snapshot building: engine state → `VesselSnapshot` for the renderer.

use vessel_core::events::VesselEvent;
use vessel_core::state::{round_2dp, whole_secs, MetricsView, VesselSnapshot};
use vessel_geo::initial_bearing;

use crate::engine::SimulationEngine;

/// Build the complete observable snapshot from engine state.
pub fn build_snapshot(engine: &SimulationEngine, events: Vec<VesselEvent>) -> VesselSnapshot {
    let start = engine.start();
    let position = engine.current_position();

    VesselSnapshot {
        tick: engine.tick_count(),
        phase: engine.phase(),
        start,
        end: engine.end(),
        position,
        bearing_deg: initial_bearing(start, engine.end()),
        trail: vec![start, position],
        speed_kmh: engine.speed_kmh(),
        elapsed_ms: engine.elapsed_ms(),
        metrics: build_metrics(engine),
        events,
    }
}

/// Panel values, rounded the way the observer sees them.
///
/// Remaining distance is derived from the rounded traveled distance.
fn build_metrics(engine: &SimulationEngine) -> MetricsView {
    let total_distance_km = engine.total_distance_km();
    let distance_traveled_km = round_2dp(engine.distance_traveled_km());

    MetricsView {
        total_distance_km: round_2dp(total_distance_km),
        distance_traveled_km,
        distance_remaining_km: round_2dp(total_distance_km - distance_traveled_km),
        time_remaining_secs: engine.time_remaining_ms().and_then(whole_secs),
        elapsed_secs: whole_secs(engine.elapsed_ms()).unwrap_or(0),
        total_time_secs: engine.trip().finite_total_time_ms().and_then(whole_secs),
        fraction_complete: engine.fraction_complete(),
    }
}
