//! Vessel snapshot: the complete observable state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::RunPhase;
use crate::events::VesselEvent;
use crate::types::Coordinate;

/// Complete state broadcast to the renderer after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VesselSnapshot {
    /// Number of ticks the engine has processed.
    pub tick: u64,
    pub phase: RunPhase,
    pub start: Coordinate,
    pub end: Coordinate,
    /// Current vessel position (last valid value when the fraction is undefined).
    pub position: Coordinate,
    /// Forward azimuth from start to end (degrees, 0 = North).
    pub bearing_deg: f64,
    /// Line already sailed, from the start to the current position.
    pub trail: Vec<Coordinate>,
    pub speed_kmh: f64,
    /// Unrounded elapsed simulated time (ms).
    pub elapsed_ms: f64,
    pub metrics: MetricsView,
    pub events: Vec<VesselEvent>,
}

/// Metrics panel values, pre-rounded for display.
///
/// Distances are rounded to 2 decimals, times are floored to whole seconds.
/// Time fields are `None` while the trip duration is undefined (speed 0).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsView {
    pub total_distance_km: f64,
    pub distance_traveled_km: f64,
    /// Goes negative when a speed increase overshoots the route; reported as-is.
    pub distance_remaining_km: f64,
    pub time_remaining_secs: Option<u64>,
    pub elapsed_secs: u64,
    pub total_time_secs: Option<u64>,
    pub fraction_complete: Option<f64>,
}

/// Round to 2 decimal places, `round(x * 100) / 100`.
pub fn round_2dp(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Floor milliseconds to whole seconds. `None` for non-finite input.
///
/// Negative input floors to 0.
pub fn whole_secs(ms: f64) -> Option<u64> {
    if !ms.is_finite() {
        return None;
    }
    Some((ms / 1000.0).floor().max(0.0) as u64)
}
