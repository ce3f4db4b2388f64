//! Fundamental geographic and trip types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::MS_PER_HOUR;

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both axes are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Latitude on x, longitude on y.
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.lat, self.lon)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { lat: v.x, lon: v.y }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Trip totals derived from the route length and the current speed.
///
/// Recomputed whenever the speed or the endpoints change; never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripPlan {
    /// Great-circle distance between the endpoints (km).
    pub total_distance_km: f64,
    /// Speed the plan was computed for (km/h).
    pub speed_kmh: f64,
    /// Trip duration in milliseconds. Infinite or NaN when the speed is zero.
    pub total_time_ms: f64,
}

impl TripPlan {
    pub fn new(total_distance_km: f64, speed_kmh: f64) -> Self {
        Self {
            total_distance_km,
            speed_kmh,
            total_time_ms: total_distance_km / speed_kmh * MS_PER_HOUR,
        }
    }

    /// Trip duration, or `None` when the speed leaves it undefined.
    pub fn finite_total_time_ms(&self) -> Option<f64> {
        self.total_time_ms
            .is_finite()
            .then_some(self.total_time_ms)
    }

    /// Completion fraction for an elapsed time, or `None` when not finite.
    ///
    /// Capped at 1: elapsed time may overshoot the duration after a speed
    /// increase. A zero-length trip with a moving vessel counts as already
    /// complete.
    pub fn fraction_at(&self, elapsed_ms: f64) -> Option<f64> {
        let total = self.finite_total_time_ms()?;
        if total == 0.0 {
            return Some(1.0);
        }
        let fraction = elapsed_ms / total;
        fraction.is_finite().then_some(fraction.min(1.0))
    }
}
