//! Simulation constants and reference defaults.

use crate::types::Coordinate;

/// Mean Earth radius used by the haversine formula (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Milliseconds per hour, for km/h ↔ ms conversions.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

// --- Reference route ---

/// Default departure point.
pub const DEFAULT_START: Coordinate = Coordinate::new(22.1696, 91.4996);

/// Default destination.
pub const DEFAULT_END: Coordinate = Coordinate::new(22.2637, 91.7159);

// --- Speed control ---

/// Initial vessel speed (km/h).
pub const DEFAULT_SPEED_KMH: f64 = 20.0;

/// Step applied by the increase/decrease speed controls (km/h).
pub const SPEED_STEP_KMH: f64 = 50.0;

// --- Tick driver ---

/// Wall-clock period between driver ticks (ms).
pub const TICK_PERIOD_MS: u64 = 500;
