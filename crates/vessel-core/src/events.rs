//! Events emitted by the simulation for the observer.

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VesselEvent {
    /// Speed changed through a command or a direct call.
    SpeedChanged { from_kmh: f64, to_kmh: f64 },
    /// Endpoints were replaced; elapsed time reset to zero.
    RouteChanged { start: Coordinate, end: Coordinate },
    /// Elapsed time reset to zero on the same route.
    Restarted,
    /// The vessel reached the destination.
    Arrived { elapsed_ms: f64 },
    /// A speed change reopened a completed trip.
    Resumed { elapsed_ms: f64 },
}
