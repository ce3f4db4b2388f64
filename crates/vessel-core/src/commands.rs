//! Operator commands sent from the host to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// All possible operator actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VesselCommand {
    /// Set an absolute speed (km/h). Negative values floor at 0.
    SetSpeed { kmh: f64 },
    /// Raise the speed by the configured step.
    IncreaseSpeed,
    /// Lower the speed by the configured step, never below 0.
    DecreaseSpeed,
    /// Replace both endpoints and start the trip over.
    SetRoute { start: Coordinate, end: Coordinate },
    /// Start the trip over on the current route.
    Restart,
}
