//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Run state of the trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Elapsed time is below the trip duration (or the duration is undefined).
    #[default]
    Running,
    /// Elapsed time has reached the trip duration. Ticks are no-ops.
    Complete,
}

/// What happens to elapsed time when the speed changes mid-trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedChangePolicy {
    /// Elapsed time is kept as-is, so the completion fraction jumps with the
    /// new trip duration. Raising the speed moves the vessel forward at once.
    #[default]
    PreserveElapsed,
    /// Elapsed time is rescaled so the completion fraction (and position)
    /// stays continuous across the change.
    RescaleElapsed,
}
