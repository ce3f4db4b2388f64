//! Geo math for the vessel tracker.
//!
//! Great-circle distance, bearing, and lat/lon interpolation between
//! two endpoints. Pure functions only; no simulation state lives here.

pub use vessel_core as core;

pub mod distance;
pub mod interpolate;

// Re-export key functions for convenience.
pub use distance::{distance, initial_bearing};
pub use interpolate::interpolate;
