//! Simulation engine for the vessel tracker.
//!
//! Owns the trip state, advances it on explicit ticks,
//! and produces `VesselSnapshot`s for the renderer.

pub mod engine;
pub mod systems;

pub use engine::{SimConfig, SimulationEngine};
pub use vessel_core as core;
