//! Vessel tracker host application.
//!
//! Wires the simulation engine to a periodic tick driver, feeds snapshots
//! to a renderer sink, and forwards operator controls into the engine.

pub mod config;
pub mod controls;
pub mod sink;
pub mod state;
pub mod tick_loop;

pub use vessel_core as core;
