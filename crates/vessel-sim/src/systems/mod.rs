//! Per-tick steps run by the engine.

pub mod motion;
pub mod snapshot;
