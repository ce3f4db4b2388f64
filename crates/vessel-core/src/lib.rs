//! Core types and definitions for the vessel tracker.
//!
//! This crate defines the vocabulary shared across all other crates:
//! coordinates, trip plans, commands, snapshots, events, and constants.
//! It has no dependency on any runtime or rendering framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
