//! Simulation engine for VIGIL.
//!
//! Owns the hecs ECS world, queues director commands, runs perception,
//! chase, movement, and caught-sequence systems at a fixed tick rate, and
//! produces SimStateSnapshots for the host.

pub mod actuator;
pub mod engine;
pub mod overlay;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use vigil_core as core;

#[cfg(test)]
mod tests;
