//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions taking `&mut World` (or `&World` for
//! read-only). They do not own state — all state lives in components or on
//! the engine.

pub mod chase;
pub mod movement;
pub mod perception;
pub mod sequence;
pub mod snapshot;
