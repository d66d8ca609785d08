//! Static world geometry for VIGIL.
//!
//! Provides the occlusion query service consumed by visibility probing:
//! a set of axis-aligned blocker volumes with a segment raycast.

pub mod occluder;

pub use occluder::{BlockerBox, OccluderSet};
pub use vigil_core as core;
