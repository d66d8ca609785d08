//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Alert state of a guard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertMode {
    /// No awareness of the quarry.
    #[default]
    Idle,
    /// Actively pursuing/attacking the quarry.
    Aggro,
    /// A caught sequence is in flight; perception is suppressed except for
    /// meter decay, and no second sequence may start.
    Sequencing,
}

/// Phase of an in-flight caught sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencePhase {
    /// Overlay fading from transparent to opaque.
    #[default]
    FadeIn,
    /// Holding at full opacity with the message visible.
    Hold,
    /// Overlay fading back to transparent.
    FadeOut,
    /// Sequence finished; the run component is removed this tick.
    Done,
}

/// Top-level run state of the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    #[default]
    Active,
    Paused,
}

/// Surface kind of an occluder volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Blocks visibility rays.
    #[default]
    Solid,
    /// Trigger-only geometry; visibility rays pass through.
    Trigger,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
}
