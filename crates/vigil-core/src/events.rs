//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::AlertLevel;

/// Feedback cues for the frontend audio/UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CueEvent {
    /// A guard entered aggro and engaged the quarry.
    AggroGained { guard: u32 },
    /// A guard lost sight long enough to drop aggro.
    AggroLost { guard: u32 },
    /// A guard's meter saturated; the caught sequence started.
    SequenceStarted { guard: u32 },
    /// The external caught callback was invoked.
    CaughtNotified { guard: u32 },
    /// Reload policy fired: the host should tear down and rebuild the scene.
    ReloadRequested { guard: u32 },
    /// The caught sequence finished; a new saturation cycle may begin.
    SequenceCompleted { guard: u32 },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
