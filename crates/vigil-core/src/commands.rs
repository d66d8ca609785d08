//! Director commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible host actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DirectorCommand {
    // --- Perception control ---
    /// Toggle a guard's perception processing. Disabling clears aggro and
    /// resets the meter.
    SetDetectionEnabled { guard: u32, enabled: bool },
    /// Administrative reset of a guard's meter and sequence guard, used e.g.
    /// on checkpoint or respawn.
    ResetDetection {
        guard: u32,
        clear_aggro: bool,
        hide_overlay: bool,
    },
    /// Immediately aggro a guard onto its target, bypassing cone and
    /// visibility checks.
    ForceAggro { guard: u32 },
    /// Rebind a guard's perception/chase target to a specific quarry, or
    /// back to lazy lookup with `None`.
    SetTarget { guard: u32, quarry: Option<u32> },

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, clamped to [0, 4]). Affects the
    /// simulation clock only; overlay fades run on the real clock.
    SetTimeScale { scale: f32 },
    /// Pause the simulation clock.
    Pause,
    /// Resume the simulation clock.
    Resume,
}
