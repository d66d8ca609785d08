//! Simulation state snapshot — the complete visible state produced each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, CueEvent};
use crate::types::SimTime;

/// Complete simulation state handed to the host after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimStateSnapshot {
    pub time: SimTime,
    pub phase: RunPhase,
    pub time_scale: f32,
    pub guards: Vec<GuardView>,
    pub quarry: Option<QuarryView>,
    pub overlay: OverlayView,
    pub alerts: Vec<Alert>,
    pub cues: Vec<CueEvent>,
}

/// A guard's externally visible state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardView {
    pub number: u32,
    pub position: Vec3,
    pub forward: Vec3,
    /// Detection meter value in `[0, detection_max]`.
    pub detection: f32,
    pub detection_max: f32,
    /// Visible fraction from the most recent perception check, in [0, 1].
    pub visible_fraction: f32,
    pub mode: AlertMode,
    pub pursuing: bool,
    /// Current stand-off destination, if pursuit has issued one.
    pub destination: Option<Vec3>,
}

/// The quarry's externally visible state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuarryView {
    pub number: u32,
    pub position: Vec3,
}

/// Full-screen overlay state for the frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayView {
    pub visible: bool,
    /// Opacity in [0, 1].
    pub opacity: f32,
    pub message: String,
}
