//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Perception and chase logic lives in systems, not components.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{AlertMode, SequencePhase};

/// Marks an entity as a perceiving guard. The number identifies the guard in
/// commands, events, and snapshot views.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Guard {
    pub number: u32,
}

/// Marks an entity as a quarry (detection target).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quarry {
    pub number: u32,
}

/// Bounding silhouette of a quarry: an upright capsule derived from its pose.
/// Used only for visibility sampling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Silhouette {
    /// Total capsule height (meters).
    pub height: f32,
    pub radius: f32,
}

impl Default for Silhouette {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.35,
        }
    }
}

/// View cone and perception scheduling parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VisionCone {
    /// Maximum sight distance (meters).
    pub view_distance: f32,
    /// Full cone angle (degrees); membership is tested against half of it.
    pub view_angle_deg: f32,
    /// Simulation-clock interval between perception checks (seconds).
    pub check_interval: f32,
    /// Height of the ray origin above the guard's position (meters).
    pub eye_height: f32,
}

impl Default for VisionCone {
    fn default() -> Self {
        Self {
            view_distance: DEFAULT_VIEW_DISTANCE,
            view_angle_deg: DEFAULT_VIEW_ANGLE_DEG,
            check_interval: DEFAULT_CHECK_INTERVAL,
            eye_height: 1.6,
        }
    }
}

/// Silhouette sampling densities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SilhouetteSampling {
    /// Sample points on the middle ring.
    pub middle_ring_points: u32,
    /// Add inset rings near both capsule poles for better coverage.
    pub end_rings: bool,
    /// Sample points per end ring.
    pub end_ring_points: u32,
}

impl Default for SilhouetteSampling {
    fn default() -> Self {
        Self {
            middle_ring_points: DEFAULT_MIDDLE_RING_POINTS,
            end_rings: true,
            end_ring_points: DEFAULT_END_RING_POINTS,
        }
    }
}

/// Detection meter tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionTuning {
    /// Minimum visible fraction for the meter to rise.
    pub rise_threshold: f32,
    /// Base rise per second above the threshold.
    pub rise_per_second: f32,
    /// Decay per second below the threshold.
    pub decay_per_second: f32,
    /// Saturation level.
    pub max: f32,
    /// Scale the rise rate by distance (closer = faster).
    pub scale_by_distance: bool,
    /// Distance at which the rise multiplier peaks (meters).
    pub near_distance: f32,
    /// Distance at which the rise multiplier bottoms out.
    /// Zero means "use the view distance".
    pub far_distance: f32,
    /// Rise multiplier when far away.
    pub min_rise_multiplier: f32,
    /// Rise multiplier when very close.
    pub max_rise_multiplier: f32,
}

impl Default for DetectionTuning {
    fn default() -> Self {
        Self {
            rise_threshold: DEFAULT_RISE_THRESHOLD,
            rise_per_second: DEFAULT_RISE_PER_SECOND,
            decay_per_second: DEFAULT_DECAY_PER_SECOND,
            max: DEFAULT_METER_MAX,
            scale_by_distance: true,
            near_distance: DEFAULT_NEAR_DISTANCE,
            far_distance: DEFAULT_FAR_DISTANCE,
            min_rise_multiplier: DEFAULT_MIN_RISE_MULTIPLIER,
            max_rise_multiplier: DEFAULT_MAX_RISE_MULTIPLIER,
        }
    }
}

/// Master switches for a guard's perception.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionPolicy {
    /// When false, vision and detection processing is skipped entirely.
    pub enabled: bool,
    /// Permanently aggroed; skips cone/visibility checks and pins the meter
    /// at max every check.
    pub always_alert: bool,
    /// Seconds after the last confirmed sighting before aggro drops.
    pub lose_sight_after: f32,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            always_alert: false,
            lose_sight_after: DEFAULT_LOSE_SIGHT_AFTER,
        }
    }
}

/// Detection meter state. Mutated only by the perception system; reset by
/// de-aggro handling, administrative resets, and sequence completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionMeter {
    /// Confidence value in `[0, tuning.max]`.
    pub value: f32,
    /// Simulation-clock timestamp of the last qualifying sighting.
    pub last_seen_secs: f32,
    /// Visible fraction observed by the most recent perception check.
    pub last_visible_fraction: f32,
}

impl Default for DetectionMeter {
    fn default() -> Self {
        Self {
            value: 0.0,
            last_seen_secs: f32::NEG_INFINITY,
            last_visible_fraction: 0.0,
        }
    }
}

/// Current alert mode of a guard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AlertStatus {
    pub mode: AlertMode,
}

/// Perception check schedule on the simulation clock. Seeded with a random
/// phase offset so co-located guards don't raycast on the same tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CheckSchedule {
    /// Simulation-clock time of the next perception check.
    pub next_at_secs: f32,
}

/// Chase gate tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChaseTuning {
    /// Distance at which melee can reliably hit (meters).
    pub attack_range: f32,
    /// Half-width of the dead zone around the attack range (meters).
    pub hysteresis: f32,
    /// Stand-off distance from the target when chasing (meters).
    pub stop_distance: f32,
    /// Pursuit movement speed (m/s).
    pub move_speed: f32,
}

impl Default for ChaseTuning {
    fn default() -> Self {
        Self {
            attack_range: DEFAULT_ATTACK_RANGE,
            hysteresis: DEFAULT_CHASE_HYSTERESIS,
            stop_distance: DEFAULT_STOP_DISTANCE,
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }
}

/// Chase gate state. Mutated only by the chase system; independent of the
/// guard's alert mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ChaseDrive {
    pub pursuing: bool,
    /// Last issued stand-off destination. Stands when the gate skips an
    /// update (dead zone or degenerate direction).
    pub destination: Option<Vec3>,
}

/// Caught sequence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaughtFlow {
    /// Show the full-screen overlay during the sequence.
    pub show_overlay: bool,
    /// Message displayed on the overlay.
    pub message: String,
    /// Seconds to fade the overlay in (real clock).
    pub fade_in_secs: f32,
    /// Seconds to hold at full opacity (real clock).
    pub hold_secs: f32,
    /// Seconds to fade the overlay back out (real clock).
    pub fade_out_secs: f32,
    /// Request an external reload after the caught notification and end the
    /// sequence early, skipping the reset and fade-out steps.
    pub reload_on_caught: bool,
}

impl Default for CaughtFlow {
    fn default() -> Self {
        Self {
            show_overlay: true,
            message: DEFAULT_CAUGHT_MESSAGE.to_string(),
            fade_in_secs: DEFAULT_FADE_IN_SECS,
            hold_secs: DEFAULT_HOLD_SECS,
            fade_out_secs: DEFAULT_FADE_OUT_SECS,
            reload_on_caught: false,
        }
    }
}

/// In-flight caught sequence state. Present only while a sequence runs;
/// its presence is the per-guard single-flight guard together with
/// `AlertMode::Sequencing`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SequenceRun {
    pub phase: SequencePhase,
    /// Real-clock seconds elapsed in the current phase.
    pub elapsed_in_phase: f32,
    /// Overlay opacity at the start of the current fade.
    pub fade_from: f32,
}

/// Explicit target binding, set by `SetTarget`. When `None`, the guard
/// resolves the first `Quarry` entity lazily each check.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TargetBinding {
    pub quarry_number: Option<u32>,
}
