//! Detection meter math — bounded rise/decay with distance scaling.
//!
//! The meter rises while the visible fraction clears the tuning threshold
//! and decays otherwise. The rise rate scales with both proximity and how
//! much of the silhouette is exposed; even marginal visibility yields at
//! least half the base rate.

use vigil_core::components::DetectionTuning;
use vigil_core::constants::SATURATION_EPSILON;

/// Result of one meter step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterStep {
    /// New meter value, clamped to `[0, tuning.max]`.
    pub value: f32,
    /// Whether the rise branch was taken (refreshes the last-seen timestamp).
    pub rose: bool,
}

/// Advance the meter by `dt` seconds given the observed visible fraction and
/// the eye-to-target distance.
pub fn advance(
    value: f32,
    visible_fraction: f32,
    distance: f32,
    view_distance: f32,
    dt: f32,
    tuning: &DetectionTuning,
) -> MeterStep {
    if visible_fraction >= tuning.rise_threshold {
        let mut rate = tuning.rise_per_second * visibility_boost(visible_fraction);
        if tuning.scale_by_distance {
            rate *= distance_multiplier(tuning, distance, view_distance);
        }
        MeterStep {
            value: (value + rate * dt).min(tuning.max),
            rose: true,
        }
    } else {
        MeterStep {
            value: decay(value, dt, tuning),
            rose: false,
        }
    }
}

/// Apply decay only (target out of cone, or bookkeeping while sequencing).
pub fn decay(value: f32, dt: f32, tuning: &DetectionTuning) -> f32 {
    (value - tuning.decay_per_second * dt).max(0.0)
}

/// Whether the meter has reached saturation, with a small absolute tolerance
/// for float accumulation error.
pub fn saturated(value: f32, tuning: &DetectionTuning) -> bool {
    value >= tuning.max - SATURATION_EPSILON
}

/// Rise multiplier from distance: `max_rise_multiplier` at `near_distance`,
/// `min_rise_multiplier` at `far_distance` (view distance when unset),
/// clamped outside that range.
pub fn distance_multiplier(tuning: &DetectionTuning, distance: f32, view_distance: f32) -> f32 {
    let near = tuning.near_distance.max(0.01);
    let far = if tuning.far_distance > 0.0 {
        tuning.far_distance
    } else {
        view_distance
    };
    let t = inverse_lerp(far, near, distance);
    lerp(tuning.min_rise_multiplier, tuning.max_rise_multiplier, t)
}

/// Linear boost over visible fraction: 0.5 at barely-visible, 1.0 at fully
/// exposed.
pub fn visibility_boost(visible_fraction: f32) -> f32 {
    lerp(0.5, 1.0, visible_fraction.clamp(0.0, 1.0))
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `v` sits between `a` and `b`, clamped to [0, 1]. Degenerate spans
/// collapse to 0.
fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        0.0
    } else {
        ((v - a) / (b - a)).clamp(0.0, 1.0)
    }
}
