//! Simulation constants and tuning defaults.

/// Simulation tick rate (Hz). Chase gating and movement run every tick;
/// perception checks run on their own interval (see `DEFAULT_CHECK_INTERVAL`).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Vision ---

/// Default view distance (meters).
pub const DEFAULT_VIEW_DISTANCE: f32 = 12.0;

/// Default full view cone angle (degrees).
pub const DEFAULT_VIEW_ANGLE_DEG: f32 = 110.0;

/// Default interval between perception checks (seconds of simulation time).
pub const DEFAULT_CHECK_INTERVAL: f32 = 0.1;

/// Rays shorter than this are degenerate and skipped.
pub const MIN_RAY_LENGTH: f32 = 1e-3;

// --- Silhouette sampling ---

/// Default sample count on the middle ring.
pub const DEFAULT_MIDDLE_RING_POINTS: u32 = 12;

/// Default sample count on each end ring (when end rings are enabled).
pub const DEFAULT_END_RING_POINTS: u32 = 8;

// --- Detection meter ---

/// Minimum visible fraction required for the meter to rise.
pub const DEFAULT_RISE_THRESHOLD: f32 = 0.5;

/// Base meter rise per second when above the threshold.
pub const DEFAULT_RISE_PER_SECOND: f32 = 40.0;

/// Meter decay per second when below the threshold.
pub const DEFAULT_DECAY_PER_SECOND: f32 = 20.0;

/// Maximum meter value (saturation level).
pub const DEFAULT_METER_MAX: f32 = 100.0;

/// Absolute tolerance on the saturation comparison, absorbing float
/// accumulation error across many small rise steps.
pub const SATURATION_EPSILON: f32 = 1e-3;

// --- Distance scaling ---

/// Distance at which the rise multiplier is at its maximum (meters).
pub const DEFAULT_NEAR_DISTANCE: f32 = 1.5;

/// Distance at which the rise multiplier is at its minimum.
/// Zero means "use the view distance".
pub const DEFAULT_FAR_DISTANCE: f32 = 0.0;

/// Rise multiplier when far away.
pub const DEFAULT_MIN_RISE_MULTIPLIER: f32 = 0.5;

/// Rise multiplier when very close.
pub const DEFAULT_MAX_RISE_MULTIPLIER: f32 = 2.0;

// --- De-aggro ---

/// Seconds after the last confirmed sighting before aggro is dropped.
pub const DEFAULT_LOSE_SIGHT_AFTER: f32 = 2.0;

// --- Caught sequence ---

/// Seconds to fade the overlay in to opaque.
pub const DEFAULT_FADE_IN_SECS: f32 = 0.6;

/// Seconds to hold at full opacity with the message visible.
pub const DEFAULT_HOLD_SECS: f32 = 0.8;

/// Seconds to fade the overlay back out.
pub const DEFAULT_FADE_OUT_SECS: f32 = 0.6;

/// Default overlay message.
pub const DEFAULT_CAUGHT_MESSAGE: &str = "DETECTED";

// --- Chase gate ---

/// Default attack range (meters): distance at which melee can reliably hit.
pub const DEFAULT_ATTACK_RANGE: f32 = 2.2;

/// Default chase hysteresis (meters): half-width of the dead zone around the
/// attack range.
pub const DEFAULT_CHASE_HYSTERESIS: f32 = 0.4;

/// Default stand-off distance from the target when chasing (meters).
pub const DEFAULT_STOP_DISTANCE: f32 = 1.6;

/// Floor for the stop-chase threshold (meters).
pub const MIN_STOP_CHASE_DISTANCE: f32 = 0.01;

/// Default pursuit movement speed (m/s).
pub const DEFAULT_MOVE_SPEED: f32 = 3.5;

// --- Simulation control ---

/// Maximum time scale accepted by the director.
pub const MAX_TIME_SCALE: f32 = 4.0;
