//! Chase range gate — two-threshold pursuit control with a dead zone.
//!
//! Start chasing when farther than `attack_range + hysteresis`; stop when
//! closer than `attack_range - hysteresis`. Between the two thresholds
//! nothing changes, which prevents oscillation at the range boundary.

use glam::Vec3;

use vigil_core::components::ChaseTuning;
use vigil_core::constants::MIN_STOP_CHASE_DISTANCE;

/// Input to the chase gate for one tick.
pub struct ChaseContext<'a> {
    pub self_position: Vec3,
    pub target_position: Vec3,
    pub tuning: &'a ChaseTuning,
    pub pursuing: bool,
}

/// Output from the chase gate.
#[derive(Debug, Clone, Copy)]
pub struct ChaseUpdate {
    pub pursuing: bool,
    /// Fresh stand-off destination, issued only while beyond the start-chase
    /// threshold. `None` leaves the previously issued destination standing
    /// (dead zone, stop branch, or degenerate direction).
    pub destination: Option<Vec3>,
    /// Whether the pursuit flag flipped this tick.
    pub toggled: bool,
}

/// Evaluate the gate for one tick.
pub fn gate(ctx: &ChaseContext) -> ChaseUpdate {
    let slack = ctx.tuning.hysteresis.max(0.0);
    let start_chase = ctx.tuning.attack_range + slack;
    let stop_chase = (ctx.tuning.attack_range - slack).max(MIN_STOP_CHASE_DISTANCE);

    let distance = ctx.self_position.distance(ctx.target_position);

    let mut update = ChaseUpdate {
        pursuing: ctx.pursuing,
        destination: None,
        toggled: false,
    };

    if distance > start_chase {
        update.pursuing = true;
        // Stand off `stop_distance` short of the target along the approach
        // direction. Coincident positions make the direction degenerate;
        // the previous destination stands.
        update.destination = (ctx.target_position - ctx.self_position)
            .try_normalize()
            .map(|dir| ctx.target_position - dir * ctx.tuning.stop_distance);
    } else if distance < stop_chase {
        update.pursuing = false;
    }

    update.toggled = update.pursuing != ctx.pursuing;
    update
}
