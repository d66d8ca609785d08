//! Alert state machine.
//!
//! Pure function that computes alert transitions and actuator actions for a
//! single perception check. No ECS dependency — operates on plain data.
//! The caller applies the returned update: actuator engage/disengage calls,
//! component writes, and caught-sequence spawning.

use vigil_core::components::{DetectionMeter, DetectionPolicy, DetectionTuning};
use vigil_core::enums::AlertMode;

use crate::meter;

/// What the perception probe saw this check. `None` when the target never
/// entered the view cone (or could not be resolved at all).
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    /// Fraction of silhouette samples visible, in [0, 1].
    pub visible_fraction: f32,
    /// Eye-to-silhouette-midpoint distance (meters).
    pub distance: f32,
}

/// Input to the alert FSM for a single check.
pub struct AlertContext<'a> {
    pub mode: AlertMode,
    pub meter: DetectionMeter,
    pub tuning: &'a DetectionTuning,
    pub policy: &'a DetectionPolicy,
    /// Simulation-clock timestamp of this check (seconds).
    pub now_secs: f32,
    /// Simulation-clock seconds covered by this check.
    pub dt: f32,
    /// View distance, the fallback far end of the distance-scaling ramp.
    pub view_distance: f32,
    pub observation: Option<Observation>,
}

/// Output from the alert FSM.
#[derive(Debug, Clone, Copy)]
pub struct AlertUpdate {
    pub mode: AlertMode,
    pub meter: DetectionMeter,
    /// Engage the attack/look actuator (Idle → Aggro this check).
    pub engage: bool,
    /// Cancel the current attack and release the look target.
    pub disengage: bool,
    /// The meter saturated: begin the caught sequence. Aggro/attack/look
    /// state must be cleared synchronously before the sequence starts, so
    /// `disengage` is always set alongside this.
    pub start_sequence: bool,
}

/// Evaluate one perception check.
pub fn evaluate(ctx: &AlertContext) -> AlertUpdate {
    let mut update = AlertUpdate {
        mode: ctx.mode,
        meter: ctx.meter,
        engage: false,
        disengage: false,
        start_sequence: false,
    };

    if !ctx.policy.enabled {
        return update;
    }

    // A sequence in flight suppresses everything except decay bookkeeping;
    // re-entrant saturation is silently ignored by design.
    if ctx.mode == AlertMode::Sequencing {
        update.meter.value = meter::decay(ctx.meter.value, ctx.dt, ctx.tuning);
        return update;
    }

    if ctx.policy.always_alert {
        update.meter.value = ctx.tuning.max;
        update.meter.last_seen_secs = ctx.now_secs;
        if ctx.mode == AlertMode::Idle {
            update.engage = true;
        }
        update.mode = AlertMode::Aggro;
        check_saturation(&mut update, ctx);
        return update;
    }

    match ctx.observation {
        None => {
            // Target never entered the cone: decay and evaluate de-aggro;
            // saturation is not checked on this branch.
            update.meter.value = meter::decay(ctx.meter.value, ctx.dt, ctx.tuning);
            update.meter.last_visible_fraction = 0.0;
            check_deaggro(&mut update, ctx);
        }
        Some(obs) => {
            let step = meter::advance(
                ctx.meter.value,
                obs.visible_fraction,
                obs.distance,
                ctx.view_distance,
                ctx.dt,
                ctx.tuning,
            );
            update.meter.value = step.value;
            update.meter.last_visible_fraction = obs.visible_fraction;
            if step.rose {
                update.meter.last_seen_secs = ctx.now_secs;
                if ctx.mode == AlertMode::Idle {
                    update.engage = true;
                    update.mode = AlertMode::Aggro;
                }
            }
            check_deaggro(&mut update, ctx);
            check_saturation(&mut update, ctx);
        }
    }

    update
}

/// Time-hysteresis de-aggro: drop aggro once the last confirmed sighting is
/// older than the grace period. Independent of the meter value.
fn check_deaggro(update: &mut AlertUpdate, ctx: &AlertContext) {
    if update.mode == AlertMode::Aggro
        && ctx.now_secs - update.meter.last_seen_secs > ctx.policy.lose_sight_after
    {
        update.disengage = true;
        update.mode = AlertMode::Idle;
    }
}

fn check_saturation(update: &mut AlertUpdate, ctx: &AlertContext) {
    if meter::saturated(update.meter.value, ctx.tuning) {
        update.start_sequence = true;
        update.disengage = true;
        update.mode = AlertMode::Sequencing;
    }
}
