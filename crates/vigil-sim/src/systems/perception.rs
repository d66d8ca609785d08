//! Perception system — runs each guard's due vision check.
//!
//! Resolves the target, gates on the view cone, samples the silhouette,
//! probes occlusion, advances the detection meter, and applies the alert
//! FSM's transitions: actuator engage/disengage, feedback cues, and
//! caught-sequence spawning.

use glam::Vec3;
use hecs::{Entity, World};

use vigil_core::components::*;
use vigil_core::enums::AlertMode;
use vigil_core::events::CueEvent;
use vigil_core::types::{Capsule, Pose};
use vigil_perception::fsm::{self, AlertContext, AlertUpdate, Observation};
use vigil_perception::probe::{probe_visibility, ViewCone};
use vigil_perception::sampler::sample_silhouette;
use vigil_world::OccluderSet;

use crate::actuator::ActuatorBox;

/// One resolved target candidate.
struct TargetInfo {
    number: u32,
    position: Vec3,
    silhouette: Silhouette,
}

/// Run perception for all guards whose check is due at `now_secs`
/// (simulation clock). `samples` is a reusable scratch buffer.
pub fn run(
    world: &mut World,
    occluders: &OccluderSet,
    now_secs: f32,
    cues: &mut Vec<CueEvent>,
    samples: &mut Vec<Vec3>,
) {
    let mut targets: Vec<TargetInfo> = world
        .query::<(&Quarry, &Pose, &Silhouette)>()
        .iter()
        .map(|(_, (quarry, pose, silhouette))| TargetInfo {
            number: quarry.number,
            position: pose.position,
            silhouette: *silhouette,
        })
        .collect();
    // Lowest number is the default target; world iteration order is not
    // part of the deterministic contract.
    targets.sort_by_key(|t| t.number);

    // Collect updates in a buffer to avoid borrow issues with hecs.
    let mut updates: Vec<(Entity, u32, Option<(AlertUpdate, u32, Vec3)>, f32)> = Vec::new();

    {
        let mut query = world.query::<(
            &Guard,
            &Pose,
            &VisionCone,
            &SilhouetteSampling,
            &DetectionTuning,
            &DetectionPolicy,
            &DetectionMeter,
            &AlertStatus,
            &CheckSchedule,
            &TargetBinding,
        )>();
        for (entity, (guard, pose, vision, sampling, tuning, policy, meter, status, schedule, binding)) in
            query.iter()
        {
            if !policy.enabled {
                continue;
            }
            if now_secs < schedule.next_at_secs {
                continue;
            }
            let next_at = schedule.next_at_secs + vision.check_interval;

            // Lazy target resolution: explicit binding wins, otherwise the
            // first quarry. A missing target consumes the check as a no-op.
            let target = match binding.quarry_number {
                Some(number) => targets.iter().find(|t| t.number == number),
                None => targets.first(),
            };
            let Some(target) = target else {
                updates.push((entity, guard.number, None, next_at));
                continue;
            };

            let observation = if policy.always_alert {
                // Deliberate bypass: no geometry queries at all.
                None
            } else {
                let cone = ViewCone::from_pose(pose, vision);
                if cone.contains(target.position) {
                    let eye = pose.position + Vec3::Y * vision.eye_height;
                    let capsule = Capsule::upright(
                        target.position,
                        target.silhouette.height,
                        target.silhouette.radius,
                    );
                    sample_silhouette(&capsule, eye, sampling, samples);
                    let count = probe_visibility(eye, &cone, samples, |from, to| {
                        occluders.segment_blocked(from, to)
                    });
                    Some(Observation {
                        visible_fraction: count.fraction(),
                        distance: eye.distance(capsule.midpoint()),
                    })
                } else {
                    None
                }
            };

            let ctx = AlertContext {
                mode: status.mode,
                meter: *meter,
                tuning,
                policy,
                now_secs,
                dt: vision.check_interval,
                view_distance: vision.view_distance,
                observation,
            };
            updates.push((
                entity,
                guard.number,
                Some((fsm::evaluate(&ctx), target.number, target.position)),
                next_at,
            ));
        }
    }

    // Apply updates.
    for (entity, guard_number, outcome, next_at) in updates {
        if let Ok(mut schedule) = world.get::<&mut CheckSchedule>(entity) {
            schedule.next_at_secs = next_at;
        }
        let Some((update, target_number, target_position)) = outcome else {
            continue;
        };

        if let Ok(mut meter) = world.get::<&mut DetectionMeter>(entity) {
            *meter = update.meter;
        }
        if let Ok(mut status) = world.get::<&mut AlertStatus>(entity) {
            status.mode = update.mode;
        }

        // Look actuation: an aggroed guard turns toward its target, so the
        // view cone tracks the quarry until aggro drops.
        if update.mode == AlertMode::Aggro {
            if let Ok(mut pose) = world.get::<&mut Pose>(entity) {
                let to_target = target_position - pose.position;
                if let Some(flat) = Vec3::new(to_target.x, 0.0, to_target.z).try_normalize() {
                    pose.forward = flat;
                }
            }
        }

        if let Ok(mut act) = world.get::<&mut ActuatorBox>(entity) {
            if update.engage {
                act.engage(target_number);
            }
            if update.disengage {
                act.cancel_current();
                act.disengage();
            }
        }

        if update.engage {
            cues.push(CueEvent::AggroGained {
                guard: guard_number,
            });
        }
        if update.disengage && !update.start_sequence {
            cues.push(CueEvent::AggroLost {
                guard: guard_number,
            });
        }
        if update.start_sequence {
            cues.push(CueEvent::SequenceStarted {
                guard: guard_number,
            });
            let _ = world.insert_one(entity, SequenceRun::default());
        }
    }
}
