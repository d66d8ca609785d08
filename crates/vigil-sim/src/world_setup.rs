//! Entity spawn factories for setting up the simulation world.
//!
//! Creates guards and quarries with complete component bundles.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use vigil_core::components::*;
use vigil_core::types::Pose;

use crate::actuator::{ActuatorBox, MeleeActuator};

/// Tuning bundle for spawning a guard. Defaults match the stock sentry.
#[derive(Debug, Clone, Default)]
pub struct GuardParams {
    pub pose: Pose,
    pub vision: VisionCone,
    pub sampling: SilhouetteSampling,
    pub tuning: DetectionTuning,
    pub policy: DetectionPolicy,
    pub chase: ChaseTuning,
    pub caught: CaughtFlow,
}

/// Spawn a guard with the default melee actuator archetype.
///
/// The first perception check is offset by a random phase within the check
/// interval, so co-located guards don't issue geometry queries on the same
/// tick. An always-alert guard engages on that first check, not at spawn.
pub fn spawn_guard(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    number: u32,
    params: GuardParams,
) -> Entity {
    let schedule = CheckSchedule {
        next_at_secs: rng.gen::<f32>() * params.vision.check_interval,
    };

    world.spawn((
        Guard { number },
        params.pose,
        params.vision,
        params.sampling,
        params.tuning,
        params.policy,
        params.chase,
        params.caught,
        DetectionMeter::default(),
        AlertStatus::default(),
        schedule,
        ChaseDrive::default(),
        TargetBinding::default(),
        Box::new(MeleeActuator::default()) as ActuatorBox,
    ))
}

/// Spawn a quarry (detection target) with its bounding silhouette.
pub fn spawn_quarry(world: &mut World, number: u32, pose: Pose, silhouette: Silhouette) -> Entity {
    world.spawn((Quarry { number }, pose, silhouette))
}
