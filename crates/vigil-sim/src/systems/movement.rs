//! Pursuit movement system.
//!
//! Steps pursuing guards toward their issued destination each tick and turns
//! them to face the direction of travel. Kinematic: no acceleration, clamped
//! to arrive exactly at the destination.

use glam::Vec3;
use hecs::World;

use vigil_core::components::{ChaseDrive, ChaseTuning, Guard};
use vigil_core::types::Pose;

/// Advance pursuing guards by `dt` seconds of simulation time.
pub fn run(world: &mut World, dt: f32) {
    for (_entity, (_guard, pose, tuning, drive)) in
        world.query_mut::<(&Guard, &mut Pose, &ChaseTuning, &ChaseDrive)>()
    {
        if !drive.pursuing {
            continue;
        }
        let Some(destination) = drive.destination else {
            continue;
        };

        let offset = destination - pose.position;
        let distance = offset.length();
        if distance < 1e-4 {
            continue;
        }

        let step = (tuning.move_speed * dt).min(distance);
        let direction = offset / distance;
        pose.position += direction * step;

        // Face travel direction, kept level.
        if let Some(flat) = Vec3::new(direction.x, 0.0, direction.z).try_normalize() {
            pose.forward = flat;
        }
    }
}
