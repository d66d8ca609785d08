//! Chase gating system — runs the two-threshold range gate every tick.
//!
//! Independent of the alert state machine: pursuit is driven purely by
//! range to the resolved target.

use glam::Vec3;
use hecs::World;

use vigil_core::components::{ChaseDrive, ChaseTuning, Guard, Quarry, TargetBinding};
use vigil_core::types::Pose;
use vigil_perception::chase::{gate, ChaseContext};

/// Evaluate the chase gate for every guard. A guard with no resolvable
/// target keeps its previous pursuit state and destination.
pub fn run(world: &mut World) {
    let mut targets: Vec<(u32, Vec3)> = world
        .query::<(&Quarry, &Pose)>()
        .iter()
        .map(|(_, (quarry, pose))| (quarry.number, pose.position))
        .collect();
    targets.sort_by_key(|&(number, _)| number);

    for (_entity, (_guard, pose, tuning, drive, binding)) in world.query_mut::<(
        &Guard,
        &Pose,
        &ChaseTuning,
        &mut ChaseDrive,
        &TargetBinding,
    )>() {
        let target = match binding.quarry_number {
            Some(number) => targets.iter().find(|(n, _)| *n == number),
            None => targets.first(),
        };
        let Some(&(_, target_position)) = target else {
            continue;
        };

        let update = gate(&ChaseContext {
            self_position: pose.position,
            target_position,
            tuning,
            pursuing: drive.pursuing,
        });

        drive.pursuing = update.pursuing;
        // A skipped destination update (dead zone, stop branch, degenerate
        // direction) leaves the previously issued destination standing.
        if let Some(destination) = update.destination {
            drive.destination = Some(destination);
        }
    }
}
