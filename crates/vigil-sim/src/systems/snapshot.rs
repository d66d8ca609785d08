//! Snapshot system: queries the ECS world and builds a complete
//! SimStateSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use vigil_core::components::*;
use vigil_core::enums::RunPhase;
use vigil_core::events::{Alert, CueEvent};
use vigil_core::state::*;
use vigil_core::types::{Pose, SimTime};

/// Build a complete SimStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: RunPhase,
    time_scale: f32,
    overlay: OverlayView,
    alerts: Vec<Alert>,
    cues: Vec<CueEvent>,
) -> SimStateSnapshot {
    SimStateSnapshot {
        time: *time,
        phase,
        time_scale,
        guards: build_guards(world),
        quarry: build_quarry(world),
        overlay,
        alerts,
        cues,
    }
}

fn build_guards(world: &World) -> Vec<GuardView> {
    let mut guards: Vec<GuardView> = world
        .query::<(
            &Guard,
            &Pose,
            &DetectionMeter,
            &DetectionTuning,
            &AlertStatus,
            &ChaseDrive,
        )>()
        .iter()
        .map(|(_, (guard, pose, meter, tuning, status, drive))| GuardView {
            number: guard.number,
            position: pose.position,
            forward: pose.forward,
            detection: meter.value,
            detection_max: tuning.max,
            visible_fraction: meter.last_visible_fraction,
            mode: status.mode,
            pursuing: drive.pursuing,
            destination: drive.destination,
        })
        .collect();

    // Sort by guard number: hecs iteration order is not part of the
    // deterministic contract.
    guards.sort_by_key(|view| view.number);
    guards
}

fn build_quarry(world: &World) -> Option<QuarryView> {
    world
        .query::<(&Quarry, &Pose)>()
        .iter()
        .map(|(_, (quarry, pose))| QuarryView {
            number: quarry.number,
            position: pose.position,
        })
        .min_by_key(|view| view.number)
}
