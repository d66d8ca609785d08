//! Tests for the simulation engine: perception pipeline, alert transitions,
//! caught sequences, chase gating, pause behavior, and determinism.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::Vec3;

use vigil_core::commands::DirectorCommand;
use vigil_core::components::Silhouette;
use vigil_core::enums::{AlertLevel, AlertMode, RunPhase};
use vigil_core::events::CueEvent;
use vigil_core::state::SimStateSnapshot;
use vigil_core::types::Pose;
use vigil_world::BlockerBox;

use crate::engine::{SimConfig, SimulationEngine};
use crate::world_setup::GuardParams;

/// A guard that never moves, so range scenarios stay where we put them.
fn stationary_guard() -> GuardParams {
    let mut params = GuardParams::default();
    params.chase.move_speed = 0.0;
    params
}

fn quarry_at(z: f32) -> Pose {
    Pose::new(Vec3::new(0.0, 0.0, z), -Vec3::Z)
}

/// Engine with one stationary guard at the origin facing +Z and one quarry
/// on the guard's axis.
fn make_engine(quarry_z: f32) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.spawn_guard(stationary_guard());
    engine.spawn_quarry(quarry_at(quarry_z), Silhouette::default());
    engine
}

/// A wall between the guard (z=0) and anything past z=3.
fn blocking_wall() -> BlockerBox {
    BlockerBox::solid(Vec3::new(-5.0, 0.0, 2.0), Vec3::new(5.0, 3.0, 3.0))
}

fn run_ticks(
    engine: &mut SimulationEngine,
    ticks: u32,
    cues: &mut Vec<CueEvent>,
) -> Vec<SimStateSnapshot> {
    let mut snapshots = Vec::with_capacity(ticks as usize);
    for _ in 0..ticks {
        let snapshot = engine.tick();
        cues.extend(snapshot.cues.iter().cloned());
        snapshots.push(snapshot);
    }
    snapshots
}

fn count_starts(cues: &[CueEvent]) -> usize {
    cues.iter()
        .filter(|c| matches!(c, CueEvent::SequenceStarted { .. }))
        .count()
}

// ---- Tick timing ----

#[test]
fn test_tick_timing_60_ticks_one_second() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    for _ in 0..60 {
        engine.tick();
    }
    let time = engine.time();
    assert_eq!(time.tick, 60);
    assert!((time.sim_secs - 1.0).abs() < 1e-4, "got {}", time.sim_secs);
    assert!((time.real_secs - 1.0).abs() < 1e-4);
}

// ---- Perception pipeline ----

#[test]
fn test_meter_rises_on_clear_sight() {
    let mut engine = make_engine(5.0);
    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 30, &mut cues);

    let guard = &snapshots.last().unwrap().guards[0];
    assert!(guard.detection > 0.0, "meter should rise with clear sight");
    assert_eq!(guard.mode, AlertMode::Aggro);
    assert!((guard.visible_fraction - 1.0).abs() < 1e-6);
    assert!(
        cues.contains(&CueEvent::AggroGained { guard: 0 }),
        "aggro cue expected"
    );
}

#[test]
fn test_wall_blocks_detection() {
    let mut engine = make_engine(5.0);
    engine.add_occluder(blocking_wall());
    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 60, &mut cues);

    let guard = &snapshots.last().unwrap().guards[0];
    assert_eq!(guard.detection, 0.0, "occluded quarry must not raise meter");
    assert_eq!(guard.mode, AlertMode::Idle);
    assert_eq!(guard.visible_fraction, 0.0);
    assert!(cues.is_empty(), "no cues while fully occluded: {cues:?}");
}

#[test]
fn test_trigger_geometry_is_transparent() {
    let mut engine = make_engine(5.0);
    engine.add_occluder(BlockerBox::trigger(
        Vec3::new(-5.0, 0.0, 2.0),
        Vec3::new(5.0, 3.0, 3.0),
    ));
    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 30, &mut cues);

    let guard = &snapshots.last().unwrap().guards[0];
    assert!(guard.detection > 0.0, "trigger volumes must not block rays");
    assert_eq!(guard.mode, AlertMode::Aggro);
}

#[test]
fn test_quarry_behind_guard_never_detected() {
    // Directly behind: 180° off a 110° cone.
    let mut engine = make_engine(-5.0);
    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 120, &mut cues);

    let guard = &snapshots.last().unwrap().guards[0];
    assert_eq!(guard.detection, 0.0);
    assert_eq!(guard.mode, AlertMode::Idle);
    assert!(cues.is_empty());
}

#[test]
fn test_no_quarry_is_soft_noop() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.spawn_guard(stationary_guard());
    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 50, &mut cues);

    let last = snapshots.last().unwrap();
    assert!(last.quarry.is_none());
    assert_eq!(last.guards[0].detection, 0.0);
    assert_eq!(last.guards[0].mode, AlertMode::Idle);
    assert!(!last.guards[0].pursuing);
}

#[test]
fn test_unknown_guard_command_warns() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(DirectorCommand::ForceAggro { guard: 99 });
    let snapshot = engine.tick();
    assert!(
        snapshot
            .alerts
            .iter()
            .any(|a| a.level == AlertLevel::Warning),
        "unknown guard should produce a warning alert"
    );
}

// ---- Saturation end-to-end ----

#[test]
fn test_full_visibility_saturates_within_window() {
    // Quarry at point-blank range: distance multiplier 2.0, fraction 1.0,
    // so the meter climbs at 80/s and saturates 100 after 1.25s of checks.
    let mut engine = make_engine(1.2);
    let mut cues = Vec::new();
    let mut saw_aggro_before_sequencing = false;
    let mut sequence_started_at = None;

    for _ in 0..100 {
        let snapshot = engine.tick();
        let guard = &snapshot.guards[0];
        if guard.mode == AlertMode::Aggro {
            saw_aggro_before_sequencing = sequence_started_at.is_none();
        }
        if snapshot
            .cues
            .iter()
            .any(|c| matches!(c, CueEvent::SequenceStarted { .. }))
        {
            sequence_started_at.get_or_insert(snapshot.time.sim_secs);
        }
        cues.extend(snapshot.cues);
    }

    let at = sequence_started_at.expect("meter should saturate");
    assert!(
        (1.15..=1.40).contains(&at),
        "expected saturation near 1.25s, got {at}"
    );
    assert!(
        saw_aggro_before_sequencing,
        "Idle -> Aggro -> Sequencing order expected"
    );
    assert_eq!(count_starts(&cues), 1);
}

#[test]
fn test_disable_mid_ramp_resets_immediately() {
    let mut engine = make_engine(1.2);
    let mut cues = Vec::new();
    run_ticks(&mut engine, 40, &mut cues);
    let ramped = engine.tick().guards[0].detection;
    assert!(ramped > 0.0 && ramped < 100.0, "mid-ramp value: {ramped}");

    engine.queue_command(DirectorCommand::SetDetectionEnabled {
        guard: 0,
        enabled: false,
    });
    let snapshot = engine.tick();
    assert_eq!(snapshot.guards[0].detection, 0.0, "reset must be immediate");
    assert_eq!(snapshot.guards[0].mode, AlertMode::Idle);

    // Disabled: nothing accumulates afterwards.
    let snapshots = run_ticks(&mut engine, 60, &mut cues);
    assert_eq!(snapshots.last().unwrap().guards[0].detection, 0.0);
}

#[test]
fn test_sequence_fires_exactly_once_per_saturation() {
    let mut engine = make_engine(1.2);
    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 400, &mut cues);

    // Meter stays bounded the whole run.
    for snapshot in &snapshots {
        let guard = &snapshot.guards[0];
        assert!(
            guard.detection >= 0.0 && guard.detection <= guard.detection_max + 1e-3,
            "meter out of bounds: {}",
            guard.detection
        );
    }

    // Continuous sight re-saturates after each completed sequence, so the
    // start/complete cues must strictly alternate: a second start only after
    // a full completed sequence.
    let lifecycle: Vec<&CueEvent> = cues
        .iter()
        .filter(|c| {
            matches!(
                c,
                CueEvent::SequenceStarted { .. } | CueEvent::SequenceCompleted { .. }
            )
        })
        .collect();
    assert!(
        lifecycle.len() >= 3,
        "expected at least one full cycle plus a restart, got {lifecycle:?}"
    );
    for (i, cue) in lifecycle.iter().enumerate() {
        if i % 2 == 0 {
            assert!(
                matches!(cue, CueEvent::SequenceStarted { .. }),
                "position {i}: expected start, got {cue:?}"
            );
        } else {
            assert!(
                matches!(cue, CueEvent::SequenceCompleted { .. }),
                "position {i}: expected completion, got {cue:?}"
            );
        }
    }
}

#[test]
fn test_caught_hook_invoked_once_per_cycle() {
    let mut engine = make_engine(1.2);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    engine.set_caught_hook(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));

    let mut cues = Vec::new();
    // Through the first full sequence (~1.25s ramp + ~2s sequence).
    run_ticks(&mut engine, 220, &mut cues);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Through the second cycle.
    run_ticks(&mut engine, 220, &mut cues);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failing_hook_never_strands_the_guard() {
    let mut engine = make_engine(1.2);
    engine.set_caught_hook(Box::new(|| Err("respawn backend unavailable".into())));

    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 220, &mut cues);

    assert!(
        snapshots
            .iter()
            .flat_map(|s| &s.alerts)
            .any(|a| a.level == AlertLevel::Error),
        "hook failure should surface as an error alert"
    );
    assert!(
        cues.iter()
            .any(|c| matches!(c, CueEvent::SequenceCompleted { .. })),
        "sequence must complete despite the failing hook"
    );
    let guard = &snapshots.last().unwrap().guards[0];
    assert_ne!(guard.mode, AlertMode::Sequencing, "guard must not strand");
}

#[test]
fn test_panicking_hook_is_isolated() {
    let mut engine = make_engine(1.2);
    engine.set_caught_hook(Box::new(|| panic!("respawn exploded")));

    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 220, &mut cues);

    assert!(
        snapshots
            .iter()
            .flat_map(|s| &s.alerts)
            .any(|a| a.level == AlertLevel::Error && a.message.contains("panicked")),
        "panic should surface as an error alert"
    );
    assert!(
        cues.iter()
            .any(|c| matches!(c, CueEvent::SequenceCompleted { .. })),
        "sequence must complete despite the panicking hook"
    );
}

#[test]
fn test_reload_policy_ends_sequence_early() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut params = stationary_guard();
    params.caught.reload_on_caught = true;
    params.caught.show_overlay = false;
    engine.spawn_guard(params);
    engine.spawn_quarry(quarry_at(1.2), Silhouette::default());

    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 300, &mut cues);

    assert_eq!(
        cues.iter()
            .filter(|c| matches!(c, CueEvent::ReloadRequested { .. }))
            .count(),
        1
    );
    assert!(
        !cues
            .iter()
            .any(|c| matches!(c, CueEvent::SequenceCompleted { .. })),
        "reload branch skips normal completion"
    );
    assert_eq!(count_starts(&cues), 1, "nothing restarts until host reset");
    assert_eq!(
        snapshots.last().unwrap().guards[0].mode,
        AlertMode::Sequencing,
        "guard stays gated until the host tears the scene down"
    );
}

// ---- Overlay & pause ----

#[test]
fn test_sequence_and_overlay_play_through_pause() {
    let mut engine = make_engine(1.2);

    // Ramp to saturation.
    let mut started = false;
    for _ in 0..100 {
        let snapshot = engine.tick();
        if snapshot
            .cues
            .iter()
            .any(|c| matches!(c, CueEvent::SequenceStarted { .. }))
        {
            started = true;
            break;
        }
    }
    assert!(started, "sequence should start within 100 ticks");

    engine.queue_command(DirectorCommand::Pause);
    let first_paused = engine.tick();
    let frozen_sim_secs = first_paused.time.sim_secs;

    let mut saw_opaque = false;
    let mut completed_while_paused = false;
    for _ in 0..140 {
        let snapshot = engine.tick();
        assert_eq!(snapshot.phase, RunPhase::Paused);
        assert_eq!(
            snapshot.time.sim_secs, frozen_sim_secs,
            "sim clock must freeze while paused"
        );
        if snapshot.overlay.opacity > 0.99 {
            saw_opaque = true;
        }
        if snapshot
            .cues
            .iter()
            .any(|c| matches!(c, CueEvent::SequenceCompleted { .. }))
        {
            completed_while_paused = true;
        }
    }

    assert!(saw_opaque, "overlay fade must play over pause");
    assert!(completed_while_paused, "sequence must finish while paused");
    let final_snapshot = engine.tick();
    assert!(!final_snapshot.overlay.visible, "overlay hidden at the end");
    assert_eq!(final_snapshot.guards[0].detection, 0.0);
}

#[test]
fn test_overlay_fades_smoothly() {
    let mut engine = make_engine(1.2);
    let mut opacities = Vec::new();
    for _ in 0..220 {
        let snapshot = engine.tick();
        opacities.push(snapshot.overlay.opacity);
    }
    // The fade passes through intermediate opacity — it is animated, not a
    // hard cut.
    assert!(opacities.iter().any(|&o| o > 0.05 && o < 0.95));
    assert!(opacities.iter().any(|&o| o > 0.99));
    assert!(*opacities.last().unwrap() < 1.0, "overlay back out by the end");
}

// ---- Chase gating ----

#[test]
fn test_chase_hysteresis_two_transitions() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut params = stationary_guard();
    params.policy.enabled = false; // isolate the chase gate
    engine.spawn_guard(params);
    engine.spawn_quarry(quarry_at(3.0), Silhouette::default());

    let mut states = Vec::new();
    for distance in [3.0, 2.5, 1.7, 2.0] {
        engine.set_quarry_pose(0, quarry_at(distance));
        let snapshot = engine.tick();
        states.push(snapshot.guards[0].pursuing);
    }
    assert_eq!(states, vec![true, true, false, false]);

    let transitions = states.windows(2).filter(|w| w[0] != w[1]).count() + 1;
    assert_eq!(transitions, 2, "exactly on then off, no dead-zone toggling");
}

#[test]
fn test_chase_destination_stand_off_point() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut params = stationary_guard();
    params.policy.enabled = false;
    engine.spawn_guard(params);
    engine.spawn_quarry(quarry_at(3.0), Silhouette::default());

    let snapshot = engine.tick();
    let destination = snapshot.guards[0]
        .destination
        .expect("pursuit should issue a destination");
    assert!(
        (destination - Vec3::new(0.0, 0.0, 1.4)).length() < 1e-4,
        "stand-off 1.6m short of the target, got {destination:?}"
    );
}

#[test]
fn test_target_at_own_position_keeps_destination() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut params = stationary_guard();
    params.policy.enabled = false;
    engine.spawn_guard(params);
    engine.spawn_quarry(quarry_at(3.0), Silhouette::default());

    let before = engine.tick().guards[0].destination;
    assert!(before.is_some());

    // Degenerate: quarry exactly on the guard. No panic, previous
    // destination stands.
    engine.set_quarry_pose(0, quarry_at(0.0));
    let snapshot = engine.tick();
    assert_eq!(snapshot.guards[0].destination, before);
    assert!(!snapshot.guards[0].pursuing);
}

#[test]
fn test_pursuit_moves_guard_and_refreshes_destination() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut params = GuardParams::default();
    params.policy.enabled = false;
    engine.spawn_guard(params);
    engine.spawn_quarry(quarry_at(10.0), Silhouette::default());

    let mut previous_z = 0.0;
    for _ in 0..60 {
        let snapshot = engine.tick();
        let guard = &snapshot.guards[0];
        assert!(guard.position.z >= previous_z, "pursuit approaches target");
        previous_z = guard.position.z;
    }
    // 1 second at 3.5 m/s.
    assert!((previous_z - 3.5).abs() < 0.1, "travelled {previous_z}");
}

// ---- Administrative surface ----

#[test]
fn test_force_aggro_then_timeout_deaggro() {
    // Quarry fully occluded: aggro can only come from the command, and with
    // no confirmed sighting it must decay via the lose-sight timeout.
    let mut engine = make_engine(5.0);
    engine.add_occluder(blocking_wall());
    engine.queue_command(DirectorCommand::ForceAggro { guard: 0 });

    let snapshot = engine.tick();
    assert_eq!(snapshot.guards[0].mode, AlertMode::Aggro);
    assert!(snapshot
        .cues
        .iter()
        .any(|c| matches!(c, CueEvent::AggroGained { .. })));

    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 150, &mut cues);
    assert_eq!(
        snapshots.last().unwrap().guards[0].mode,
        AlertMode::Idle,
        "2s lose-sight timeout should clear forced aggro"
    );
    assert!(cues.contains(&CueEvent::AggroLost { guard: 0 }));
}

#[test]
fn test_set_target_rebinds_perception() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.spawn_guard(stationary_guard());
    // Quarry 0 is behind the guard (invisible), quarry 1 in front.
    engine.spawn_quarry(quarry_at(-5.0), Silhouette::default());
    engine.spawn_quarry(quarry_at(5.0), Silhouette::default());

    // Default binding resolves the lowest-numbered quarry: no detection.
    let mut cues = Vec::new();
    let snapshots = run_ticks(&mut engine, 60, &mut cues);
    assert_eq!(snapshots.last().unwrap().guards[0].mode, AlertMode::Idle);

    engine.queue_command(DirectorCommand::SetTarget {
        guard: 0,
        quarry: Some(1),
    });
    let snapshots = run_ticks(&mut engine, 60, &mut cues);
    assert_eq!(
        snapshots.last().unwrap().guards[0].mode,
        AlertMode::Aggro,
        "rebinding to the visible quarry should aggro"
    );
}

#[test]
fn test_always_alert_bypasses_occlusion() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut params = stationary_guard();
    params.policy.always_alert = true;
    engine.spawn_guard(params);
    engine.spawn_quarry(quarry_at(5.0), Silhouette::default());
    engine.add_occluder(blocking_wall());

    let mut cues = Vec::new();
    run_ticks(&mut engine, 30, &mut cues);
    assert!(
        cues.contains(&CueEvent::AggroGained { guard: 0 }),
        "always-alert engages without line of sight"
    );
    assert_eq!(count_starts(&cues), 1, "and saturates immediately");
}

// ---- Determinism ----

fn make_seeded(seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.spawn_guard(GuardParams::default());
    engine.spawn_guard(stationary_guard());
    engine.spawn_quarry(quarry_at(6.0), Silhouette::default());
    engine
}

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = make_seeded(12345);
    let mut engine_b = make_seeded(12345);

    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = make_seeded(111);
    let mut engine_b = make_seeded(222);

    // Different seeds stagger the guards' check phases differently, so the
    // meters diverge once detection begins.
    let mut diverged = false;
    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "different seeds should produce divergent output");
}
