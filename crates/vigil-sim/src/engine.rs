//! Simulation engine — the core of the module.
//!
//! `SimulationEngine` owns the hecs ECS world, processes director commands,
//! runs all systems at a fixed tick rate, and produces `SimStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::Vec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use vigil_core::commands::DirectorCommand;
use vigil_core::components::*;
use vigil_core::constants::MAX_TIME_SCALE;
use vigil_core::enums::{AlertLevel, AlertMode, RunPhase};
use vigil_core::events::{Alert, CueEvent};
use vigil_core::state::SimStateSnapshot;
use vigil_core::types::{Pose, SimTime};
use vigil_world::{BlockerBox, OccluderSet};

use crate::actuator::ActuatorBox;
use crate::overlay::{OverlayPresenter, ScreenFade};
use crate::systems;
use crate::world_setup::{self, GuardParams};

/// External caught notification. Both error returns and panics are isolated
/// at the call site.
pub type CaughtHook = Box<dyn FnMut() -> Result<(), String> + Send>;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: RunPhase,
    time_scale: f32,
    rng: ChaCha8Rng,
    next_guard_number: u32,
    next_quarry_number: u32,
    command_queue: VecDeque<DirectorCommand>,
    occluders: OccluderSet,
    overlay: Box<dyn OverlayPresenter>,
    caught_hook: Option<CaughtHook>,
    alerts: Vec<Alert>,
    cues: Vec<CueEvent>,
    sample_buffer: Vec<Vec3>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: RunPhase::default(),
            time_scale: config.time_scale.clamp(0.0, MAX_TIME_SCALE),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_guard_number: 0,
            next_quarry_number: 0,
            command_queue: VecDeque::new(),
            occluders: OccluderSet::new(),
            overlay: Box::new(ScreenFade::new()),
            caught_hook: None,
            alerts: Vec::new(),
            cues: Vec::new(),
            sample_buffer: Vec::with_capacity(32),
        }
    }

    /// Queue a director command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: DirectorCommand) {
        self.command_queue.push_back(command);
    }

    /// Install the external caught callback (e.g. respawn logic).
    pub fn set_caught_hook(&mut self, hook: CaughtHook) {
        self.caught_hook = Some(hook);
    }

    /// Replace the overlay presenter. The default records plain state for
    /// the host to render.
    pub fn set_overlay_presenter(&mut self, presenter: Box<dyn OverlayPresenter>) {
        self.overlay = presenter;
    }

    /// Add a static occluder volume.
    pub fn add_occluder(&mut self, blocker: BlockerBox) {
        self.occluders.push(blocker);
    }

    /// Spawn a guard and return its number.
    pub fn spawn_guard(&mut self, params: GuardParams) -> u32 {
        let number = self.next_guard_number;
        self.next_guard_number += 1;
        world_setup::spawn_guard(&mut self.world, &mut self.rng, number, params);
        number
    }

    /// Spawn a quarry (detection target) and return its number.
    pub fn spawn_quarry(&mut self, pose: Pose, silhouette: Silhouette) -> u32 {
        let number = self.next_quarry_number;
        self.next_quarry_number += 1;
        world_setup::spawn_quarry(&mut self.world, number, pose, silhouette);
        number
    }

    /// Reposition a quarry. Target movement belongs to the host; this is
    /// its write path into the perception world.
    pub fn set_quarry_pose(&mut self, number: u32, pose: Pose) {
        let entity = self
            .world
            .query::<&Quarry>()
            .iter()
            .find(|(_, quarry)| quarry.number == number)
            .map(|(entity, _)| entity);
        if let Some(entity) = entity {
            if let Ok(mut current) = self.world.get::<&mut Pose>(entity) {
                *current = pose;
            }
        }
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimStateSnapshot {
        self.process_commands();

        let running = self.phase == RunPhase::Active;
        let dt = self.time.dt();
        let sim_dt = dt * self.time_scale;

        if running {
            systems::perception::run(
                &mut self.world,
                &self.occluders,
                self.time.sim_secs,
                &mut self.cues,
                &mut self.sample_buffer,
            );
            systems::chase::run(&mut self.world);
            systems::movement::run(&mut self.world, sim_dt);
        }

        // The caught sequence runs on the real clock: a fade started before
        // a pause keeps playing through it.
        systems::sequence::run(
            &mut self.world,
            dt,
            self.overlay.as_mut(),
            &mut self.caught_hook,
            &mut self.cues,
            &mut self.alerts,
            self.time.tick,
        );

        self.time.advance(running, self.time_scale);

        let alerts = std::mem::take(&mut self.alerts);
        let cues = std::mem::take(&mut self.cues);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.time_scale,
            self.overlay.view(),
            alerts,
            cues,
        )
    }

    /// Get the current run phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a mutable reference to the ECS world, for hosts that drive
    /// entity state directly.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single director command.
    fn handle_command(&mut self, command: DirectorCommand) {
        match command {
            DirectorCommand::SetDetectionEnabled { guard, enabled } => {
                let Some(entity) = self.find_guard(guard) else {
                    self.unknown_guard(guard);
                    return;
                };
                if let Ok(mut policy) = self.world.get::<&mut DetectionPolicy>(entity) {
                    policy.enabled = enabled;
                }
                if !enabled {
                    self.reset_guard(entity, guard, true, true);
                }
            }
            DirectorCommand::ResetDetection {
                guard,
                clear_aggro,
                hide_overlay,
            } => {
                let Some(entity) = self.find_guard(guard) else {
                    self.unknown_guard(guard);
                    return;
                };
                self.reset_guard(entity, guard, clear_aggro, hide_overlay);
            }
            DirectorCommand::ForceAggro { guard } => {
                let Some(entity) = self.find_guard(guard) else {
                    self.unknown_guard(guard);
                    return;
                };
                self.force_aggro(entity, guard);
            }
            DirectorCommand::SetTarget { guard, quarry } => {
                let Some(entity) = self.find_guard(guard) else {
                    self.unknown_guard(guard);
                    return;
                };
                if let Ok(mut binding) = self.world.get::<&mut TargetBinding>(entity) {
                    binding.quarry_number = quarry;
                }
            }
            DirectorCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
            }
            DirectorCommand::Pause => {
                self.phase = RunPhase::Paused;
            }
            DirectorCommand::Resume => {
                self.phase = RunPhase::Active;
            }
        }
    }

    /// Administrative reset: zero the meter and, optionally, clear aggro and
    /// hide the overlay. An in-flight caught sequence is not cancelled — it
    /// runs to completion and performs its own reset (there is no abort
    /// path for a sequence).
    fn reset_guard(&mut self, entity: Entity, number: u32, clear_aggro: bool, hide_overlay: bool) {
        if let Ok(mut meter) = self.world.get::<&mut DetectionMeter>(entity) {
            meter.value = 0.0;
            meter.last_visible_fraction = 0.0;
        }

        if clear_aggro {
            let was_aggro = self
                .world
                .get::<&AlertStatus>(entity)
                .map(|status| status.mode == AlertMode::Aggro)
                .unwrap_or(false);
            if was_aggro {
                if let Ok(mut act) = self.world.get::<&mut ActuatorBox>(entity) {
                    act.cancel_current();
                    act.disengage();
                }
                if let Ok(mut status) = self.world.get::<&mut AlertStatus>(entity) {
                    status.mode = AlertMode::Idle;
                }
                self.cues.push(CueEvent::AggroLost { guard: number });
            }
        }

        if hide_overlay {
            self.overlay.hide();
        }
    }

    /// Immediate aggro, bypassing cone and visibility checks. Ignored while
    /// a caught sequence is in flight.
    fn force_aggro(&mut self, entity: Entity, number: u32) {
        let mode = self
            .world
            .get::<&AlertStatus>(entity)
            .map(|status| status.mode)
            .unwrap_or(AlertMode::Idle);
        if mode == AlertMode::Sequencing {
            return;
        }

        if let Ok(mut meter) = self.world.get::<&mut DetectionMeter>(entity) {
            meter.last_seen_secs = self.time.sim_secs;
        }
        if let Ok(mut act) = self.world.get::<&mut ActuatorBox>(entity) {
            // Target number resolution is lazy; engage against the bound
            // quarry if set, else the first one.
            let target = self
                .world
                .get::<&TargetBinding>(entity)
                .ok()
                .and_then(|b| b.quarry_number)
                .unwrap_or(0);
            act.engage(target);
        }
        if mode == AlertMode::Idle {
            if let Ok(mut status) = self.world.get::<&mut AlertStatus>(entity) {
                status.mode = AlertMode::Aggro;
            }
            self.cues.push(CueEvent::AggroGained { guard: number });
        }
    }

    fn find_guard(&self, number: u32) -> Option<Entity> {
        self.world
            .query::<&Guard>()
            .iter()
            .find(|(_, guard)| guard.number == number)
            .map(|(entity, _)| entity)
    }

    fn unknown_guard(&mut self, number: u32) {
        self.alerts.push(Alert {
            level: AlertLevel::Warning,
            message: format!("command addressed unknown guard {number}"),
            tick: self.time.tick,
        });
    }
}
