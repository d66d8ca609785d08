//! Fundamental geometric and simulation types.
//!
//! Coordinates are meters, Cartesian, Y-up. Directions are unit `Vec3`s.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::TICK_RATE;

/// Simulation time tracking on two clocks.
///
/// The simulation clock freezes while paused and stretches with the time
/// scale; gameplay accumulation (meter rise/decay, de-aggro timers, check
/// scheduling) reads it. The real clock advances every tick regardless, so
/// overlay fades keep playing over pause.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation-clock time in seconds.
    pub sim_secs: f32,
    /// Elapsed real-clock time in seconds.
    pub real_secs: f32,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f32 {
        1.0 / TICK_RATE as f32
    }

    /// Advance by one tick. The simulation clock only moves while running,
    /// scaled by `time_scale`; the real clock always moves by one tick.
    pub fn advance(&mut self, running: bool, time_scale: f32) {
        self.tick += 1;
        self.real_secs += self.dt();
        if running {
            self.sim_secs += self.dt() * time_scale;
        }
    }
}

/// An upright bounding capsule: the cylinder's end-cap centers plus radius.
/// Used only as a sampling silhouette for visibility rays, never for physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    /// Center of the upper cylinder end cap (world space).
    pub top: Vec3,
    /// Center of the lower cylinder end cap (world space).
    pub bottom: Vec3,
    pub radius: f32,
}

impl Capsule {
    pub fn new(top: Vec3, bottom: Vec3, radius: f32) -> Self {
        Self {
            top,
            bottom,
            radius,
        }
    }

    /// Build an upright capsule from a foot position, total height, and radius.
    /// Height is clamped so the cylinder segment never inverts.
    pub fn upright(foot: Vec3, height: f32, radius: f32) -> Self {
        let height = height.max(radius * 2.0);
        let half_cyl = (height - 2.0 * radius) * 0.5;
        let center = foot + Vec3::Y * (height * 0.5);
        Self {
            top: center + Vec3::Y * half_cyl,
            bottom: center - Vec3::Y * half_cyl,
            radius,
        }
    }

    /// Midpoint of the capsule segment.
    pub fn midpoint(&self) -> Vec3 {
        (self.top + self.bottom) * 0.5
    }

    /// Segment vector from bottom to top.
    pub fn axis(&self) -> Vec3 {
        self.top - self.bottom
    }
}

/// World-space position plus facing direction for an agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    /// Unit facing direction.
    pub forward: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.try_normalize().unwrap_or(Vec3::Z),
        }
    }

    /// Distance to another position in meters.
    pub fn distance_to(&self, other: Vec3) -> f32 {
        self.position.distance(other)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
        }
    }
}
