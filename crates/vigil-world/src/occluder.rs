//! Occluder volumes and the segment raycast used for visibility queries.
//!
//! Occluders are axis-aligned boxes tagged with a surface kind; trigger-only
//! geometry never blocks rays. Intersection uses the slab method over the
//! parametric segment, so queries are analytic rather than stepped.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use vigil_core::enums::SurfaceKind;

/// An axis-aligned occluder volume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlockerBox {
    pub min: Vec3,
    pub max: Vec3,
    pub kind: SurfaceKind,
}

impl BlockerBox {
    /// Build a solid blocker from any two opposite corners.
    pub fn solid(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            kind: SurfaceKind::Solid,
        }
    }

    /// Build a trigger-only volume (never blocks vision).
    pub fn trigger(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            kind: SurfaceKind::Trigger,
        }
    }

    /// Slab-method intersection of the open segment `from -> to` with this
    /// box. Returns the entry parameter in (0, 1) if the segment crosses the
    /// box interior.
    fn segment_entry(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let delta = to - from;
        let mut t_enter = 0.0f32;
        let mut t_exit = 1.0f32;

        for axis in 0..3 {
            let d = delta[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                // Parallel to the slab: outside it means no hit at all.
                if from[axis] < lo || from[axis] > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - from[axis]) * inv;
            let mut t1 = (hi - from[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        (t_enter < 1.0 && t_exit > 0.0).then_some(t_enter.max(0.0))
    }
}

/// The set of occluders a simulation raycasts against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccluderSet {
    boxes: Vec<BlockerBox>,
}

impl OccluderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, blocker: BlockerBox) {
        self.boxes.push(blocker);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Whether any solid occluder interrupts the open segment `from -> to`.
    /// Trigger-only volumes are ignored.
    pub fn segment_blocked(&self, from: Vec3, to: Vec3) -> bool {
        self.boxes
            .iter()
            .filter(|b| b.kind == SurfaceKind::Solid)
            .any(|b| b.segment_entry(from, to).is_some())
    }

    /// First solid hit along `origin + direction * t`, `t` in
    /// `(0, max_distance)`. Returns the hit distance.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let dir = direction.try_normalize()?;
        let to = origin + dir * max_distance;
        self.boxes
            .iter()
            .filter(|b| b.kind == SurfaceKind::Solid)
            .filter_map(|b| b.segment_entry(origin, to))
            .fold(None, |best: Option<f32>, t| {
                Some(best.map_or(t, |b| b.min(t)))
            })
            .map(|t| t * max_distance)
    }
}
