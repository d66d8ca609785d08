//! Visibility probing — cone/range filtering plus occlusion queries.
//!
//! The view cone is anchored at the guard's declared pose (position and
//! forward), while ray lengths are measured from the eye point; the two can
//! differ when the eye sits above the guard's origin.

use glam::Vec3;

use vigil_core::components::VisionCone;
use vigil_core::constants::MIN_RAY_LENGTH;
use vigil_core::types::Pose;

/// A guard's perception cone in world space.
#[derive(Debug, Clone, Copy)]
pub struct ViewCone {
    /// Cone apex — the guard's position, not the eye.
    pub origin: Vec3,
    /// Unit facing direction.
    pub forward: Vec3,
    /// Half of the full view angle, radians.
    pub half_angle_rad: f32,
    /// Maximum sight distance.
    pub range: f32,
}

impl ViewCone {
    pub fn from_pose(pose: &Pose, vision: &VisionCone) -> Self {
        Self {
            origin: pose.position,
            forward: pose.forward,
            half_angle_rad: (vision.view_angle_deg * 0.5).to_radians(),
            range: vision.view_distance,
        }
    }

    /// Whether a world point lies inside the cone and range.
    /// A point on the apex itself counts as inside.
    pub fn contains(&self, point: Vec3) -> bool {
        let dir = point - self.origin;
        let distance = dir.length();
        if distance > self.range {
            return false;
        }
        if distance < MIN_RAY_LENGTH {
            return true;
        }
        let cos = self.forward.dot(dir / distance).clamp(-1.0, 1.0);
        cos.acos() <= self.half_angle_rad
    }
}

/// Result of probing a sample set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityCount {
    /// Samples that survived the cone/range filter and were unoccluded.
    pub visible: u32,
    /// Samples that survived the cone/range filter.
    pub total: u32,
}

impl VisibilityCount {
    /// Visible fraction in [0, 1]. A zero denominator means "not visible",
    /// never a division fault.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.visible as f32 / self.total as f32
        }
    }
}

/// Probe each sample against the cone, range, and the occlusion query.
///
/// `blocked(from, to)` is the external occlusion service: it reports whether
/// any occluder surface interrupts the open segment between the two points.
pub fn probe_visibility(
    eye: Vec3,
    cone: &ViewCone,
    samples: &[Vec3],
    blocked: impl Fn(Vec3, Vec3) -> bool,
) -> VisibilityCount {
    let mut count = VisibilityCount::default();

    for &sample in samples {
        if !cone.contains(sample) {
            continue;
        }
        let distance = (sample - eye).length();
        if distance > cone.range || distance < MIN_RAY_LENGTH {
            continue;
        }

        count.total += 1;
        if !blocked(eye, sample) {
            count.visible += 1;
        }
    }

    count
}
