//! Silhouette sampling — fixed sets of world points on a target capsule.
//!
//! The two pole points are always emitted, plus a middle ring oriented to
//! face the viewer (covering more silhouette per ray than an arbitrarily
//! oriented ring) and, optionally, two rings inset from the poles.

use glam::Vec3;

use vigil_core::components::SilhouetteSampling;
use vigil_core::types::Capsule;

/// Shortest meaningful capsule axis; anything below is treated as a sphere.
const MIN_AXIS_LENGTH: f32 = 1e-4;

/// Compute silhouette sample points for `capsule` as seen from `eye`.
///
/// Deterministic and allocation-reusing: `out` is cleared and refilled on
/// every call. If the eye coincides with the capsule midpoint the ring basis
/// is degenerate and only the two pole points are emitted.
pub fn sample_silhouette(
    capsule: &Capsule,
    eye: Vec3,
    sampling: &SilhouetteSampling,
    out: &mut Vec<Vec3>,
) {
    out.clear();
    out.push(capsule.top);
    out.push(capsule.bottom);

    let mid = capsule.midpoint();
    let axis = capsule.axis();
    let axis_len = axis.length().max(MIN_AXIS_LENGTH);
    let up_axis = axis / axis_len;

    // Ring basis perpendicular to the eye-to-midpoint direction, so rings
    // face the viewer rather than sitting in an arbitrary plane.
    let Some(to_mid) = (mid - eye).try_normalize() else {
        return;
    };
    let reference = if to_mid.dot(Vec3::Y).abs() > 0.9 {
        Vec3::X
    } else {
        Vec3::Y
    };
    let right = reference.cross(to_mid).normalize();
    let up = to_mid.cross(right).normalize();

    push_ring(out, mid, right, up, capsule.radius, sampling.middle_ring_points);

    if sampling.end_rings {
        let inset = (capsule.radius * 0.5).min(axis_len * 0.25);
        let near_top = capsule.top - up_axis * inset;
        let near_bottom = capsule.bottom + up_axis * inset;
        push_ring(out, near_top, right, up, capsule.radius, sampling.end_ring_points);
        push_ring(out, near_bottom, right, up, capsule.radius, sampling.end_ring_points);
    }
}

/// Append `count` evenly spaced points on a circle around `center`.
fn push_ring(out: &mut Vec<Vec3>, center: Vec3, right: Vec3, up: Vec3, radius: f32, count: u32) {
    let step = std::f32::consts::TAU / count.max(1) as f32;
    for k in 0..count {
        let angle = step * k as f32;
        let offset = right * angle.cos() + up * angle.sin();
        out.push(center + offset * radius);
    }
}
