//! 3-D helpers on top of [`glam::DVec3`].
//!
//! Plain arithmetic (add, scale, dot, cross) comes from glam. This module
//! only adds the rotations neurite geometry needs.

use glam::DVec3;

/// Full turn used by [`perp3`] to map a `[0, 1)` draw onto an angle.
pub const PERP_ROTATION_SCALE: f64 = 6.35;

/// Component of `v` orthogonal to `axis`; `v` itself for a zero axis.
#[must_use]
pub fn perpendicular_component(v: DVec3, axis: DVec3) -> DVec3 {
    let n = axis.normalize_or_zero();
    v - n * v.dot(n)
}

/// Rotates `vector` by `theta` radians around `axis`.
///
/// A zero axis leaves the vector unchanged.
#[must_use]
pub fn rot_around_axis(vector: DVec3, theta: f64, axis: DVec3) -> DVec3 {
    let n = axis.normalize_or_zero();
    if n == DVec3::ZERO {
        return vector;
    }
    let parallel = n * vector.dot(n);
    let perpendicular = vector - parallel;
    let (sin, cos) = (-theta).sin_cos();
    parallel + perpendicular * cos + vector.cross(n) * sin
}

/// Unit vector perpendicular to `a`, spun around `a` by `rand` (in `[0, 1)`).
#[must_use]
pub fn perp3(a: DVec3, rand: f64) -> DVec3 {
    let seed = if a.x == 0.0 {
        DVec3::X
    } else {
        DVec3::new(a.y, -a.x, 0.0).normalize()
    };
    rot_around_axis(seed, PERP_ROTATION_SCALE * rand, a)
}
