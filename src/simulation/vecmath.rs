//! Guarded vector helpers on top of nalgebra
//!
//! All geometric formulas in the engine must defend against zero distance and
//! floating error: `normalize` on a zero vector and `acos` on an argument
//! fractionally outside [-1, 1] would both propagate NaN into body state.
//! These helpers centralize the guards so call sites never have to.

use crate::simulation::states::NVec3;

/// Unit vector pointing from `from` to `to`, or the zero vector when the
/// endpoints coincide.
pub fn direction(from: &NVec3, to: &NVec3) -> NVec3 {
    let delta = to - from;
    unit_or_zero(&delta)
}

/// `v / |v|`, or the zero vector when `|v| == 0`.
pub fn unit_or_zero(v: &NVec3) -> NVec3 {
    let n = v.norm();
    if n == 0.0 {
        NVec3::zeros()
    } else {
        v / n
    }
}

/// Angle between two vectors in radians, cosine clamped into [-1, 1].
/// Returns 0 when either vector is zero.
pub fn angle_between(a: &NVec3, b: &NVec3) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let cos = (a.dot(b) / (na * nb)).clamp(-1.0, 1.0);
    cos.acos()
}

/// Polar angle theta = acos(dz / d) of an offset vector, clamped against
/// floating error. Returns 0 for a zero offset.
pub fn polar_angle(offset: &NVec3, d: f64) -> f64 {
    if d == 0.0 {
        return 0.0;
    }
    (offset.z / d).clamp(-1.0, 1.0).acos()
}

/// Azimuth angle phi = atan2(dy, dx) of an offset vector.
pub fn azimuth_angle(offset: &NVec3) -> f64 {
    offset.y.atan2(offset.x)
}

/// Reconstruct the Cartesian unit vector for spherical angles (theta, phi):
/// (sin(theta)cos(phi), sin(theta)sin(phi), cos(theta)).
pub fn spherical_unit(theta: f64, phi: f64) -> NVec3 {
    let st = theta.sin();
    NVec3::new(st * phi.cos(), st * phi.sin(), theta.cos())
}

/// Spherical-angle decomposition of an offset vector followed by
/// reconstruction. Equivalent to `unit_or_zero` but routed through the
/// (theta, phi) angles the force model works in.
pub fn spherical_direction(offset: &NVec3, d: f64) -> NVec3 {
    if d == 0.0 {
        return NVec3::zeros();
    }
    let theta = polar_angle(offset, d);
    let phi = azimuth_angle(offset);
    spherical_unit(theta, phi)
}
