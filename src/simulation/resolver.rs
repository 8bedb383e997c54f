//! Pairwise physics resolution: gravity, collision, merge, boundary
//!
//! All interactions are resolved per ordered body pair. Gravity is applied
//! through the spherical-angle decomposition of the connecting vector;
//! collisions use a per-axis 1-D inelastic formula parameterized by a
//! coefficient of restitution; deep collisions merge the smaller body into the
//! larger one with a fixed mass loss and an equal-volume radius.
//!
//! The per-axis collision decomposition is not a true normal-impulse response
//! and does not conserve vector momentum for off-axis impacts. This is
//! intentional; do not replace it with a contact-normal impulse.

use crate::configuration::config::BoundaryConfig;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};
use crate::simulation::vecmath;

/// Minimum separation used in distance-based formulas. Defends against the
/// zero-distance degenerate case; never raised as an error.
pub const MIN_DISTANCE: f64 = 1e-9;

/// Distance/sum-of-radii ratio below which a collision counts as deep.
pub const MERGE_RATIO: f64 = 0.95;

/// Overlap-to-radius fraction above which a collision counts as deep.
pub const MERGE_DEPTH: f64 = 0.05;

/// Fraction of the absorbed body's mass retained by the absorber.
pub const MASS_RETAIN: f64 = 0.95;

/// 1-D inelastic collision for one axis, restitution `cor`.
///
/// v1' = (m1*u1 + m2*u2 + cor*m2*(u2-u1)) / (m1+m2)
/// v2' = (m1*u1 + m2*u2 + cor*m1*(u1-u2)) / (m1+m2)
pub fn inelastic_axis(m1: f64, u1: f64, m2: f64, u2: f64, cor: f64) -> (f64, f64) {
    let total = m1 + m2;
    let momentum = m1 * u1 + m2 * u2;
    let v1 = (momentum + cor * m2 * (u2 - u1)) / total;
    let v2 = (momentum + cor * m1 * (u1 - u2)) / total;
    (v1, v2)
}

/// Radius of the equal-volume sphere holding both bodies' volumes:
/// cbrt((4/3·π·r1³ + 4/3·π·r2³) · 3 / (4·π)).
pub fn merged_radius(r1: f64, r2: f64) -> f64 {
    let four_thirds_pi = 4.0 / 3.0 * std::f64::consts::PI;
    let volume = four_thirds_pi * r1.powi(3) + four_thirds_pi * r2.powi(3);
    (volume * 3.0 / (4.0 * std::f64::consts::PI)).cbrt()
}

/// Split a body slice into two disjoint mutable references, `i != j`.
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Resolve one body pair: gravity (or escape culling), then collision and
/// possibly merge. Velocity-only; positions are advanced by the stepper.
///
/// Pairs with a dead member are skipped at entry — this is also the check
/// that keeps a body flagged pending-dead earlier in the tick from being
/// absorbed a second time (a policy, not an error).
pub fn resolve_pair(
    bodies: &mut [Body],
    i: usize,
    j: usize,
    engine: &Engine,
    params: &Parameters,
    dt_scaled: f64,
) {
    let (a, b) = pair_mut(bodies, i, j);
    if !a.alive || !b.alive {
        return;
    }

    let delta = a.x - b.x;
    let d = delta.norm().max(MIN_DISTANCE);

    if d > params.gravity_range {
        // Beyond the gravitational range a central pair culls the outlier
        // rather than merely skipping the force.
        if engine.escape {
            if a.index == 0 {
                b.flag_escaped();
            } else if b.index == 0 {
                a.flag_escaped();
            }
        }
        return;
    }

    apply_gravity(a, b, &delta, d, params, dt_scaled);

    let sum_radii = a.radius + b.radius;
    if d <= sum_radii {
        resolve_collision(a, b, params);

        let diff = sum_radii - d;
        if d / sum_radii < MERGE_RATIO
            || diff / a.radius > MERGE_DEPTH
            || diff / b.radius > MERGE_DEPTH
        {
            absorb(a, b);
        }
    }
}

/// Newtonian gravity through the spherical angles of the connecting vector.
///
/// F = G·mₐ·m_b / d²; direction decomposed as θ = acos(dz/d), φ = atan2(dy,dx)
/// and rebuilt into Cartesian components. `a` is pulled toward `b` and vice
/// versa, each scaled by its own mass and the scaled timestep.
fn apply_gravity(a: &mut Body, b: &mut Body, delta: &NVec3, d: f64, params: &Parameters, dt_scaled: f64) {
    let force = params.g * a.m * b.m / (d * d);
    let u = vecmath::spherical_direction(delta, d);
    a.v -= u * (force / a.m) * dt_scaled;
    b.v += u * (force / b.m) * dt_scaled;
}

/// Per-axis inelastic collision response. Velocity-only: interpenetration is
/// tolerated, no position correction.
fn resolve_collision(a: &mut Body, b: &mut Body, params: &Parameters) {
    let (vax, vbx) = inelastic_axis(a.m, a.v.x, b.m, b.v.x, params.cor);
    let (vay, vby) = inelastic_axis(a.m, a.v.y, b.m, b.v.y, params.cor);
    let (vaz, vbz) = inelastic_axis(a.m, a.v.z, b.m, b.v.z, params.cor);
    a.v = NVec3::new(vax, vay, vaz);
    b.v = NVec3::new(vbx, vby, vbz);
}

/// Deep collision: the larger-radius body absorbs the smaller. The absorber
/// keeps 95% of the absorbed mass and grows to the equal-volume sphere of the
/// two radii. The absorbed body is flagged dead+swallowed and keeps a record
/// of which body took it.
fn absorb(a: &mut Body, b: &mut Body) {
    let (larger, smaller) = if a.radius >= b.radius { (a, b) } else { (b, a) };
    if smaller.pending_dead {
        return;
    }
    larger.m += smaller.m * MASS_RETAIN;
    larger.radius = merged_radius(larger.radius, smaller.radius);
    let absorber = larger.index;
    smaller.flag_swallowed(absorber);
}

/// Boundary response for one body, applied after its position advance.
/// Exactly one mode is active per scenario; the central body is exempt.
pub fn apply_boundary(body: &mut Body, central_mass: f64, engine: &Engine, params: &Parameters) {
    let bound = params.universe_size;
    for axis in 0..3 {
        let p = body.x[axis];
        if p.abs() <= bound {
            continue;
        }
        match engine.boundary {
            BoundaryConfig::Wrap => {
                // Re-enter from the opposite face, lose speed along the
                // crossed axis, sign-flip the other two components. A
                // simplified, non-physical wrap; intentional.
                body.x[axis] = -p.signum() * bound;
                body.v[axis] *= params.wrap_loss;
                for other in 0..3 {
                    if other != axis {
                        body.v[other] = -body.v[other];
                    }
                }
            }
            BoundaryConfig::Bounce => {
                // Axis-aligned hit against an implicit stationary wall of
                // central-body mass, same momentum formula as body-body
                // collisions with the wall velocity fixed at zero.
                let (v, _) = inelastic_axis(body.m, body.v[axis], central_mass, 0.0, params.wall_cor);
                body.v[axis] = v;
            }
        }
    }
}
