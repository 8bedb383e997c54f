//! Initial-condition layout generators and orbit-velocity synthesis
//!
//! Two selectable layouts place the non-central bodies around the central
//! body in the z=0 plane:
//!
//! - square spiral: outward spiral on a grid whose partition size is derived
//!   from the universe height and the body count
//! - circular shells: concentric rings whose angular step keeps adjacent
//!   bodies roughly a target chord apart
//!
//! Each placed body then gets an initial velocity that is roughly tangential
//! to its offset from the central body: circular-orbit speed in perfect mode
//! or a uniform random speed otherwise, with a fixed chaos perturbation on
//! the polar angle. Mass and radius are drawn from the configured ranges
//! with an RNG seeded from the scenario seed, so runs are reproducible.

use std::f64::consts::{FRAC_PI_2, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{LayoutConfig, OrbitConfig};
use crate::simulation::engine::Engine;
use crate::simulation::params::{Parameters, Population};
use crate::simulation::states::{Body, NVec3};
use crate::simulation::vecmath;

/// Target spacing between ring neighbors, in units of the maximum body
/// diameter.
const SHELL_SPACING: f64 = 4.0;

/// Number of distinct color tags cycled across placed bodies. Tag 0 is
/// reserved for the central body.
pub const PALETTE_LEN: u32 = 6;

/// Integer grid coordinates of an outward square spiral around the origin.
///
/// Legs alternate between the x and y axes, each leg one unit longer than the
/// previous, so the first `n` coordinates are always distinct.
pub fn spiral_coords(n: usize) -> Vec<(i64, i64)> {
    let mut coords = Vec::with_capacity(n);
    let (mut x, mut y) = (0i64, 0i64);
    let dirs = [(1i64, 0i64), (0, 1), (-1, 0), (0, -1)];
    let mut dir = 0;
    let mut leg = 1;
    while coords.len() < n {
        let (dx, dy) = dirs[dir];
        for _ in 0..leg {
            x += dx;
            y += dy;
            coords.push((x, y));
            if coords.len() == n {
                break;
            }
        }
        dir = (dir + 1) % 4;
        leg += 1;
    }
    coords
}

/// Square-spiral positions for a population of `count` bodies (the central
/// body excluded, so `count - 1` positions are returned).
///
/// Partition size is `universe_height / sqrt(count)`, falling back to
/// `universe_height / 4` for small populations.
pub fn spiral_positions(count: usize, universe_height: f64) -> Vec<NVec3> {
    let root = (count as f64).sqrt();
    let partition = if root >= 4.0 {
        universe_height / root
    } else {
        universe_height / 4.0
    };
    spiral_coords(count.saturating_sub(1))
        .into_iter()
        .map(|(cx, cy)| NVec3::new(cx as f64 * partition, cy as f64 * partition, 0.0))
        .collect()
}

/// Circular-shell positions for a population of `count` bodies (`count - 1`
/// returned).
///
/// The angular step per ring keeps the chord between adjacent bodies near the
/// target spacing, with the remainder of the revolution redistributed evenly;
/// when the remaining bodies fit on one ring the step is simply
/// `2π / remaining`. The ring radius grows by a fixed increment once a full
/// revolution completes.
pub fn shell_positions(count: usize, max_diameter: f64) -> Vec<NVec3> {
    let to_place = count.saturating_sub(1);
    let chord = SHELL_SPACING * max_diameter;
    let mut positions = Vec::with_capacity(to_place);
    let mut ring_radius = chord;

    while positions.len() < to_place {
        let remaining = to_place - positions.len();

        // angle_step = 2·asin(chord / (2·radius)), argument clamped against
        // rings smaller than the chord
        let step = 2.0 * (chord / (2.0 * ring_radius)).min(1.0).asin();
        let ring_capacity = ((TAU / step).floor() as usize).max(1);

        let (on_ring, step) = if remaining <= ring_capacity {
            (remaining, TAU / remaining as f64)
        } else {
            (ring_capacity, TAU / ring_capacity as f64)
        };

        for k in 0..on_ring {
            let angle = step * k as f64;
            positions.push(NVec3::new(
                ring_radius * angle.cos(),
                ring_radius * angle.sin(),
                0.0,
            ));
        }

        ring_radius += chord;
    }
    positions
}

/// Circular-orbit speed magnitude for a body at distance `d` from a central
/// mass: sqrt(G·M/d).
pub fn perfect_orbit_speed(g: f64, central_mass: f64, d: f64) -> f64 {
    (g * central_mass / d).sqrt()
}

/// Synthesize an initial velocity for a body at `offset` from the central
/// body.
///
/// Direction: spherical angles of the offset, polar angle perturbed by the
/// chaos offset, azimuth rotated 90° so the velocity is roughly tangential
/// rather than radial.
pub fn orbit_velocity(
    offset: &NVec3,
    central_mass: f64,
    engine: &Engine,
    params: &Parameters,
    rng: &mut StdRng,
) -> NVec3 {
    let d = offset.norm();
    if d == 0.0 {
        return NVec3::zeros();
    }
    let speed = match engine.orbit {
        OrbitConfig::Perfect => perfect_orbit_speed(params.g, central_mass, d),
        OrbitConfig::Random => rng.gen_range(params.v_min..=params.v_max),
    };
    let theta = vecmath::polar_angle(offset, d) + params.chaos;
    let phi = vecmath::azimuth_angle(offset) + FRAC_PI_2;
    vecmath::spherical_unit(theta, phi) * speed
}

/// Build the full initial body set: the central body at index 0 plus
/// `count - 1` placed bodies with layout positions, synthesized velocities,
/// and masses/radii drawn from the configured ranges.
pub fn populate(engine: &Engine, params: &Parameters, pop: &Population) -> Vec<Body> {
    let mut rng = StdRng::seed_from_u64(params.seed);

    let mut bodies = Vec::with_capacity(pop.count);
    bodies.push(Body::new(
        0,
        0,
        "central".to_string(),
        NVec3::zeros(),
        NVec3::zeros(),
        pop.central_mass,
        pop.central_radius,
        0,
    ));

    let positions = match engine.layout {
        LayoutConfig::SquareSpiral => {
            spiral_positions(pop.count, 2.0 * params.universe_size)
        }
        LayoutConfig::CircularShells => {
            shell_positions(pop.count, 2.0 * pop.radius_max)
        }
    };

    for (k, x) in positions.into_iter().enumerate() {
        let idx = k + 1;
        let m = rng.gen_range(pop.mass_min..=pop.mass_max);
        let radius = rng.gen_range(pop.radius_min..=pop.radius_max);
        let v = orbit_velocity(&x, pop.central_mass, engine, params, &mut rng);
        let color = 1 + (k as u32 % PALETTE_LEN);
        bodies.push(Body::new(
            idx as u64,
            idx,
            format!("body-{idx}"),
            x,
            v,
            m,
            radius,
            color,
        ));
    }

    bodies
}
