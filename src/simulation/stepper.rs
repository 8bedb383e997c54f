//! Per-tick simulation loop
//!
//! Advances the system by one frame-step. Per tick, in order:
//!
//! 1. cull bodies flagged dead on the previous tick (destroy hooks, counters,
//!    index reassignment)
//! 2. rebuild the spatial grid from the live non-central bodies
//! 3. direct central pass: every live body against the central body, once,
//!    regardless of grid adjacency; the central body is then stamped so the
//!    grid pass never re-processes a central pair
//! 4. grid pass: each body against its grid neighbors (stamped partners
//!    skipped), then its position advance and boundary response
//! 5. rebuild the depth ordering and fire the final draw for bodies flagged
//!    dead this tick
//!
//! The tick is single-threaded and frame-stepped: the host supplies dt once
//! per frame and reads state only after the tick returns.

use std::cmp::Ordering;

use tracing::warn;

use crate::simulation::engine::Engine;
use crate::simulation::grid::SpatialGrid;
use crate::simulation::params::Parameters;
use crate::simulation::render::RenderHooks;
use crate::simulation::resolver::{apply_boundary, resolve_pair};
use crate::simulation::states::{Body, System};

/// Advance the system by one tick with externally supplied `dt`.
pub fn advance(
    sys: &mut System,
    grid: &mut SpatialGrid,
    engine: &Engine,
    params: &Parameters,
    dt: f64,
    hooks: &mut dyn RenderHooks,
) {
    cull_dead(sys, hooks);

    if sys.paused {
        return;
    }

    let n = sys.bodies.len();
    if n == 0 {
        return;
    }

    sys.tick += 1;
    let dt_scaled = dt * params.dt_scale;

    grid.build(&sys.bodies);

    // Direct central pass: the central body's dominant mass must never be
    // missed, so it is exempt from the grid restriction.
    for j in 1..n {
        resolve_pair(&mut sys.bodies, 0, j, engine, params, dt_scaled);
    }
    sys.stamps[0] = sys.tick;

    let central_mass = sys.bodies[0].m;

    // Grid pass, then per-body advance. The stamp marker ensures each pair is
    // resolved from one side only within a tick.
    for i in 0..n {
        if !sys.bodies[i].alive {
            continue;
        }
        if i != 0 {
            let neighbors = grid.neighbor_indices(&sys.bodies[i].x);
            for j in neighbors {
                if j == i || sys.stamps[j] == sys.tick {
                    continue;
                }
                resolve_pair(&mut sys.bodies, i, j, engine, params, dt_scaled);
            }
        }
        sys.stamps[i] = sys.tick;

        if !sys.bodies[i].alive {
            // flagged during its own neighbor pass; frozen for its final draw
            continue;
        }

        let body = &mut sys.bodies[i];
        body.x += body.v * dt_scaled;
        if i != 0 {
            apply_boundary(body, central_mass, engine, params);
        }
        contain_anomaly(body);
    }

    sys.t += dt;

    rebuild_depth_order(sys);

    // Final draw for bodies flagged dead during this tick; they are removed
    // at the start of the next tick.
    for body in sys.bodies.iter().filter(|b| b.pending_dead) {
        hooks.draw(body);
    }
}

/// Remove bodies flagged dead on a previous tick, firing destroy hooks and
/// tallying the swallowed/escaped counters. Indices are reassigned
/// contiguously afterwards; stale stamps are harmless because the tick
/// counter has moved on.
fn cull_dead(sys: &mut System, hooks: &mut dyn RenderHooks) {
    if !sys.bodies.iter().any(|b| b.pending_dead) {
        return;
    }

    let mut swallowed = 0u32;
    let mut escaped = 0u32;
    sys.bodies.retain(|b| {
        if b.pending_dead {
            if b.swallowed {
                swallowed += 1;
            } else if b.escaped {
                escaped += 1;
            }
            hooks.destroy(b);
            false
        } else {
            true
        }
    });
    sys.swallowed_total += swallowed;
    sys.escaped_total += escaped;

    for (k, b) in sys.bodies.iter_mut().enumerate() {
        b.index = k;
    }
    sys.stamps.clear();
    sys.stamps.resize(sys.bodies.len(), 0);
}

/// A per-body numerical anomaly is contained to that body: it is flagged as
/// an escape rather than halting the simulation.
fn contain_anomaly(body: &mut Body) {
    let finite = body.x.iter().all(|c| c.is_finite()) && body.v.iter().all(|c| c.is_finite());
    if !finite {
        warn!(name = %body.name, "non-finite state, containing as escape");
        body.flag_escaped();
    }
}

/// Painter's ordering for draw sequencing: farthest along the view axis
/// first. Rebuilt every tick alongside the grid.
fn rebuild_depth_order(sys: &mut System) {
    let bodies = &sys.bodies;
    sys.depth_order.clear();
    sys.depth_order.extend(0..bodies.len());
    sys.depth_order.sort_by(|&a, &b| {
        bodies[a]
            .x
            .z
            .partial_cmp(&bodies[b].x.z)
            .unwrap_or(Ordering::Equal)
    });
}
