//! Core state types for the orbital simulation.
//!
//! Defines the body and system structs:
//! - `Body`   – one massive sphere with position, velocity, and lifecycle flags
//! - `System` – the body collection plus per-tick bookkeeping
//!
//! The system holds the list of bodies, the current simulation time `t`, the
//! per-tick visited stamps used to deduplicate pairwise work, the depth
//! ordering used for draw sequencing, and the running swallowed/escaped
//! counters.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

/// One simulated point-mass-with-radius entity.
///
/// `index` is the body's current slot in `System::bodies` and is reassigned
/// after dead bodies are culled; `id` is a stable handle that never changes
/// and is never reused, so external collaborators (rendering, persistence)
/// can track a body across index shifts.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: u64, // stable handle, unique for the lifetime of the system
    pub index: usize, // current slot in the body array
    pub name: String, // display name
    pub x: NVec3, // position (m)
    pub v: NVec3, // velocity (m/s)
    pub m: f64, // mass (kg scale)
    pub radius: f64, // radius (display-unit scale)
    pub color: u32, // opaque color tag forwarded to the renderer
    pub alive: bool, // false once swallowed or escaped
    pub pending_dead: bool, // flagged for removal at the next tick
    pub swallowed: bool, // died by absorption
    pub escaped: bool, // died by leaving the gravitational range
    pub swallowed_by: Option<usize>, // index of the absorbing body, if swallowed
}

impl Body {
    pub fn new(id: u64, index: usize, name: String, x: NVec3, v: NVec3, m: f64, radius: f64, color: u32) -> Self {
        Self {
            id,
            index,
            name,
            x,
            v,
            m,
            radius,
            color,
            alive: true,
            pending_dead: false,
            swallowed: false,
            escaped: false,
            swallowed_by: None,
        }
    }

    /// Flag this body as swallowed by `absorber`. It stays in the set until
    /// the next tick so it can be drawn one final time.
    pub fn flag_swallowed(&mut self, absorber: usize) {
        self.alive = false;
        self.pending_dead = true;
        self.swallowed = true;
        self.swallowed_by = Some(absorber);
    }

    /// Flag this body as escaped. Same one-tick removal lag as swallowing.
    pub fn flag_escaped(&mut self) {
        self.alive = false;
        self.pending_dead = true;
        self.escaped = true;
    }
}

/// The active body collection and per-tick bookkeeping.
///
/// Invariants:
/// - exactly one central body, always at index 0, never removed
/// - a body's mass/radius only increase (via merge) until it is removed
/// - positions and velocities stay finite; non-finite state is contained by
///   flagging the body as escaped
#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // index 0 is always the central body
    pub t: f64, // simulation time
    pub tick: u64, // generation counter for the visited stamps
    pub stamps: Vec<u64>, // per-body visited marker, keyed by body index
    pub depth_order: Vec<usize>, // draw sequencing, farthest along +z first
    pub swallowed_total: u32, // bodies removed by absorption
    pub escaped_total: u32, // bodies removed by escape
    pub paused: bool, // suppresses velocity/position mutation only
    pub generation: u64, // incremented on reset so collaborators can rebuild
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        let n = bodies.len();
        Self {
            bodies,
            t: 0.0,
            tick: 0,
            stamps: vec![0; n],
            depth_order: (0..n).collect(),
            swallowed_total: 0,
            escaped_total: 0,
            paused: false,
            generation: 0,
        }
    }

    /// Per-frame snapshot of the central body's position, for any consumer
    /// that needs a lighting/proximity reference. An explicit value, not
    /// shared mutable state.
    pub fn central_position(&self) -> NVec3 {
        self.bodies[0].x
    }

    pub fn central_mass(&self) -> f64 {
        self.bodies[0].m
    }

    /// Depth-ordered snapshot of the bodies to draw this frame. Includes
    /// bodies flagged dead this tick (their one final draw).
    pub fn draw_order(&self) -> &[usize] {
        &self.depth_order
    }

    pub fn alive_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.alive).count()
    }
}
