use orbsim::configuration::config::{
    BoundaryConfig, EngineConfig, LayoutConfig, OrbitConfig, ParametersConfig, PopulationConfig,
    ScenarioConfig,
};
use orbsim::persistence::snapshot::{self, SaveState};
use orbsim::simulation::engine::Engine;
use orbsim::simulation::grid::{SpatialGrid, GRID_DIVISOR};
use orbsim::simulation::params::Parameters;
use orbsim::simulation::placement;
use orbsim::simulation::render::{NullRender, RenderHooks};
use orbsim::simulation::resolver::{
    self, inelastic_axis, merged_radius, resolve_pair, MASS_RETAIN,
};
use orbsim::simulation::scenario::Scenario;
use orbsim::simulation::states::{Body, NVec3, System};
use orbsim::simulation::stepper::advance;
use orbsim::simulation::vecmath;

/// Default physics parameters for tests. Gravity is off by default so
/// collision behavior can be checked in isolation; tests that need gravity
/// set `g` explicitly.
fn test_params() -> Parameters {
    Parameters {
        g: 0.0,
        dt_scale: 1.0,
        universe_size: 500.0,
        gravity_range: 1.0e9,
        cor: 0.25,
        wall_cor: 0.9,
        wrap_loss: 0.75,
        chaos: 0.25,
        v_min: 1.0,
        v_max: 2.0,
        seed: 42,
    }
}

fn test_engine() -> Engine {
    Engine {
        layout: LayoutConfig::CircularShells,
        boundary: BoundaryConfig::Bounce,
        orbit: OrbitConfig::Perfect,
        escape: true,
    }
}

fn body_at(index: usize, x: NVec3, v: NVec3, m: f64, radius: f64) -> Body {
    Body::new(index as u64, index, format!("body-{index}"), x, v, m, radius, 1)
}

/// Central body plus two unit-radius, equal-mass bodies approaching head-on
/// along x, separated by `dist`. The central body is parked far away so it
/// does not interfere with the pair under test.
fn head_on_system(dist: f64) -> Vec<Body> {
    vec![
        body_at(0, NVec3::new(0.0, 0.0, 400.0), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, NVec3::new(0.0, 0.0, 0.0), NVec3::new(1.0, 0.0, 0.0), 10.0, 1.0),
        body_at(2, NVec3::new(dist, 0.0, 0.0), NVec3::new(-1.0, 0.0, 0.0), 10.0, 1.0),
    ]
}

/// Hooks that record draw/destroy calls by body name.
#[derive(Default)]
struct Recorder {
    draws: Vec<String>,
    destroys: Vec<String>,
}

impl RenderHooks for Recorder {
    fn draw(&mut self, body: &Body) {
        self.draws.push(body.name.clone());
    }

    fn destroy(&mut self, body: &Body) {
        self.destroys.push(body.name.clone());
    }
}

fn make_scenario(count: usize) -> Scenario {
    Scenario::build_scenario(ScenarioConfig {
        engine: EngineConfig {
            layout: LayoutConfig::CircularShells,
            boundary: BoundaryConfig::Bounce,
            orbit: OrbitConfig::Perfect,
            escape: Some(true),
        },
        parameters: ParametersConfig {
            g: 6.674e-11,
            dt_scale: 1.0,
            universe_size: 500.0,
            gravity_range: 2000.0,
            cor: Some(0.25),
            wall_cor: Some(0.9),
            wrap_loss: Some(0.75),
            chaos: Some(0.25),
            v_min: Some(10.0),
            v_max: Some(50.0),
            seed: 42,
        },
        population: PopulationConfig {
            count,
            central_mass: 1.0e15,
            central_radius: 20.0,
            mass_min: 1.0e9,
            mass_max: 1.0e11,
            radius_min: 1.0,
            radius_max: 4.0,
        },
    })
}

// ==================================================================================
// Vector math tests
// ==================================================================================

#[test]
fn unit_of_zero_vector_is_zero() {
    let z = vecmath::unit_or_zero(&NVec3::zeros());
    assert_eq!(z, NVec3::zeros());

    let d = vecmath::direction(&NVec3::new(1.0, 2.0, 3.0), &NVec3::new(1.0, 2.0, 3.0));
    assert_eq!(d, NVec3::zeros());
}

#[test]
fn angle_between_guards_acos_domain() {
    // Parallel vectors whose dot/norm product can drift above 1.0
    let a = NVec3::new(0.1 + 0.2, 0.3, 0.7);
    let b = a * 3.0;
    let angle = vecmath::angle_between(&a, &b);
    assert!(angle.is_finite());
    assert!(angle.abs() < 1e-7, "parallel vectors should give ~0, got {angle}");

    let opposite = vecmath::angle_between(&a, &(-a));
    assert!((opposite - std::f64::consts::PI).abs() < 1e-7);
}

#[test]
fn spherical_direction_matches_normalized_offset() {
    let offset = NVec3::new(3.0, -2.0, 5.0);
    let d = offset.norm();
    let via_angles = vecmath::spherical_direction(&offset, d);
    let direct = offset / d;
    assert!((via_angles - direct).norm() < 1e-12);
}

// ==================================================================================
// Spatial grid tests
// ==================================================================================

#[test]
fn grid_clamps_out_of_range_positions() {
    let grid = SpatialGrid::new(500.0);

    let (cx, _, _) = grid.cell_of(&NVec3::new(10_000.0, 0.0, 0.0));
    assert_eq!(cx, GRID_DIVISOR - 1);

    let (cx, _, _) = grid.cell_of(&NVec3::new(-10_000.0, 0.0, 0.0));
    assert_eq!(cx, 0);
}

#[test]
fn grid_neighbors_symmetric_across_faces() {
    let mut grid = SpatialGrid::new(500.0);
    let cell = grid.cell_size;

    // Two bodies in face-adjacent cells along x, plus the central body
    let a_pos = NVec3::new(-500.0 + 0.5 * cell, 0.0, 0.0);
    let b_pos = NVec3::new(-500.0 + 1.5 * cell, 0.0, 0.0);
    let bodies = vec![
        body_at(0, NVec3::zeros(), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, a_pos, NVec3::zeros(), 1.0, 1.0),
        body_at(2, b_pos, NVec3::zeros(), 1.0, 1.0),
    ];
    grid.build(&bodies);

    assert!(grid.neighbor_indices(&a_pos).contains(&2));
    assert!(grid.neighbor_indices(&b_pos).contains(&1));
}

#[test]
fn grid_skips_pure_corner_cells() {
    let mut grid = SpatialGrid::new(500.0);
    let cell = grid.cell_size;
    let base = -500.0 + 0.5 * cell;

    // Bodies in cells offset by (1,1,1): corner-only adjacency, documented miss
    let a_pos = NVec3::new(base, base, base);
    let b_pos = NVec3::new(base + cell, base + cell, base + cell);
    let bodies = vec![
        body_at(0, NVec3::zeros(), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, a_pos, NVec3::zeros(), 1.0, 1.0),
        body_at(2, b_pos, NVec3::zeros(), 1.0, 1.0),
    ];
    grid.build(&bodies);

    assert!(!grid.neighbor_indices(&a_pos).contains(&2));
    assert!(!grid.neighbor_indices(&b_pos).contains(&1));
}

#[test]
fn grid_never_holds_the_central_body() {
    let mut grid = SpatialGrid::new(500.0);
    let pos = NVec3::new(10.0, 10.0, 10.0);
    let bodies = vec![
        body_at(0, pos, NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, pos, NVec3::zeros(), 1.0, 1.0),
    ];
    grid.build(&bodies);

    let near = grid.neighbor_indices(&pos);
    assert!(!near.contains(&0));
    assert!(near.contains(&1));
}

// ==================================================================================
// Collision tests
// ==================================================================================

#[test]
fn inelastic_axis_matches_momentum_formula() {
    let (m1, u1, m2, u2, cor) = (2.0, 3.0, 1.0, -1.0, 0.25);
    let (v1, v2) = inelastic_axis(m1, u1, m2, u2, cor);

    let expected_v1 = (m1 * u1 + m2 * u2 + cor * m2 * (u2 - u1)) / (m1 + m2);
    let expected_v2 = (m1 * u1 + m2 * u2 + cor * m1 * (u1 - u2)) / (m1 + m2);
    assert_eq!(v1, expected_v1);
    assert_eq!(v2, expected_v2);

    // cor = 1 with equal masses is the elastic swap
    let (e1, e2) = inelastic_axis(1.0, 5.0, 1.0, -2.0, 1.0);
    assert!((e1 - -2.0).abs() < 1e-12);
    assert!((e2 - 5.0).abs() < 1e-12);
}

#[test]
fn shallow_collision_damps_velocities_without_merge() {
    // Equal masses, unit radii, barely touching: shallow contact
    let mut bodies = head_on_system(1.99);
    let params = test_params();
    let engine = test_engine();

    resolve_pair(&mut bodies, 1, 2, &engine, &params, 1.0 / 60.0);

    // Per-axis formula with m1 = m2, u1 = 1, u2 = -1, cor = 0.25:
    // v1' = -cor, v2' = +cor
    assert!((bodies[1].v.x - -0.25).abs() < 1e-12);
    assert!((bodies[2].v.x - 0.25).abs() < 1e-12);
    assert_eq!(bodies[1].v.y, 0.0);
    assert_eq!(bodies[1].v.z, 0.0);

    assert!(bodies[1].alive && bodies[2].alive);
    assert!(!bodies[1].pending_dead && !bodies[2].pending_dead);
    assert!(!bodies[1].swallowed && !bodies[2].swallowed);
}

#[test]
fn deep_collision_merges_smaller_into_larger() {
    let mut bodies = head_on_system(1.5);
    bodies[1].radius = 1.2; // make body 1 the absorber
    let mass_before = bodies[1].m;
    let params = test_params();
    let engine = test_engine();

    resolve_pair(&mut bodies, 1, 2, &engine, &params, 1.0 / 60.0);

    let smaller = &bodies[2];
    assert!(!smaller.alive);
    assert!(smaller.pending_dead);
    assert!(smaller.swallowed);
    assert_eq!(smaller.swallowed_by, Some(1));

    let larger = &bodies[1];
    assert!((larger.m - (mass_before + MASS_RETAIN * 10.0)).abs() < 1e-9);
    assert!((larger.radius - merged_radius(1.2, 1.0)).abs() < 1e-12);
}

#[test]
fn merged_radius_is_equal_volume_sphere() {
    // cbrt(r1^3 + r2^3)
    let r = merged_radius(2.0, 1.0);
    assert!((r - 9.0_f64.cbrt()).abs() < 1e-12);

    assert!(merged_radius(3.0, 2.0) >= 3.0);
    assert!((merged_radius(1.5, 0.0) - 1.5).abs() < 1e-12);
}

#[test]
fn pending_dead_body_is_not_absorbed_twice() {
    let mut bodies = vec![
        body_at(0, NVec3::new(0.0, 0.0, 400.0), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, NVec3::new(0.0, 0.0, 0.0), NVec3::zeros(), 10.0, 2.0),
        body_at(2, NVec3::new(0.5, 0.0, 0.0), NVec3::zeros(), 4.0, 1.0),
        body_at(3, NVec3::new(1.0, 0.0, 0.0), NVec3::zeros(), 20.0, 3.0),
    ];
    let params = test_params();
    let engine = test_engine();

    // Body 2 is swallowed by body 1 first
    resolve_pair(&mut bodies, 1, 2, &engine, &params, 1.0 / 60.0);
    assert_eq!(bodies[2].swallowed_by, Some(1));

    // The later overlapping pair must skip the already-dead body
    let mass_before = bodies[3].m;
    resolve_pair(&mut bodies, 3, 2, &engine, &params, 1.0 / 60.0);
    assert_eq!(bodies[2].swallowed_by, Some(1));
    assert_eq!(bodies[3].m, mass_before);
}

// ==================================================================================
// Gravity and escape tests
// ==================================================================================

#[test]
fn gravity_pulls_pair_together_symmetrically() {
    let mut params = test_params();
    params.g = 1.0;
    let engine = test_engine();

    let mut bodies = vec![
        body_at(0, NVec3::new(0.0, 0.0, 400.0), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, NVec3::new(-1.0, 0.0, 0.0), NVec3::zeros(), 2.0, 0.1),
        body_at(2, NVec3::new(1.0, 0.0, 0.0), NVec3::zeros(), 3.0, 0.1),
    ];
    resolve_pair(&mut bodies, 1, 2, &engine, &params, 1.0);

    // F = G*m1*m2/d^2 = 1*2*3/4 = 1.5; dv1 = F/m1, dv2 = F/m2, toward each other
    assert!((bodies[1].v.x - 0.75).abs() < 1e-12, "got {}", bodies[1].v.x);
    assert!((bodies[2].v.x - -0.5).abs() < 1e-12, "got {}", bodies[2].v.x);

    // momentum change cancels
    let net = bodies[1].v * bodies[1].m + bodies[2].v * bodies[2].m;
    assert!(net.norm() < 1e-12);
}

#[test]
fn gravity_skipped_beyond_range_for_non_central_pairs() {
    let mut params = test_params();
    params.g = 1.0;
    params.gravity_range = 10.0;
    let engine = test_engine();

    let mut bodies = vec![
        body_at(0, NVec3::zeros(), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, NVec3::new(100.0, 0.0, 0.0), NVec3::zeros(), 2.0, 0.1),
        body_at(2, NVec3::new(200.0, 0.0, 0.0), NVec3::zeros(), 3.0, 0.1),
    ];
    resolve_pair(&mut bodies, 1, 2, &engine, &params, 1.0);

    assert_eq!(bodies[1].v, NVec3::zeros());
    assert_eq!(bodies[2].v, NVec3::zeros());
    assert!(bodies[1].alive && bodies[2].alive);
}

#[test]
fn body_beyond_range_of_central_is_culled() {
    let mut params = test_params();
    params.g = 1.0;
    params.gravity_range = 50.0;
    let engine = test_engine();

    let mut bodies = vec![
        body_at(0, NVec3::zeros(), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, NVec3::new(60.0, 0.0, 0.0), NVec3::zeros(), 2.0, 0.1),
    ];
    resolve_pair(&mut bodies, 0, 1, &engine, &params, 1.0);

    assert!(!bodies[1].alive);
    assert!(bodies[1].pending_dead);
    assert!(bodies[1].escaped);
    assert!(!bodies[1].swallowed);
    // the central body is never culled
    assert!(bodies[0].alive);
}

#[test]
fn escape_disabled_turns_cull_into_force_cutoff() {
    let mut params = test_params();
    params.g = 1.0;
    params.gravity_range = 50.0;
    let mut engine = test_engine();
    engine.escape = false;

    let mut bodies = vec![
        body_at(0, NVec3::zeros(), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, NVec3::new(60.0, 0.0, 0.0), NVec3::zeros(), 2.0, 0.1),
    ];
    resolve_pair(&mut bodies, 0, 1, &engine, &params, 1.0);

    assert!(bodies[1].alive);
    assert_eq!(bodies[1].v, NVec3::zeros());
}

// ==================================================================================
// Boundary tests
// ==================================================================================

#[test]
fn wrap_boundary_reenters_with_axis_loss_and_sign_flips() {
    let params = test_params();
    let mut engine = test_engine();
    engine.boundary = BoundaryConfig::Wrap;

    let mut body = body_at(1, NVec3::new(505.0, 0.0, 0.0), NVec3::new(10.0, 5.0, -3.0), 1.0, 1.0);
    resolver::apply_boundary(&mut body, 1.0e6, &engine, &params);

    assert_eq!(body.x.x, -500.0);
    assert!((body.v.x - 7.5).abs() < 1e-12); // 10 * 0.75
    assert!((body.v.y - -5.0).abs() < 1e-12);
    assert!((body.v.z - 3.0).abs() < 1e-12);
}

#[test]
fn bounce_boundary_uses_wall_of_central_mass() {
    let params = test_params();
    let engine = test_engine();

    let (m, central_mass, u) = (1.0, 1.0e6, 10.0);
    let mut body = body_at(1, NVec3::new(505.0, 0.0, 0.0), NVec3::new(u, 0.0, 0.0), m, 1.0);
    resolver::apply_boundary(&mut body, central_mass, &engine, &params);

    // same momentum formula as body-body collisions, wall velocity zero
    let expected = (m * u + params.wall_cor * central_mass * (0.0 - u)) / (m + central_mass);
    assert!((body.v.x - expected).abs() < 1e-12);
    assert!(body.v.x < 0.0, "wall must reverse the crossed axis");
    // position is left alone in bounce mode
    assert_eq!(body.x.x, 505.0);
}

#[test]
fn bodies_inside_bounds_are_untouched() {
    let params = test_params();
    let engine = test_engine();

    let mut body = body_at(1, NVec3::new(499.0, -499.0, 0.0), NVec3::new(1.0, 2.0, 3.0), 1.0, 1.0);
    resolver::apply_boundary(&mut body, 1.0e6, &engine, &params);

    assert_eq!(body.v, NVec3::new(1.0, 2.0, 3.0));
    assert_eq!(body.x, NVec3::new(499.0, -499.0, 0.0));
}

// ==================================================================================
// Placement tests
// ==================================================================================

#[test]
fn spiral_places_nine_distinct_coordinates_for_ten_bodies() {
    let coords = placement::spiral_coords(9);
    assert_eq!(coords.len(), 9);
    for (i, a) in coords.iter().enumerate() {
        for b in coords.iter().skip(i + 1) {
            assert_ne!(a, b, "spiral produced duplicate coordinate {a:?}");
        }
    }

    let positions = placement::spiral_positions(10, 1000.0);
    assert_eq!(positions.len(), 9);
    for (i, a) in positions.iter().enumerate() {
        for b in positions.iter().skip(i + 1) {
            assert!((a - b).norm() > 1.0, "positions overlap: {a:?} vs {b:?}");
        }
    }
}

#[test]
fn shells_place_all_bodies_on_growing_rings() {
    let count = 40;
    let positions = placement::shell_positions(count, 8.0);
    assert_eq!(positions.len(), count - 1);

    let mut last_ring = 0.0;
    for p in &positions {
        let ring = p.norm();
        assert!(ring > 0.0);
        assert!(ring + 1e-9 >= last_ring, "ring radius must not shrink");
        last_ring = last_ring.max(ring);
        assert_eq!(p.z, 0.0);
    }
}

#[test]
fn perfect_orbit_speed_is_exact() {
    let (g, m, d) = (6.674e-11, 1.0e24, 250.0);
    let speed = placement::perfect_orbit_speed(g, m, d);
    assert_eq!(speed, (g * m / d).sqrt());
}

#[test]
fn orbit_velocity_is_tangential_without_chaos() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut params = test_params();
    params.g = 6.674e-11;
    params.chaos = 0.0;
    let engine = test_engine();
    let mut rng = StdRng::seed_from_u64(params.seed);

    let offset = NVec3::new(120.0, -80.0, 0.0);
    let central_mass = 1.0e24;
    let v = placement::orbit_velocity(&offset, central_mass, &engine, &params, &mut rng);

    let expected_speed = (params.g * central_mass / offset.norm()).sqrt();
    assert!((v.norm() - expected_speed).abs() < 1e-9 * expected_speed);
    // 90° azimuth rotation makes the velocity perpendicular to the offset
    assert!(v.dot(&offset).abs() < 1e-6 * v.norm() * offset.norm());
}

#[test]
fn random_orbit_speed_stays_in_configured_range() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let params = test_params();
    let mut engine = test_engine();
    engine.orbit = OrbitConfig::Random;
    let mut rng = StdRng::seed_from_u64(7);

    for k in 1..50 {
        let offset = NVec3::new(k as f64 * 3.0, 10.0, 0.0);
        let v = placement::orbit_velocity(&offset, 1.0e24, &engine, &params, &mut rng);
        let speed = v.norm();
        assert!(speed >= params.v_min - 1e-12 && speed <= params.v_max + 1e-12);
    }
}

#[test]
fn populate_builds_central_body_plus_population() {
    let scenario = make_scenario(30);
    let bodies = &scenario.system.bodies;

    assert_eq!(bodies.len(), 30);
    assert_eq!(bodies[0].index, 0);
    assert_eq!(bodies[0].name, "central");
    assert_eq!(bodies[0].x, NVec3::zeros());
    for b in bodies.iter().skip(1) {
        assert!(b.m >= 1.0e9 && b.m <= 1.0e11);
        assert!(b.radius >= 1.0 && b.radius <= 4.0);
        assert!(b.m < bodies[0].m);
        assert!(b.alive);
    }
}

#[test]
fn populate_is_deterministic_for_a_seed() {
    let a = make_scenario(25);
    let b = make_scenario(25);
    for (ba, bb) in a.system.bodies.iter().zip(b.system.bodies.iter()) {
        assert_eq!(ba.x, bb.x);
        assert_eq!(ba.v, bb.v);
        assert_eq!(ba.m, bb.m);
    }
}

// ==================================================================================
// Simulation loop tests
// ==================================================================================

#[test]
fn tick_resolves_each_pair_once() {
    // Barely-touching pair in the same cell; if the pair were processed from
    // both sides in one tick the damping would be applied twice.
    let params = test_params();
    let engine = test_engine();
    let mut sys = System::new(head_on_system(1.99));
    let mut grid = SpatialGrid::new(params.universe_size);

    advance(&mut sys, &mut grid, &engine, &params, 1.0 / 60.0, &mut NullRender);

    assert!((sys.bodies[1].v.x - -0.25).abs() < 1e-12);
    assert!((sys.bodies[2].v.x - 0.25).abs() < 1e-12);
}

#[test]
fn dead_bodies_are_removed_one_tick_late_with_hooks() {
    let mut params = test_params();
    params.g = 1.0;
    params.gravity_range = 50.0;
    let engine = test_engine();

    let bodies = vec![
        body_at(0, NVec3::zeros(), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, NVec3::new(60.0, 0.0, 0.0), NVec3::zeros(), 2.0, 0.1),
    ];
    let mut sys = System::new(bodies);
    let mut grid = SpatialGrid::new(params.universe_size);
    let mut hooks = Recorder::default();

    // Tick 1: flagged, final draw fired, still present
    advance(&mut sys, &mut grid, &engine, &params, 1.0 / 60.0, &mut hooks);
    assert_eq!(sys.bodies.len(), 2);
    assert!(sys.bodies[1].escaped);
    assert_eq!(hooks.draws, vec!["body-1".to_string()]);
    assert!(hooks.destroys.is_empty());
    assert_eq!(sys.escaped_total, 0);

    // Tick 2: removed, destroy fired, counter tallied
    advance(&mut sys, &mut grid, &engine, &params, 1.0 / 60.0, &mut hooks);
    assert_eq!(sys.bodies.len(), 1);
    assert_eq!(hooks.destroys, vec!["body-1".to_string()]);
    assert_eq!(sys.escaped_total, 1);
    assert_eq!(sys.swallowed_total, 0);
}

#[test]
fn swallowed_body_tallies_and_absorber_grows_through_tick() {
    let params = test_params();
    let engine = test_engine();

    let mut bodies = head_on_system(1.5);
    bodies[1].radius = 1.2;
    let mut sys = System::new(bodies);
    let mut grid = SpatialGrid::new(params.universe_size);

    advance(&mut sys, &mut grid, &engine, &params, 1.0 / 60.0, &mut NullRender);
    assert_eq!(sys.bodies.len(), 3);
    assert!(sys.bodies[2].swallowed);

    advance(&mut sys, &mut grid, &engine, &params, 1.0 / 60.0, &mut NullRender);
    assert_eq!(sys.bodies.len(), 2);
    assert_eq!(sys.swallowed_total, 1);
    // indices reassigned contiguously after the cull
    for (k, b) in sys.bodies.iter().enumerate() {
        assert_eq!(b.index, k);
    }
}

#[test]
fn pause_freezes_positions_and_velocities() {
    let mut params = test_params();
    params.g = 1.0;
    let engine = test_engine();

    let mut sys = System::new(head_on_system(50.0));
    sys.paused = true;
    let before: Vec<_> = sys.bodies.iter().map(|b| (b.x, b.v)).collect();
    let mut grid = SpatialGrid::new(params.universe_size);

    advance(&mut sys, &mut grid, &engine, &params, 1.0 / 60.0, &mut NullRender);

    for (b, (x, v)) in sys.bodies.iter().zip(before) {
        assert_eq!(b.x, x);
        assert_eq!(b.v, v);
    }
    assert_eq!(sys.t, 0.0);
}

#[test]
fn depth_order_sorts_far_to_near() {
    let params = test_params();
    let engine = test_engine();

    let bodies = vec![
        body_at(0, NVec3::new(0.0, 0.0, 10.0), NVec3::zeros(), 1.0e6, 5.0),
        body_at(1, NVec3::new(100.0, 0.0, -200.0), NVec3::zeros(), 1.0, 1.0),
        body_at(2, NVec3::new(-100.0, 0.0, 300.0), NVec3::zeros(), 1.0, 1.0),
    ];
    let mut sys = System::new(bodies);
    let mut grid = SpatialGrid::new(params.universe_size);

    advance(&mut sys, &mut grid, &engine, &params, 1.0 / 60.0, &mut NullRender);

    let order = sys.draw_order();
    assert_eq!(order.to_vec(), vec![1, 0, 2]);
}

#[test]
fn advance_runs_many_ticks_without_losing_the_central_body() {
    let mut scenario = make_scenario(40);
    for _ in 0..120 {
        scenario.advance(1.0 / 60.0, &mut NullRender);
    }
    assert_eq!(scenario.system.bodies[0].index, 0);
    assert_eq!(scenario.system.bodies[0].name, "central");
    // the per-frame central snapshot tracks the body itself
    assert_eq!(scenario.system.central_position(), scenario.system.bodies[0].x);
    assert_eq!(scenario.system.central_mass(), scenario.system.bodies[0].m);
    for b in &scenario.system.bodies {
        assert!(b.x.iter().all(|c| c.is_finite()));
        assert!(b.v.iter().all(|c| c.is_finite()));
    }
}

#[test]
fn reset_rebuilds_population_and_bumps_generation() {
    let mut scenario = make_scenario(20);
    let generation = scenario.system.generation;

    scenario.reset(35);
    assert_eq!(scenario.system.bodies.len(), 35);
    assert_eq!(scenario.system.generation, generation + 1);
    assert_eq!(scenario.system.swallowed_total, 0);
    assert_eq!(scenario.system.t, 0.0);

    scenario.start_over();
    assert_eq!(scenario.system.bodies.len(), 35);
    assert_eq!(scenario.system.generation, generation + 2);
}

// ==================================================================================
// Configuration tests
// ==================================================================================

#[test]
fn scenario_yaml_round_trips_through_serde() {
    let yaml = r#"
engine:
  layout: "spiral"
  boundary: "wrap"
  orbit: "random"
  escape: false

parameters:
  G: 6.674e-11
  dt_scale: 2.0
  universe_size: 400.0
  gravity_range: 1500.0
  cor: 0.3
  seed: 99

population:
  count: 12
  central_mass: 5.0e23
  central_radius: 15.0
  mass_min: 1.0e17
  mass_max: 1.0e19
  radius_min: 0.5
  radius_max: 2.0
"#;
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).expect("scenario yaml should parse");
    assert_eq!(cfg.engine.layout, LayoutConfig::SquareSpiral);
    assert_eq!(cfg.engine.boundary, BoundaryConfig::Wrap);
    assert_eq!(cfg.engine.orbit, OrbitConfig::Random);
    assert_eq!(cfg.engine.escape, Some(false));
    assert_eq!(cfg.parameters.g, 6.674e-11);
    assert_eq!(cfg.parameters.cor, Some(0.3));
    assert_eq!(cfg.parameters.wall_cor, None);
    assert_eq!(cfg.population.count, 12);

    let scenario = Scenario::build_scenario(cfg);
    // unspecified optionals fall back to their defaults
    assert_eq!(scenario.parameters.wall_cor, 0.9);
    assert_eq!(scenario.parameters.cor, 0.3);
    assert_eq!(scenario.system.bodies.len(), 12);
}

// ==================================================================================
// Persistence tests
// ==================================================================================

#[test]
fn save_state_round_trips_exactly() {
    let mut original = make_scenario(15);
    for _ in 0..30 {
        original.advance(1.0 / 60.0, &mut NullRender);
    }

    let save = snapshot::capture(&original);
    let mut restored = make_scenario(3);
    snapshot::restore(&mut restored, &save).expect("restore should succeed");

    assert_eq!(restored.system.bodies.len(), original.system.alive_count());
    assert_eq!(restored.system.swallowed_total, original.system.swallowed_total);
    assert_eq!(restored.system.escaped_total, original.system.escaped_total);

    for (a, b) in original
        .system
        .bodies
        .iter()
        .filter(|b| b.alive)
        .zip(restored.system.bodies.iter())
    {
        assert_eq!(a.name, b.name);
        assert_eq!(a.m, b.m);
        assert_eq!(a.color, b.color);
        assert_eq!(a.x, b.x);
        assert_eq!(a.v, b.v);
        // radius passes through the AU scaling, so allow rounding
        assert!((a.radius - b.radius).abs() < 1e-9 * a.radius.max(1.0));
    }

    // capture of the restored scenario matches the original record set
    let resaved = snapshot::capture(&restored);
    assert_eq!(resaved.bodies.len(), save.bodies.len());
    for (a, b) in save.bodies.iter().zip(resaved.bodies.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.mass, b.mass);
        assert_eq!(a.x, b.x);
        assert_eq!(a.vx, b.vx);
    }
}

#[test]
fn restore_rejects_corrupt_state_without_mutation() {
    let mut scenario = make_scenario(10);
    let before_len = scenario.system.bodies.len();
    let before_pos = scenario.system.bodies[3].x;

    // empty body list
    let empty = SaveState {
        universe_size: 500.0,
        layout: LayoutConfig::CircularShells,
        orbit: OrbitConfig::Perfect,
        boundary: BoundaryConfig::Bounce,
        swallowed: 0,
        escaped: 0,
        bodies: vec![],
    };
    assert!(snapshot::restore(&mut scenario, &empty).is_err());

    // non-finite velocity
    let mut bad = snapshot::capture(&scenario);
    bad.bodies[2].vx = f64::NAN;
    assert!(snapshot::restore(&mut scenario, &bad).is_err());

    // central body missing from slot zero
    let mut shifted = snapshot::capture(&scenario);
    shifted.bodies[0].index = 4;
    assert!(snapshot::restore(&mut scenario, &shifted).is_err());

    // the failed loads must not have touched the live system
    assert_eq!(scenario.system.bodies.len(), before_len);
    assert_eq!(scenario.system.bodies[3].x, before_pos);
}

#[test]
fn save_and_load_through_a_file() {
    let dir = std::env::temp_dir();
    let path = dir.join("orbsim_snapshot_test.yaml");

    let mut original = make_scenario(8);
    for _ in 0..10 {
        original.advance(1.0 / 60.0, &mut NullRender);
    }
    snapshot::save_to_path(&original, &path).expect("save should succeed");

    let mut restored = make_scenario(3);
    snapshot::load_from_path(&mut restored, &path).expect("load should succeed");
    assert_eq!(restored.system.bodies.len(), original.system.alive_count());

    std::fs::remove_file(&path).ok();
}
