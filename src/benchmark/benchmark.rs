use std::time::Instant;

use crate::configuration::config::{BoundaryConfig, LayoutConfig, OrbitConfig};
use crate::simulation::engine::Engine;
use crate::simulation::grid::SpatialGrid;
use crate::simulation::params::Parameters;
use crate::simulation::render::NullRender;
use crate::simulation::resolver::resolve_pair;
use crate::simulation::states::{Body, NVec3, System};
use crate::simulation::stepper::advance;

/// Helper to build a manual System of size `n`
/// deterministic positions, no rand needed
fn make_system(n: usize) -> System {
    let mut bodies = Vec::with_capacity(n);

    bodies.push(Body::new(
        0,
        0,
        "central".to_string(),
        NVec3::zeros(),
        NVec3::zeros(),
        1.0e24,
        20.0,
        0,
    ));

    for i in 1..n {
        let i_f = i as f64;
        let x = NVec3::new(
            (i_f * 0.37).sin() * 400.0,
            (i_f * 0.13).cos() * 400.0,
            (i_f * 0.07).sin() * 400.0,
        );

        bodies.push(Body::new(
            i as u64,
            i,
            format!("body-{i}"),
            x,
            NVec3::zeros(),
            1.0e19,
            2.0,
            1,
        ));
    }

    System::new(bodies)
}

fn make_params() -> Parameters {
    Parameters {
        g: 6.674e-11,
        dt_scale: 1.0,
        universe_size: 500.0,
        gravity_range: 5000.0,
        cor: 0.25,
        wall_cor: 0.9,
        wrap_loss: 0.75,
        chaos: 0.25,
        v_min: 0.0,
        v_max: 1.0,
        seed: 42,
    }
}

fn make_engine() -> Engine {
    Engine {
        layout: LayoutConfig::CircularShells,
        boundary: BoundaryConfig::Bounce,
        orbit: OrbitConfig::Perfect,
        escape: false,
    }
}

/// One naive all-pairs resolution pass, for comparison against the grid.
fn direct_pass(sys: &mut System, engine: &Engine, params: &Parameters, dt_scaled: f64) {
    let n = sys.bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            resolve_pair(&mut sys.bodies, i, j, engine, params, dt_scaled);
        }
    }
}

pub fn bench_resolver() {
    // Different system sizes to test
    let ns = [50, 100, 200, 400, 800, 1600];
    let params = make_params();
    let engine = make_engine();
    let dt = 1.0 / 60.0;

    for n in ns {
        let mut sys_direct = make_system(n);
        let mut sys_grid = make_system(n);
        let mut grid = SpatialGrid::new(params.universe_size);

        // Warm up
        direct_pass(&mut sys_direct, &engine, &params, dt);
        advance(&mut sys_grid, &mut grid, &engine, &params, dt, &mut NullRender);

        // Time direct
        let t0 = Instant::now();
        direct_pass(&mut sys_direct, &engine, &params, dt);
        let dt_direct = t0.elapsed().as_secs_f64();

        // Time grid-accelerated tick
        let t1 = Instant::now();
        advance(&mut sys_grid, &mut grid, &engine, &params, dt, &mut NullRender);
        let dt_grid = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {dt_direct:8.6} s, grid = {dt_grid:8.6} s");
    }
}

/// Benchmark the full tick for a range of n
/// Paste output directly into a spreadsheet to graph
pub fn bench_tick_curve() {
    println!("N,direct_ms,grid_ms");

    let params = make_params();
    let engine = make_engine();
    let dt = 1.0 / 60.0;

    for n in (50..=1600).step_by(50) {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 400 { 5 } else { 1 };

        let mut sys_direct = make_system(n);
        let t0 = Instant::now();
        for _ in 0..steps {
            direct_pass(&mut sys_direct, &engine, &params, dt);
        }
        let ms_direct = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        let mut sys_grid = make_system(n);
        let mut grid = SpatialGrid::new(params.universe_size);
        let t1 = Instant::now();
        for _ in 0..steps {
            advance(&mut sys_grid, &mut grid, &engine, &params, dt, &mut NullRender);
        }
        let ms_grid = t1.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{n},{ms_direct:.6},{ms_grid:.6}");
    }
}
