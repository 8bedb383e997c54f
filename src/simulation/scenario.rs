//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`) and population settings
//! - system state (`System` with bodies placed at t = 0)
//! - the spatial grid reused across ticks
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! physics-step and visualization systems, or driven directly by the headless
//! runner.

use bevy::prelude::Resource;
use tracing::info;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::engine::Engine;
use crate::simulation::grid::SpatialGrid;
use crate::simulation::params::{Parameters, Population};
use crate::simulation::placement;
use crate::simulation::render::RenderHooks;
use crate::simulation::states::System;
use crate::simulation::stepper;

/// Bevy resource representing a fully-initialized simulation scenario
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// it contains the engine settings, parameters, population settings, current
/// system state, and the spatial grid.
#[derive(Resource)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub population: Population,
    pub system: System,
    pub grid: SpatialGrid,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Parameters (runtime) from ParametersConfig, defaults filled in
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            g: p_cfg.g,
            dt_scale: p_cfg.dt_scale,
            universe_size: p_cfg.universe_size,
            gravity_range: p_cfg.gravity_range,
            cor: p_cfg.cor.unwrap_or(0.25),
            wall_cor: p_cfg.wall_cor.unwrap_or(0.9),
            wrap_loss: p_cfg.wrap_loss.unwrap_or(0.75),
            chaos: p_cfg.chaos.unwrap_or(0.25),
            v_min: p_cfg.v_min.unwrap_or(0.0),
            v_max: p_cfg.v_max.unwrap_or(1.0),
            seed: p_cfg.seed,
        };

        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let engine = Engine {
            layout: e_cfg.layout,
            boundary: e_cfg.boundary,
            orbit: e_cfg.orbit,
            escape: e_cfg.escape.unwrap_or(true),
        };

        // Population (runtime) from PopulationConfig
        let pop_cfg = cfg.population;
        let population = Population {
            count: pop_cfg.count,
            central_mass: pop_cfg.central_mass,
            central_radius: pop_cfg.central_radius,
            mass_min: pop_cfg.mass_min,
            mass_max: pop_cfg.mass_max,
            radius_min: pop_cfg.radius_min,
            radius_max: pop_cfg.radius_max,
        };

        // Bodies: initial placement at t = 0
        let bodies = placement::populate(&engine, &parameters, &population);
        let system = System::new(bodies);

        let grid = SpatialGrid::new(parameters.universe_size);

        info!(
            bodies = system.bodies.len(),
            layout = ?engine.layout,
            boundary = ?engine.boundary,
            "scenario built"
        );

        Self {
            engine,
            parameters,
            population,
            system,
            grid,
        }
    }

    /// Advance the simulation by one tick with externally supplied `dt`.
    pub fn advance(&mut self, dt: f64, hooks: &mut dyn RenderHooks) {
        stepper::advance(
            &mut self.system,
            &mut self.grid,
            &self.engine,
            &self.parameters,
            dt,
            hooks,
        );
    }

    /// Reinitialize with a new population of `count` bodies (central body
    /// included). Counters and time restart; collaborators can detect the
    /// rebuild through `System::generation`.
    pub fn reset(&mut self, count: usize) {
        self.population.count = count;
        let generation = self.system.generation + 1;
        let bodies = placement::populate(&self.engine, &self.parameters, &self.population);
        self.system = System::new(bodies);
        self.system.generation = generation;
        info!(bodies = count, "scenario reset");
    }

    /// Reinitialize with the currently configured population count.
    pub fn start_over(&mut self) {
        self.reset(self.population.count);
    }
}
