//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – mode switches (layout, boundary, orbit, escape)
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`PopulationConfig`] – how many bodies to place and their mass/radius ranges
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! engine:
//!   layout: "shells"        # or "spiral"
//!   boundary: "bounce"      # or "wrap"
//!   orbit: "perfect"        # or "random"
//!   escape: true            # cull bodies beyond the gravitational range
//!
//! parameters:
//!   G: 6.674e-11            # gravitational constant
//!   dt_scale: 100000.0      # multiplier applied to the externally supplied dt
//!   universe_size: 500.0    # half-extent of the cubic universe
//!   gravity_range: 2000.0   # max distance at which gravity applies
//!   cor: 0.25               # body-body coefficient of restitution
//!   wall_cor: 0.9           # bounce-mode wall restitution
//!   wrap_loss: 0.75         # wrap-mode velocity loss on the crossed axis
//!   chaos: 0.25             # polar-angle perturbation for orbit synthesis (rad)
//!   v_min: 5.0              # random-orbit speed range, lower bound
//!   v_max: 40.0             # random-orbit speed range, upper bound
//!   seed: 42                # deterministic seed
//!
//! population:
//!   count: 60               # total bodies including the central one
//!   central_mass: 1.0e24
//!   central_radius: 20.0
//!   mass_min: 1.0e18
//!   mass_max: 1.0e20
//!   radius_min: 1.0
//!   radius_max: 4.0
//! ```
//!
//! The engine then maps this configuration into its internal runtime scenario
//! representation, which may use different structs optimized for performance.

use serde::{Deserialize, Serialize};

/// Which initial layout generator the engine uses
/// layout: "spiral" or layout: "shells"
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutConfig {
    #[serde(rename = "spiral")] // outward square spiral on the z=0 plane
    SquareSpiral,

    #[serde(rename = "shells")] // concentric circular rings around the central body
    CircularShells,
}

/// How bodies respond at the universe boundary
/// boundary: "wrap" or boundary: "bounce"
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryConfig {
    #[serde(rename = "wrap")] // re-enter from the opposite face with velocity loss
    Wrap,

    #[serde(rename = "bounce")] // axis-aligned bounce off an implicit massive wall
    Bounce,
}

/// How initial orbital speed is chosen
/// orbit: "perfect" or orbit: "random"
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitConfig {
    #[serde(rename = "perfect")] // circular-orbit speed sqrt(G*M/d)
    Perfect,

    #[serde(rename = "random")] // uniform speed within [v_min, v_max]
    Random,
}

/// High-level engine configuration
/// Controls the structure of the simulation
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub layout: LayoutConfig, // initial placement generator
    pub boundary: BoundaryConfig, // boundary response mode, exactly one active
    pub orbit: OrbitConfig, // orbit-velocity synthesis mode
    pub escape: Option<bool>, // cull bodies beyond the gravitational range (default true)
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(rename = "G")]
    pub g: f64,                 // gravitational constant
    pub dt_scale: f64,          // multiplier applied to the per-tick dt
    pub universe_size: f64,     // half-extent of the cubic universe
    pub gravity_range: f64,     // gravity cutoff / escape distance
    pub cor: Option<f64>,       // body-body restitution (default 0.25)
    pub wall_cor: Option<f64>,  // bounce-mode wall restitution (default 0.9)
    pub wrap_loss: Option<f64>, // wrap-mode axis velocity loss (default 0.75)
    pub chaos: Option<f64>,     // orbit polar perturbation in radians (default 0.25)
    pub v_min: Option<f64>,     // random-orbit speed lower bound (default 0.0)
    pub v_max: Option<f64>,     // random-orbit speed upper bound (default 1.0)
    pub seed: u64,              // deterministic seed to make runs reproducable
}

/// Configuration for the body population placed at startup
#[derive(Deserialize, Debug, Clone)]
pub struct PopulationConfig {
    pub count: usize,        // total bodies including the central one
    pub central_mass: f64,   // mass of the dominant central body
    pub central_radius: f64, // radius of the central body
    pub mass_min: f64,       // placed-body mass range, lower bound
    pub mass_max: f64,       // placed-body mass range, upper bound
    pub radius_min: f64,     // placed-body radius range, lower bound
    pub radius_max: f64,     // placed-body radius range, upper bound
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig, // engine-level mode switches
    pub parameters: ParametersConfig, // global numerical and physical parameters
    pub population: PopulationConfig, // initial body population
}
