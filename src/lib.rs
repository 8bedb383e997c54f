pub mod simulation;
pub mod configuration;
pub mod persistence;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Body, System, NVec3};
pub use simulation::engine::Engine;
pub use simulation::params::{Parameters, Population};
pub use simulation::grid::SpatialGrid;
pub use simulation::render::{LogRender, NullRender, RenderHooks};
pub use simulation::scenario::Scenario;
pub use simulation::stepper::advance;

pub use configuration::config::{
    BoundaryConfig, EngineConfig, LayoutConfig, OrbitConfig, ParametersConfig, PopulationConfig,
    ScenarioConfig,
};

pub use persistence::snapshot::{capture, load_from_path, restore, save_to_path, SaveState, SnapshotError};

pub use visualization::orbsim_vis3d::run_3d;

pub use benchmark::benchmark::{bench_resolver, bench_tick_curve};
