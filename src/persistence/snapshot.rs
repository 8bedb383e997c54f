//! Saved-state records for the simulation
//!
//! Persisted state is one flat record per body plus scalar scene settings
//! (universe size, layout/orbit/boundary modes, counters), serialized as YAML
//! like the scenario configuration. The physics core round-trips these
//! records exactly, modulo floating-point rounding.
//!
//! A corrupt or incomplete save is surfaced as an error and the live scenario
//! is left untouched: `restore` builds the complete new body set before
//! committing anything.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::configuration::config::{BoundaryConfig, LayoutConfig, OrbitConfig};
use crate::simulation::grid::SpatialGrid;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Body, NVec3, System};

/// Astronomical unit in meters; persisted radii are stored AU-scaled.
pub const AU: f64 = 1.495978707e11;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid save state: {0}")]
    Invalid(String),
}

/// One flat record per body.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BodyRecord {
    pub index: usize,
    pub name: String,
    pub radius: f64, // AU-scaled
    pub color: u32,
    pub mass: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

/// Top-level saved state: the body list alongside scalar scene settings.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SaveState {
    pub universe_size: f64,
    pub layout: LayoutConfig,
    pub orbit: OrbitConfig,
    pub boundary: BoundaryConfig,
    pub swallowed: u32,
    pub escaped: u32,
    pub bodies: Vec<BodyRecord>,
}

/// Capture the live bodies and scene settings into a save state.
pub fn capture(scenario: &Scenario) -> SaveState {
    let bodies = scenario
        .system
        .bodies
        .iter()
        .filter(|b| b.alive)
        .map(|b| BodyRecord {
            index: b.index,
            name: b.name.clone(),
            radius: b.radius / AU,
            color: b.color,
            mass: b.m,
            x: b.x.x,
            y: b.x.y,
            z: b.x.z,
            vx: b.v.x,
            vy: b.v.y,
            vz: b.v.z,
        })
        .collect();

    SaveState {
        universe_size: scenario.parameters.universe_size,
        layout: scenario.engine.layout,
        orbit: scenario.engine.orbit,
        boundary: scenario.engine.boundary,
        swallowed: scenario.system.swallowed_total,
        escaped: scenario.system.escaped_total,
        bodies,
    }
}

/// Replace the scenario's system and mode settings from a save state.
///
/// All-or-nothing: validation and body construction complete before any field
/// of the live scenario is touched, so a failed load leaves the simulation
/// unchanged.
pub fn restore(scenario: &mut Scenario, save: &SaveState) -> Result<(), SnapshotError> {
    if !save.universe_size.is_finite() || save.universe_size <= 0.0 {
        return Err(SnapshotError::Invalid("universe_size must be positive".to_string()));
    }
    let bodies = bodies_from_records(&save.bodies)?;

    let generation = scenario.system.generation + 1;
    let mut system = System::new(bodies);
    system.generation = generation;
    system.swallowed_total = save.swallowed;
    system.escaped_total = save.escaped;

    scenario.engine.layout = save.layout;
    scenario.engine.orbit = save.orbit;
    scenario.engine.boundary = save.boundary;
    scenario.parameters.universe_size = save.universe_size;
    scenario.grid = SpatialGrid::new(save.universe_size);
    scenario.system = system;
    Ok(())
}

fn bodies_from_records(records: &[BodyRecord]) -> Result<Vec<Body>, SnapshotError> {
    if records.is_empty() {
        return Err(SnapshotError::Invalid("no bodies in save state".to_string()));
    }
    if records[0].index != 0 {
        return Err(SnapshotError::Invalid(
            "first record must be the central body at index 0".to_string(),
        ));
    }

    let mut bodies = Vec::with_capacity(records.len());
    for (slot, rec) in records.iter().enumerate() {
        let values = [rec.mass, rec.radius, rec.x, rec.y, rec.z, rec.vx, rec.vy, rec.vz];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SnapshotError::Invalid(format!(
                "non-finite value in record for '{}'",
                rec.name
            )));
        }
        if rec.mass <= 0.0 || rec.radius <= 0.0 {
            return Err(SnapshotError::Invalid(format!(
                "non-positive mass or radius in record for '{}'",
                rec.name
            )));
        }
        bodies.push(Body::new(
            slot as u64,
            slot,
            rec.name.clone(),
            NVec3::new(rec.x, rec.y, rec.z),
            NVec3::new(rec.vx, rec.vy, rec.vz),
            rec.mass,
            rec.radius * AU,
            rec.color,
        ));
    }
    Ok(bodies)
}

/// Serialize the scenario's save state to a YAML file.
pub fn save_to_path(scenario: &Scenario, path: &Path) -> Result<(), SnapshotError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_yaml::to_writer(writer, &capture(scenario))?;
    info!(path = %path.display(), "state saved");
    Ok(())
}

/// Load a YAML save state and restore the scenario from it. The scenario is
/// unchanged when this returns an error.
pub fn load_from_path(scenario: &mut Scenario, path: &Path) -> Result<(), SnapshotError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let save: SaveState = serde_yaml::from_reader(reader)?;
    restore(scenario, &save)?;
    info!(path = %path.display(), bodies = scenario.system.bodies.len(), "state loaded");
    Ok(())
}
