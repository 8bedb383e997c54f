//! High-level runtime engine settings
//!
//! Selects the initial layout generator, boundary response mode, orbit
//! synthesis mode, and escape culling used when building and running a
//! `Scenario`

use crate::configuration::config::{BoundaryConfig, LayoutConfig, OrbitConfig};

#[derive(Debug, Clone)]
pub struct Engine {
    pub layout: LayoutConfig, // square spiral or circular shells
    pub boundary: BoundaryConfig, // wrap or bounce, exactly one active
    pub orbit: OrbitConfig, // perfect-orbit or random speed synthesis
    pub escape: bool, // cull bodies beyond the gravitational range
}
