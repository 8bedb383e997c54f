//! Render lifecycle seam between the physics core and its display collaborator
//!
//! The physics layer forwards body deaths through these hooks; it never reads
//! rendering-only state back. Coupling is strictly one-directional so the core
//! can run headless for tests and batch runs.

use tracing::debug;

use crate::simulation::states::Body;

/// Lifecycle hooks invoked by the physics layer.
///
/// `draw` fires once when a body is flagged dead, for its final frame in that
/// state; `destroy` fires when the body is removed from the active set on the
/// following tick.
pub trait RenderHooks {
    fn draw(&mut self, body: &Body);
    fn destroy(&mut self, body: &Body);
}

/// No-op hooks for headless operation.
pub struct NullRender;

impl RenderHooks for NullRender {
    fn draw(&mut self, _body: &Body) {}
    fn destroy(&mut self, _body: &Body) {}
}

/// Hooks that log body deaths, used by the headless runner.
pub struct LogRender;

impl RenderHooks for LogRender {
    fn draw(&mut self, body: &Body) {
        if body.swallowed {
            debug!(name = %body.name, absorber = ?body.swallowed_by, "body swallowed");
        } else if body.escaped {
            debug!(name = %body.name, "body escaped");
        }
    }

    fn destroy(&mut self, body: &Body) {
        debug!(name = %body.name, "body removed");
    }
}
