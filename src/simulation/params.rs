//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - gravitational constant and cutoff range (`g`, `gravity_range`),
//! - timestep scaling applied to the externally supplied dt,
//! - universe half-extent and boundary coefficients,
//! - collision restitution and orbit-synthesis tuning,
//! - deterministic random seed
//!
//! `Population` holds the body counts and the mass/radius ranges used by the
//! initial placement generators.

#[derive(Debug, Clone)]
pub struct Parameters {
    pub g: f64, // gravitational constant
    pub dt_scale: f64, // multiplier applied to the per-tick dt
    pub universe_size: f64, // half-extent of the cubic universe
    pub gravity_range: f64, // gravity cutoff / escape distance
    pub cor: f64, // body-body coefficient of restitution
    pub wall_cor: f64, // bounce-mode wall restitution
    pub wrap_loss: f64, // wrap-mode axis velocity loss factor
    pub chaos: f64, // orbit polar-angle perturbation (radians)
    pub v_min: f64, // random-orbit speed lower bound
    pub v_max: f64, // random-orbit speed upper bound
    pub seed: u64, // deterministic seed
}

/// Runtime copy of the population settings, kept so `reset`/`start_over`
/// can re-run placement without the original config file.
#[derive(Debug, Clone)]
pub struct Population {
    pub count: usize, // total bodies including the central one
    pub central_mass: f64, // mass of the dominant central body
    pub central_radius: f64, // radius of the central body
    pub mass_min: f64, // placed-body mass range, lower bound
    pub mass_max: f64, // placed-body mass range, upper bound
    pub radius_min: f64, // placed-body radius range, lower bound
    pub radius_max: f64, // placed-body radius range, upper bound
}
