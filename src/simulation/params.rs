//! Physical and numerical parameters for the simulation
//!
//! `Parameters` holds the runtime constants used by the force pass and
//! the integrator:
//! - particle radius and the contact cutoff (`min_distance`)
//! - like-species repulsion and cross-species attraction strengths
//! - per-tick damping, the cube half-extent and the wall bounce damping
//! - the force scale, applied once force -> velocity and once velocity -> position

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub particle_radius: f64, // visual and contact radius
    pub repulsion_strength: f64, // same-species pair strength
    pub attraction_strength: f64, // cross-species pair strength
    pub drag_coefficient: f64, // velocity multiplier per tick
    pub min_distance: f64, // pairs closer than this are skipped
    pub bounds: f64, // half-extent of the cube
    pub force_scale: f64, // step scale
    pub bounce_damping: f64, // fraction of speed kept on a wall hit
    pub spawn_extent: f64, // initial placement, as a fraction of bounds
    pub guard_non_finite: bool, // reject NaN/Inf integration results
}

impl Default for Parameters {
    fn default() -> Self {
        let particle_radius = 1.0;
        Self {
            particle_radius,
            repulsion_strength: 50.0,
            attraction_strength: 30.0,
            drag_coefficient: 0.95,
            min_distance: 2.0 * particle_radius,
            bounds: 20.0,
            force_scale: 0.1,
            bounce_damping: 0.5,
            spawn_extent: 0.5,
            guard_non_finite: true,
        }
    }
}
