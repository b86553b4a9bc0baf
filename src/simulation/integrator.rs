//! Fixed-step integrator for the particle system
//!
//! One tick is a damped explicit Euler step driven by a `ForceSet` and
//! `Parameters`, followed by per-axis wall reflection. A held particle is
//! placed at its drag position instead of being integrated.

use log::warn;

use super::drag::Held;
use super::forces::ForceSet;
use super::params::Parameters;
use super::states::{NVec3, Particle, ParticleSystem};

/// Advance the system by one tick.
///
/// - forces for every particle come from positions at the start of the tick
/// - free particles: v += F * scale, v *= drag, x += v * scale, then walls
/// - the held particle (if any) is set to its drag position with zero velocity
///
/// `scratch` is the force buffer, resized to the particle count when needed
/// so it can be reused from tick to tick.
pub fn euler_step(
    sys: &mut ParticleSystem,
    forces: &ForceSet,
    params: &Parameters,
    held: Option<Held>,
    scratch: &mut Vec<NVec3>,
) {
    let n = sys.particles.len();
    if n == 0 { // no particles, return
        return;
    }

    // F_n from x_n, before anything moves
    scratch.resize(n, NVec3::zeros());
    forces.accumulate_forces(&sys.particles, scratch);

    let held = held.filter(|h| h.index < n);

    for (i, (p, f)) in sys.particles.iter_mut().zip(scratch.iter()).enumerate() {
        if let Some(h) = held.filter(|h| h.index == i) {
            // Kinematic: follow the pointer, no momentum
            p.x = h.position;
            p.v = NVec3::zeros();
            continue;
        }

        let x_old = p.x;

        // Kick, damp, drift
        p.v += *f * params.force_scale;
        p.v *= params.drag_coefficient;
        p.x += p.v * params.force_scale;

        reflect_at_bounds(p, params.bounds, params.bounce_damping);

        if params.guard_non_finite && !is_finite_particle(p) {
            warn!("particle {i} left the finite range; keeping position, zeroing velocity");
            p.x = x_old;
            p.v = NVec3::zeros();
        }
    }

    sys.ticks += 1;
}

/// Inelastic wall on each axis of the cube `[-bounds, bounds]^3`.
/// An axis beyond the wall is clamped to it and that velocity component is
/// reversed and scaled by `bounce_damping`.
pub fn reflect_at_bounds(p: &mut Particle, bounds: f64, bounce_damping: f64) {
    for axis in 0..3 {
        let x = p.x[axis];
        if x.abs() > bounds {
            p.x[axis] = bounds.copysign(x);
            p.v[axis] *= -bounce_damping;
        }
    }
}

fn is_finite_particle(p: &Particle) -> bool {
    p.x.iter().chain(p.v.iter()).all(|c| c.is_finite())
}
