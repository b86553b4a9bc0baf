//! Force contributors for the particle engine
//!
//! Defines the force-term trait, the set that sums the active terms, and the
//! species force (like species repel, unlike species attract, inverse-square,
//! hard cutoff below `min_distance`)

use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, Particle};

/// Collection of force terms
/// Each term implements [`ForceTerm`] and their contributions are summed
/// into a single force vector per particle
pub struct ForceSet {
    terms: Vec<Box<dyn ForceTerm + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add a force term
    pub fn with(mut self, term: impl ForceTerm + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Species force built from `params`, the default set used by a simulation
    pub fn from_params(params: &Parameters) -> Self {
        Self::new().with(SpeciesForce::from_params(params))
    }

    /// Net force on particle `i` from every term
    pub fn force_on(&self, i: usize, particles: &[Particle]) -> NVec3 {
        self.terms
            .iter()
            .fold(NVec3::zeros(), |acc, term| acc + term.force_on(i, particles))
    }

    /// Compute total forces for all particles in `particles`
    /// - `out[i]` is set to the sum of contributions from all terms
    /// - `particles` is only read, so every force comes from the same snapshot
    pub fn accumulate_forces(&self, particles: &[Particle], out: &mut [NVec3]) {
        // Zero buffer
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        for term in &self.terms {
            term.accumulate(particles, out);
        }
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for force sources operating on a particle snapshot
pub trait ForceTerm {
    /// Force on particle `i` from this term alone
    fn force_on(&self, i: usize, particles: &[Particle]) -> NVec3;

    /// Add this term's contribution into `out[i]` for every particle
    fn accumulate(&self, particles: &[Particle], out: &mut [NVec3]) {
        for (i, f) in out.iter_mut().enumerate().take(particles.len()) {
            *f += self.force_on(i, particles);
        }
    }
}

/// Pairwise species force
///
/// For particles i, j at distance d:
///   f_ij = normalize(x_i - x_j) * strength(s_i, s_j) / d^2
/// with strength = +repulsion for a like pair and -attraction otherwise.
/// Pairs with d < min_distance contribute nothing. There is no softening, so the
/// force is at its largest just outside the cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesForce {
    pub repulsion: f64,
    pub attraction: f64,
    pub min_distance: f64,
}

impl SpeciesForce {
    pub fn from_params(params: &Parameters) -> Self {
        Self {
            repulsion: params.repulsion_strength,
            attraction: params.attraction_strength,
            min_distance: params.min_distance,
        }
    }

    /// Force exerted on `a` by `b`, or `None` when the pair is inside the cutoff
    pub fn pair_force(&self, a: &Particle, b: &Particle) -> Option<NVec3> {
        let r = a.x - b.x;
        let d = r.norm();

        // a zero separation is skipped even with a non-positive cutoff
        if d < self.min_distance || d == 0.0 {
            return None;
        }

        let strength = a.species.strength_against(b.species, self.repulsion, self.attraction);
        Some((r / d) * (strength / (d * d)))
    }
}

impl ForceTerm for SpeciesForce {
    fn force_on(&self, i: usize, particles: &[Particle]) -> NVec3 {
        let Some(pi) = particles.get(i) else {
            return NVec3::zeros();
        };

        let mut f = NVec3::zeros();
        for (j, pj) in particles.iter().enumerate() {
            if j == i {
                continue;
            }
            if let Some(fij) = self.pair_force(pi, pj) {
                f += fij;
            }
        }
        f
    }

    fn accumulate(&self, particles: &[Particle], out: &mut [NVec3]) {
        let n = particles.len().min(out.len());

        // Each unordered pair (i, j) with i < j is evaluated once.
        // The pair term is antisymmetric: f_ji == -f_ij exactly.
        for i in 0..n {
            let pi = &particles[i];
            for j in (i + 1)..n {
                if let Some(fij) = self.pair_force(pi, &particles[j]) {
                    out[i] += fij;
                    out[j] -= fij;
                }
            }
        }
    }
}

/// Net force on particle `i` from all others under the species force in `params`
pub fn compute_force(i: usize, particles: &[Particle], params: &Parameters) -> NVec3 {
    SpeciesForce::from_params(params).force_on(i, particles)
}
