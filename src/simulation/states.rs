//! Core state types for the two-species particle simulation.
//!
//! - `Species` is the closed A/B tag that decides attraction vs repulsion
//! - `Particle` is one point mass (position, velocity, species)
//! - `ParticleSystem` holds the index-stable particle list and the tick count
//!
//! A particle's index in `ParticleSystem::particles` is its identity and the
//! handle the pointer collaborator uses for drag events, so the list is never
//! reordered, grown or shrunk during a run.

use nalgebra::Vector3;
use serde::Deserialize;

pub type NVec3 = Vector3<f64>;

/// Two-valued particle tag.
/// Same species repel, opposite species attract
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    #[serde(rename = "a", alias = "red")]
    A,
    #[serde(rename = "b", alias = "blue")]
    B,
}

impl Species {
    /// Signed pair strength: `+repulsion` for a like pair, `-attraction` otherwise
    pub fn strength_against(self, other: Species, repulsion: f64, attraction: f64) -> f64 {
        match (self, other) {
            (Species::A, Species::A) | (Species::B, Species::B) => repulsion,
            (Species::A, Species::B) | (Species::B, Species::A) => -attraction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub species: Species,
}

impl Particle {
    /// Particle at rest at `x`
    pub fn at_rest(x: NVec3, species: Species) -> Self {
        Self {
            x,
            v: NVec3::zeros(),
            species,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>, // index-stable collection
    pub ticks: u64, // completed ticks
}

impl ParticleSystem {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self {
            particles,
            ticks: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Read-only per-particle view handed to the rendering side after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub index: usize,
    pub position: NVec3,
    pub species: Species,
}
