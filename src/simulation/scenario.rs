//! Build a fully-initialized simulation from configuration
//!
//! `Simulation` is the runtime bundle:
//! - engine settings and the frame-to-tick stepper (`Engine`, `Stepper`)
//! - physical parameters (`Parameters`)
//! - particle state (`ParticleSystem`)
//! - active force set (`ForceSet`)
//! - the pointer drag handoff (`DragHandle`)
//!
//! It is inserted into bevy as a `Resource` by the viewer, and driven
//! directly by headless runs and tests.

use bevy::prelude::Resource;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{ConfigError, ScenarioConfig, SpeciesSplit};
use crate::simulation::drag::{DragHandle, Held};
use crate::simulation::engine::{Engine, Stepper};
use crate::simulation::forces::ForceSet;
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, Particle, ParticleSystem, ParticleView, Species};

#[derive(Resource)]
pub struct Simulation {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: ParticleSystem,
    pub forces: ForceSet,
    stepper: Stepper,
    drag: DragHandle,
    held: Option<usize>, // held index latched by the last tick
    force_buf: Vec<NVec3>,
}

impl Simulation {
    /// Simulation over explicit particles with the species force from `parameters`
    pub fn new(parameters: Parameters, engine: Engine, particles: Vec<Particle>) -> Self {
        let n = particles.len();
        let forces = ForceSet::from_params(&parameters);

        Self {
            engine,
            parameters,
            system: ParticleSystem::new(particles),
            forces,
            stepper: Stepper::default(),
            drag: DragHandle::new(n),
            held: None,
            force_buf: Vec::with_capacity(n),
        }
    }

    /// `count` particles at rest, placed uniformly at random inside
    /// `±bounds * spawn_extent`, species by `split`
    pub fn random(parameters: Parameters, engine: Engine, count: usize, split: SpeciesSplit) -> Self {
        let species: Vec<Species> = (0..count).map(|i| split.species_for(i, count)).collect();
        let particles = random_particles(&parameters, engine.seed, &species);
        info!(
            "simulation: {} particles ({:?} split), seed {:?}",
            count, split, engine.seed
        );
        Self::new(parameters, engine, particles)
    }

    pub fn from_config(cfg: &ScenarioConfig) -> Result<Self, ConfigError> {
        let parameters = cfg.parameters()?;
        let engine = cfg.engine()?;

        match cfg.explicit_particles()? {
            Some(particles) => {
                info!("simulation: {} particles from scenario file", particles.len());
                Ok(Self::new(parameters, engine, particles))
            }
            None => Ok(Self::random(
                parameters,
                engine,
                cfg.parameters.particle_count,
                cfg.species_split,
            )),
        }
    }

    /// Run one tick: latch the drag slot, then step
    pub fn advance(&mut self) {
        let held: Option<Held> = self.drag.latch();
        self.held = held.map(|h| h.index);
        euler_step(&mut self.system, &self.forces, &self.parameters, held, &mut self.force_buf);
    }

    /// Run as many ticks as the step mode allots to `elapsed` seconds.
    /// Returns the number of ticks run
    pub fn advance_for(&mut self, elapsed: f64) -> u32 {
        let ticks = self.stepper.ticks_for(&self.engine, elapsed);
        for _ in 0..ticks {
            self.advance();
        }
        ticks
    }

    pub fn begin_drag(&self, index: usize, initial: NVec3) {
        self.drag.begin_drag(index, initial);
    }

    pub fn update_drag(&self, position: NVec3) {
        self.drag.update_drag(position);
    }

    pub fn end_drag(&self) {
        self.drag.end_drag();
    }

    /// Handle for feeding drag events from another thread
    pub fn drag_handle(&self) -> DragHandle {
        self.drag.clone()
    }

    /// Held index as of the last tick
    pub fn held_index(&self) -> Option<usize> {
        self.held
    }

    pub fn particles(&self) -> &[Particle] {
        &self.system.particles
    }

    pub fn tick_count(&self) -> u64 {
        self.system.ticks
    }

    /// Ordered `(index, position, species)` view for rendering
    pub fn snapshot(&self) -> Vec<ParticleView> {
        self.system
            .particles
            .iter()
            .enumerate()
            .map(|(index, p)| ParticleView {
                index,
                position: p.x,
                species: p.species,
            })
            .collect()
    }

    /// Fresh random placement with the same count and parameters.
    /// Every index keeps its species. Any drag in progress is released
    pub fn reset(&mut self, seed: Option<u64>) {
        let count = self.system.len();
        self.engine.seed = seed;
        let species: Vec<Species> = self.system.particles.iter().map(|p| p.species).collect();
        self.system = ParticleSystem::new(random_particles(&self.parameters, seed, &species));
        self.stepper.reset();
        self.drag.end_drag();
        self.held = None;
        info!("simulation reset: {} particles, seed {:?}", count, seed);
    }
}

/// One particle at rest per entry of `species`, at a random spot in the spawn cube
fn random_particles(params: &Parameters, seed: Option<u64>, species: &[Species]) -> Vec<Particle> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let half = params.bounds * params.spawn_extent;

    species
        .iter()
        .map(|&s| {
            let mut coord = || if half > 0.0 { rng.gen_range(-half..half) } else { 0.0 };
            let x = NVec3::new(coord(), coord(), coord());
            Particle::at_rest(x, s)
        })
        .collect()
}
