//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – stepping mode, substep cap and random seed
//! - [`ParametersConfig`] – physical constants of the force law and the box
//! - [`SpeciesSplit`]     – how species are assigned to random particles
//! - [`ParticleConfig`]   – optional explicit initial state for each particle
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every field has a default, so an empty document is the stock 20-particle
//! scene.
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   step_mode: "per_frame"   # or "fixed_rate"
//!   hz: 60.0                 # ticks per second in fixed_rate mode
//!   max_substeps: 8
//!   seed: 42
//!
//! parameters:
//!   particle_count: 20
//!   particle_radius: 1.0
//!   repulsion_strength: 50.0
//!   attraction_strength: 30.0
//!   drag_coefficient: 0.95
//!   min_distance: 2.0        # defaults to 2 * particle_radius
//!   bounds: 20.0
//!   force_scale: 0.1
//!
//! species_split: halves      # or alternating, or { count: 5 }
//!
//! # Optional: replaces random placement, count and split
//! particles:
//!   - x: [ 0.0, 0.0, 0.0 ]
//!     v: [ 0.0, 0.0, 0.0 ]
//!     species: a
//!   - x: [ 5.0, 0.0, 0.0 ]
//!     species: b
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::engine::{Engine, StepMode};
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, Particle, Species};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("particle {index}: `{field}` must have 3 components, got {len}")]
    VectorLength {
        index: usize,
        field: &'static str,
        len: usize,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tick cadence as written in YAML
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub enum StepModeConfig {
    #[serde(rename = "per_frame")] // one tick per rendered frame
    #[default]
    PerFrame,

    #[serde(rename = "fixed_rate")] // ticks derived from elapsed time and `hz`
    FixedRate,
}

/// Engine-level configuration
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub step_mode: StepModeConfig,
    pub hz: f64, // ticks per second in fixed_rate mode
    pub max_substeps: u32, // tick cap per frame
    pub seed: Option<u64>, // reproducible placement when set
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_mode: StepModeConfig::PerFrame,
            hz: 60.0,
            max_substeps: 8,
            seed: None,
        }
    }
}

/// Physical constants
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub particle_count: usize,
    pub particle_radius: f64,
    pub repulsion_strength: f64,
    pub attraction_strength: f64,
    pub drag_coefficient: f64,
    pub min_distance: Option<f64>, // `None` -> 2 * particle_radius
    pub bounds: f64,
    pub force_scale: f64,
    pub bounce_damping: f64,
    pub spawn_extent: f64,
    pub guard_non_finite: bool,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        let p = Parameters::default();
        Self {
            particle_count: 20,
            particle_radius: p.particle_radius,
            repulsion_strength: p.repulsion_strength,
            attraction_strength: p.attraction_strength,
            drag_coefficient: p.drag_coefficient,
            min_distance: None,
            bounds: p.bounds,
            force_scale: p.force_scale,
            bounce_damping: p.bounce_damping,
            spawn_extent: p.spawn_extent,
            guard_non_finite: p.guard_non_finite,
        }
    }
}

/// Species assignment by index for randomly placed particles
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesSplit {
    /// First `n / 2` are A, the rest B
    #[default]
    Halves,
    /// First `count` are A, the rest B
    Count(usize),
    /// Even indices A, odd indices B
    Alternating,
}

impl SpeciesSplit {
    /// Species of particle `index` out of `count`
    pub fn species_for(self, index: usize, count: usize) -> Species {
        let a = match self {
            SpeciesSplit::Halves => index < count / 2,
            SpeciesSplit::Count(k) => index < k.min(count),
            SpeciesSplit::Alternating => index % 2 == 0,
        };
        if a { Species::A } else { Species::B }
    }
}

/// Initial state of one particle
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub x: Vec<f64>, // position
    #[serde(default)]
    pub v: Option<Vec<f64>>, // velocity, zero when absent
    pub species: Species,
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    #[serde(with = "serde_yaml::with::singleton_map")] // accepts `{ count: 5 }` as well as `halves`
    pub species_split: SpeciesSplit,
    pub particles: Option<Vec<ParticleConfig>>, // explicit state, overrides count and split
}

impl ScenarioConfig {
    /// Parse a scenario from a YAML string
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parse a scenario from any reader
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Load a scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Validated runtime parameters
    pub fn parameters(&self) -> Result<Parameters> {
        let p = &self.parameters;

        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter(format!("{name} must be positive, got {v}")))
            }
        };
        let non_negative = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter(format!("{name} must be non-negative, got {v}")))
            }
        };

        positive("particle_radius", p.particle_radius)?;
        positive("bounds", p.bounds)?;
        positive("force_scale", p.force_scale)?;
        non_negative("repulsion_strength", p.repulsion_strength)?;
        non_negative("attraction_strength", p.attraction_strength)?;
        non_negative("bounce_damping", p.bounce_damping)?;
        non_negative("spawn_extent", p.spawn_extent)?;
        if p.spawn_extent > 1.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "spawn_extent must be at most 1, got {}",
                p.spawn_extent
            )));
        }
        if !(0.0..=1.0).contains(&p.drag_coefficient) {
            return Err(ConfigError::InvalidParameter(format!(
                "drag_coefficient must be within [0, 1], got {}",
                p.drag_coefficient
            )));
        }

        let min_distance = p.min_distance.unwrap_or(2.0 * p.particle_radius);
        non_negative("min_distance", min_distance)?;

        Ok(Parameters {
            particle_radius: p.particle_radius,
            repulsion_strength: p.repulsion_strength,
            attraction_strength: p.attraction_strength,
            drag_coefficient: p.drag_coefficient,
            min_distance,
            bounds: p.bounds,
            force_scale: p.force_scale,
            bounce_damping: p.bounce_damping,
            spawn_extent: p.spawn_extent,
            guard_non_finite: p.guard_non_finite,
        })
    }

    /// Validated engine settings
    pub fn engine(&self) -> Result<Engine> {
        let e = &self.engine;
        let step_mode = match e.step_mode {
            StepModeConfig::PerFrame => StepMode::PerFrame,
            StepModeConfig::FixedRate => {
                if !(e.hz.is_finite() && e.hz > 0.0) {
                    return Err(ConfigError::InvalidParameter(format!(
                        "hz must be positive in fixed_rate mode, got {}",
                        e.hz
                    )));
                }
                if e.max_substeps == 0 {
                    return Err(ConfigError::InvalidParameter(
                        "max_substeps must be at least 1 in fixed_rate mode".to_string(),
                    ));
                }
                StepMode::FixedRate { hz: e.hz }
            }
        };

        Ok(Engine {
            step_mode,
            max_substeps: e.max_substeps,
            seed: e.seed,
        })
    }

    /// Explicit initial particles, if the scenario lists them
    pub fn explicit_particles(&self) -> Result<Option<Vec<Particle>>> {
        let Some(list) = &self.particles else {
            return Ok(None);
        };

        let particles = list
            .iter()
            .enumerate()
            .map(|(index, pc)| {
                let x = to_vec3(index, "x", &pc.x)?;
                let v = match &pc.v {
                    Some(v) => to_vec3(index, "v", v)?,
                    None => NVec3::zeros(),
                };
                Ok(Particle {
                    x,
                    v,
                    species: pc.species,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(particles))
    }
}

fn to_vec3(index: usize, field: &'static str, c: &[f64]) -> Result<NVec3> {
    match c {
        [x, y, z] if c.iter().all(|v| v.is_finite()) => Ok(NVec3::new(*x, *y, *z)),
        [_, _, _] => Err(ConfigError::InvalidParameter(format!(
            "particle {index}: `{field}` must be finite, got {c:?}"
        ))),
        _ => Err(ConfigError::VectorLength {
            index,
            field,
            len: c.len(),
        }),
    }
}
