pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Species, Particle, ParticleSystem, ParticleView, NVec3};
pub use simulation::forces::{ForceTerm, ForceSet, SpeciesForce, compute_force};
pub use simulation::drag::{DragHandle, DragHandoff, Held};
pub use simulation::integrator::{euler_step, reflect_at_bounds};
pub use simulation::engine::{Engine, StepMode, Stepper};
pub use simulation::params::Parameters;
pub use simulation::scenario::Simulation;

pub use configuration::config::{ConfigError, EngineConfig, ParametersConfig, ParticleConfig, ScenarioConfig, SpeciesSplit, StepModeConfig};

pub use visualization::viewer::run_3d;

pub use benchmark::benchmark::{bench_force_pass, bench_advance};
