//! Runtime stepping settings
//!
//! Selects how wall-clock time maps onto ticks. A tick is always the same
//! logical step; only the number of ticks per frame changes.

/// Tick cadence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepMode {
    /// One tick per frame, whatever the frame interval
    PerFrame,
    /// `hz` ticks per second of elapsed time
    FixedRate { hz: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub step_mode: StepMode,
    pub max_substeps: u32, // tick cap per frame in fixed-rate mode
    pub seed: Option<u64>, // initial placement seed, entropy when absent
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            step_mode: StepMode::PerFrame,
            max_substeps: 8,
            seed: None,
        }
    }
}

/// Turns elapsed time into a whole number of ticks
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    accumulator: f64, // seconds not yet spent on a tick
}

impl Stepper {
    /// Number of ticks to run for a frame that took `elapsed` seconds.
    /// Time beyond `max_substeps` ticks is dropped rather than carried over.
    pub fn ticks_for(&mut self, engine: &Engine, elapsed: f64) -> u32 {
        match engine.step_mode {
            StepMode::PerFrame => 1,
            StepMode::FixedRate { hz } => {
                if !(hz > 0.0) || !elapsed.is_finite() || elapsed <= 0.0 {
                    return 0;
                }
                let dt = 1.0 / hz;
                self.accumulator += elapsed;

                let due = (self.accumulator / dt).floor();
                let ticks = due.min(engine.max_substeps as f64) as u32;
                if due > engine.max_substeps as f64 {
                    self.accumulator = 0.0;
                } else {
                    self.accumulator -= ticks as f64 * dt;
                }
                ticks
            }
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
