use chargesim::{ScenarioConfig, Simulation};
use chargesim::run_3d;
use chargesim::{bench_force_pass, bench_advance};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run this many ticks without a window and print a summary
    #[arg(long)]
    headless: Option<u64>,

    /// Time the force pass and full ticks, then exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let scenario_cfg = ScenarioConfig::load(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn run_headless(mut simulation: Simulation, ticks: u64) {
    for _ in 0..ticks {
        simulation.advance();
    }

    let speeds: Vec<f64> = simulation.particles().iter().map(|p| p.v.norm()).collect();
    let max_speed = speeds.iter().cloned().fold(0.0, f64::max);
    let mean_speed = if speeds.is_empty() { 0.0 } else { speeds.iter().sum::<f64>() / speeds.len() as f64 };

    info!("headless: {} ticks, max speed {:.6}, mean speed {:.6}", simulation.tick_count(), max_speed, mean_speed);
    for view in simulation.snapshot() {
        println!(
            "{:3} {:?} [{:9.4} {:9.4} {:9.4}]",
            view.index, view.species, view.position.x, view.position.y, view.position.z
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        env_logger::init();
        bench_force_pass();
        bench_advance();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;

    match args.headless {
        Some(ticks) => {
            // the viewer installs its own logger through bevy
            env_logger::init();
            let simulation = Simulation::from_config(&scenario_cfg)?;
            run_headless(simulation, ticks);
        }
        None => {
            let simulation = Simulation::from_config(&scenario_cfg)?;
            run_3d(simulation);
        }
    }

    Ok(())
}
