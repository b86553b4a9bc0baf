use std::time::Instant;

use crate::simulation::drag::Held;
use crate::simulation::forces::ForceSet;
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, Particle, ParticleSystem, Species};

/// Helper to build a manual system of size `n`
/// Deterministic positions, no rand needed, species alternate
fn make_system(n: usize, bounds: f64) -> ParticleSystem {
    let particles = (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 0.5 * bounds,
                (i_f * 0.13).cos() * 0.5 * bounds,
                (i_f * 0.07).sin() * 0.5 * bounds,
            );
            let species = if i % 2 == 0 { Species::A } else { Species::B };
            Particle::at_rest(x, species)
        })
        .collect();

    ParticleSystem::new(particles)
}

/// Time the snapshot force pass alone
pub fn bench_force_pass() {
    let ns = [20, 100, 200, 400, 800, 1600, 3200];
    let params = Parameters::default();
    let forces = ForceSet::from_params(&params);

    println!("N,force_pass_ms");
    for n in ns {
        let sys = make_system(n, params.bounds);
        let mut out = vec![NVec3::zeros(); n];

        // Warm up
        forces.accumulate_forces(&sys.particles, &mut out);

        let reps = if n <= 400 { 20 } else { 3 };
        let t0 = Instant::now();
        for _ in 0..reps {
            forces.accumulate_forces(&sys.particles, &mut out);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / reps as f64;

        println!("{},{:.6}", n, ms);
    }
}

/// Time full ticks, free and with one particle held
pub fn bench_advance() {
    let ns = [20, 100, 200, 400, 800, 1600, 3200];
    let steps = 10;
    let params = Parameters::default();
    let forces = ForceSet::from_params(&params);

    println!("N,free_ms,held_ms");
    for n in ns {
        let sys_template = make_system(n, params.bounds);
        let mut scratch = Vec::with_capacity(n);

        let mut sys_free = sys_template.clone();
        euler_step(&mut sys_free, &forces, &params, None, &mut scratch); // warm-up
        let t0 = Instant::now();
        for _ in 0..steps {
            euler_step(&mut sys_free, &forces, &params, None, &mut scratch);
        }
        let free_ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        let mut sys_held = sys_template.clone();
        let held = Some(Held {
            index: 0,
            position: NVec3::zeros(),
        });
        let t1 = Instant::now();
        for _ in 0..steps {
            euler_step(&mut sys_held, &forces, &params, held, &mut scratch);
        }
        let held_ms = t1.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6},{:.6}", n, free_ms, held_ms);
    }
}
