use std::time::Instant;

use crate::error::Result;
use crate::simulation::engine::Engine;
use crate::simulation::explore::{approximate, max_position_error};
use crate::simulation::integrator::Integrator;
use crate::simulation::params::Parameters;
use crate::simulation::scenario::Simulation;
use crate::simulation::states::{Mode, NVec2, Particle};
use crate::simulation::system::CollisionMode;

/// Helper to build a 1D row of `n` unit particles spread over a box of length `2n`
fn make_row(n: usize) -> Result<Vec<Particle>> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic velocities, no rand needed
            let vx = (i_f * 0.37).sin() * 5.0;
            Particle::new(i, 1.0, 1.0, 1.0, NVec2::new(2.0 * i_f, 0.0), NVec2::new(vx, 0.0))
        })
        .collect()
}

/// Time frames per second of the full integrate -> reflect -> collide loop
/// for a range of particle counts and every integrator
pub fn bench_frames() -> Result<()> {
    let ns = [10, 20, 40, 80, 160, 320];
    let frames = 500;

    for n in ns {
        for integrator in Integrator::ALL {
            let engine = Engine {
                mode: Mode::OneD,
                integrator,
                collision: CollisionMode::Elastic,
            };
            let parameters = Parameters {
                dt: 1e-3,
                max_t: Some(1.0e6),
                friction: 0.05,
                ..Parameters::default()
            };
            let bounds = NVec2::new(2.0 * n as f64, 1.0);
            let mut sim = Simulation::new(engine, parameters, bounds, make_row(n)?)?;

            // Warm up
            sim.frame()?;

            let t0 = Instant::now();
            for _ in 0..frames {
                sim.frame()?;
            }
            let per_frame = t0.elapsed().as_secs_f64() / frames as f64;

            println!(
                "N = {n:4}, {:>12}, frame = {:10.3e} s, collisions = {}",
                integrator.name(),
                per_frame,
                sim.collisions()
            );
        }
    }
    Ok(())
}

/// Final-time position error of a free projectile for halving step sizes
/// Paste output directly into a spreadsheet to graph
pub fn bench_convergence() -> Result<()> {
    let x0 = NVec2::new(0.0, 1000.0);
    let v0 = NVec2::new(10.0, 10.0);
    let a = NVec2::new(0.0, -9.8);
    let t_end = 10.0;

    let header: Vec<String> = Integrator::ALL
        .iter()
        .map(|m| format!("{} (order {})", m.name(), m.order()))
        .collect();
    println!("dt,{}", header.join(","));

    let mut dt = 0.2;
    for _ in 0..8 {
        let mut row = vec![format!("{dt}")];
        for integrator in Integrator::ALL {
            let samples = approximate(integrator, x0, v0, a, t_end, dt)?;
            row.push(format!("{:.6e}", max_position_error(&samples, x0, v0, a)));
        }
        println!("{}", row.join(","));
        dt *= 0.5;
    }
    Ok(())
}
