use kinesim::simulation::explore::{approximate, exact, max_position_error};
use kinesim::{bench_convergence, bench_frames, load_scenario, Integrator, NVec2, ScenarioConfig, Simulation, GRAVITY};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kinesim", about = "Explore integrators on colliding particles with friction")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario file and optionally export the trajectory
    Run {
        /// Scenario path, or a file name inside scenarios/
        #[arg(default_value = "two_particles.yaml")]
        file_name: String,
        /// Override the time step
        #[arg(long)]
        dt: Option<f64>,
        /// Override the maximum run time
        #[arg(long)]
        time: Option<f64>,
        /// Override the kinetic friction coefficient
        #[arg(long)]
        friction: Option<f64>,
        /// Override the integrator: euler-cromer, midpoint or verlet
        #[arg(long)]
        method: Option<String>,
        /// Write the trajectory CSV here
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare an integrator against the exact projectile trajectory
    Explore {
        #[arg(long, default_value = "euler-cromer")]
        method: String,
        #[arg(long, default_value_t = 10.0)]
        vx: f64,
        #[arg(long, default_value_t = 10.0)]
        vy: f64,
        #[arg(long, default_value_t = 1.0)]
        dt: f64,
        #[arg(long, default_value_t = 10.0)]
        time: f64,
    },
    /// Frame throughput and convergence benchmarks
    Bench,
}

// resolve here to keep main clean
fn scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

fn run(
    file_name: &str,
    dt: Option<f64>,
    time: Option<f64>,
    friction: Option<f64>,
    method: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let path = scenario_path(file_name);
    let mut cfg: ScenarioConfig =
        load_scenario(&path).with_context(|| format!("failed to load scenario {}", path.display()))?;

    // command line wins over the file
    if let Some(dt) = dt {
        cfg.parameters.dt = dt;
    }
    if let Some(t) = time {
        cfg.parameters.max_t = Some(t);
    }
    if let Some(mu) = friction {
        cfg.parameters.friction = mu;
    }
    if let Some(m) = method {
        cfg.engine.integrator = m.parse::<Integrator>()?;
    }
    let output = output.or_else(|| cfg.output.clone());

    let mut sim = Simulation::build_scenario(cfg)?;
    if output.is_some() {
        sim = sim.with_recorder();
    }

    println!(
        "{} particles, {:?}, {}, {:?} collisions, friction deceleration {:.4}",
        sim.particles().len(),
        sim.system.mode(),
        sim.system.integrator(),
        sim.system.collision_mode(),
        sim.system.deceleration()
    );

    let e0 = sim.kinetic_energy();
    let p0 = sim.momentum();
    let reason = sim.run()?;

    println!("terminated: {:?} at t = {:.4} ({} frames)", reason, sim.elapsed(), sim.frames());
    println!("collisions: {}, wall contacts: {}", sim.collisions(), sim.wall_contacts());
    println!("kinetic energy: {:.6} -> {:.6}", e0, sim.kinetic_energy());
    let p1 = sim.momentum();
    println!("momentum: ({:.6}, {:.6}) -> ({:.6}, {:.6})", p0.x, p0.y, p1.x, p1.y);
    for p in sim.particles() {
        println!("  particle {}: x = ({:.4}, {:.4}), v = ({:.4}, {:.4})", p.id, p.x.x, p.x.y, p.v.x, p.v.y);
    }

    if let (Some(path), Some(traj)) = (output, sim.trajectory()) {
        traj.table()
            .save(&path)
            .with_context(|| format!("failed to write trajectory {}", path.display()))?;
        info!("trajectory written to {}", path.display());
    }
    Ok(())
}

fn explore(method: &str, vx: f64, vy: f64, dt: f64, time: f64) -> Result<()> {
    let method: Integrator = method.parse()?;
    let x0 = NVec2::new(0.0, 1000.0);
    let v0 = NVec2::new(vx, vy);
    let a = NVec2::new(0.0, -GRAVITY);

    let samples = approximate(method, x0, v0, a, time, dt)?;
    println!("t,x,y,x_exact,y_exact");
    for s in &samples {
        let e = exact(x0, v0, a, s.t);
        println!("{:.4},{:.6},{:.6},{:.6},{:.6}", s.t, s.x.x, s.x.y, e.x.x, e.x.y);
    }
    println!("{method}: max position error = {:.6e}", max_position_error(&samples, x0, v0, a));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Run { file_name, dt, time, friction, method, output } => {
            run(&file_name, dt, time, friction, method, output)
        }
        Command::Explore { method, vx, vy, dt, time } => explore(&method, vx, vy, dt, time),
        Command::Bench => {
            bench_frames()?;
            bench_convergence()?;
            Ok(())
        }
    }
}
