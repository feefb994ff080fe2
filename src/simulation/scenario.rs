//! Build and drive fully-initialized simulations
//!
//! Takes a `ScenarioConfig` (YAML-facing) or explicit runtime pieces and
//! produces a `Simulation` containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - the physical rules (`System`)
//! - the particles at t = 0 and the box they live in
//!
//! A simulation is single-use: `frame()` runs integrate -> reflect -> resolve
//! collisions -> record until a termination condition is reached.

use log::{debug, info};
use rand::seq::index;
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

use crate::configuration::config::{RandomConfig, ScenarioConfig};
use crate::error::{Error, Result};
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Mode, NVec2, Particle};
use crate::simulation::system::System;
use crate::simulation::trajectory::Trajectory;

/// Relative slack on `max_t / dt` so rounding in the quotient never adds a frame
const FRAME_SLACK: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    MaxTime,         // elapsed time reached max_t
    EnergyExhausted, // total kinetic energy fell below ke_epsilon
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated(Termination),
}

/// One particle's rectangle for a renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RectView {
    pub id: usize,
    pub x: NVec2, // lower-left corner
    pub length: f64,
    pub width: f64,
}

/// Everything a renderer needs for one frame; the engine never depends on it being used
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub elapsed: f64,
    pub rects: Vec<RectView>,
    pub kinetic_energy: f64,
    pub momentum: NVec2,
}

#[derive(Debug)]
pub struct Simulation {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    bounds: NVec2, // (length, width)
    particles: Vec<Particle>, // index == id
    frames: u64,
    collisions: u64,
    wall_contacts: u64,
    status: Status,
    recorder: Option<Trajectory>,
}

impl Simulation {
    /// Assemble a simulation from runtime pieces.
    ///
    /// Errors:
    /// - `Error::InvalidParam` for invalid parameters, negative bounds, particle ids that
    ///   are not a permutation of `0..n`, or a particle larger than the box.
    pub fn new(engine: Engine, parameters: Parameters, bounds: NVec2, mut particles: Vec<Particle>) -> Result<Self> {
        parameters.validate()?;
        if !bounds.iter().all(|b| b.is_finite() && *b >= 0.0) {
            return Err(Error::InvalidParam("bounds must be finite and >= 0".into()));
        }

        particles.sort_by_key(|p| p.id);
        if particles.iter().enumerate().any(|(i, p)| p.id != i) {
            return Err(Error::InvalidParam("particle ids must be a permutation of 0..n".into()));
        }
        for p in &particles {
            for axis in 0..engine.mode.axes() {
                if p.extent(axis) > bounds[axis] {
                    return Err(Error::InvalidParam(format!(
                        "particle {} does not fit in the bounds along axis {axis}",
                        p.id
                    )));
                }
            }
        }

        let system = System::new(
            engine.mode,
            engine.collision,
            engine.integrator,
            parameters.friction,
            parameters.gravity,
        )?;

        let mut sim = Self {
            engine,
            parameters,
            system,
            bounds,
            particles,
            frames: 0,
            collisions: 0,
            wall_contacts: 0,
            status: Status::Running,
            recorder: None,
        };
        sim.status = sim.evaluate_status();

        info!(
            "simulation ready: {} particles, {:?}, {}, {:?}, dt = {}",
            sim.particles.len(),
            sim.engine.mode,
            sim.engine.integrator,
            sim.engine.collision,
            sim.parameters.dt
        );
        Ok(sim)
    }

    /// Build a simulation from a parsed scenario file
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            dt: p_cfg.dt,
            max_t: p_cfg.max_t,
            ke_epsilon: p_cfg.ke_epsilon,
            friction: p_cfg.friction,
            gravity: p_cfg.gravity,
            seed: p_cfg.seed,
        };

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            mode: cfg.engine.mode,
            integrator: cfg.engine.integrator,
            collision: cfg.engine.collision,
        };

        let bounds = NVec2::new(cfg.bounds.length, cfg.bounds.width);

        // Particles: explicit list if given, otherwise seeded random placement
        let particles = if !cfg.particles.is_empty() {
            cfg.particles
                .iter()
                .enumerate()
                .map(|(id, pc)| {
                    Particle::new(id, pc.length, pc.width, pc.mass, pc.position()?, pc.velocity()?)
                })
                .collect::<Result<Vec<_>>>()?
        } else if let Some(random) = &cfg.random {
            let mut rng: StdRng = match parameters.seed {
                Some(s) => SeedableRng::seed_from_u64(s),
                None => SeedableRng::seed_from_u64(rng().random()),
            };
            place_random(engine.mode, bounds, random, &mut rng)?
        } else {
            return Err(Error::InvalidParam(
                "scenario needs either `particles` or a `random` block".into(),
            ));
        };

        Self::new(engine, parameters, bounds, particles)
    }

    /// Start recording trajectories from the current state
    pub fn with_recorder(mut self) -> Self {
        self.recorder = Some(Trajectory::new(self.engine.mode, &self.particles));
        self
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> NVec2 {
        self.bounds
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of resolved pair collisions so far
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Number of wall reflections so far, counted per axis
    pub fn wall_contacts(&self) -> u64 {
        self.wall_contacts
    }

    /// Elapsed time, `frames * dt`
    pub fn elapsed(&self) -> f64 {
        self.frames as f64 * self.parameters.dt
    }

    pub fn kinetic_energy(&self) -> f64 {
        System::kinetic_energy(&self.particles)
    }

    pub fn momentum(&self) -> NVec2 {
        System::momentum(&self.particles)
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.recorder.as_ref()
    }

    pub fn frame_view(&self) -> FrameView {
        FrameView {
            elapsed: self.elapsed(),
            rects: self
                .particles
                .iter()
                .map(|p| RectView { id: p.id, x: p.x, length: p.length(), width: p.width() })
                .collect(),
            kinetic_energy: self.kinetic_energy(),
            momentum: self.momentum(),
        }
    }

    /// Advance by one frame: integrate all, reflect all, resolve all pairs in
    /// ascending `(i, j)` order, then re-check the termination conditions.
    pub fn frame(&mut self) -> Result<Status> {
        if let Status::Terminated(_) = self.status {
            return Err(Error::SimulationTerminated);
        }
        let dt = self.parameters.dt;

        for p in self.particles.iter_mut() {
            self.system.step(p, dt);
            if let Some(rec) = self.recorder.as_mut() {
                rec.record(p);
            }
        }

        for p in self.particles.iter_mut() {
            let contacts = self.system.wall(p, self.bounds);
            if contacts.is_empty() {
                continue;
            }
            self.wall_contacts += contacts.len() as u64;
            if let Some(rec) = self.recorder.as_mut() {
                rec.record(p);
            }
        }

        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.particles.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                if self.system.collide(a, b, self.bounds).is_none() {
                    continue;
                }
                self.collisions += 1;
                if let Some(rec) = self.recorder.as_mut() {
                    rec.record(a);
                    rec.record(b);
                }
            }
        }

        self.frames += 1;
        self.status = self.evaluate_status();
        if let Status::Terminated(reason) = self.status {
            info!(
                "simulation terminated ({:?}) at t = {:.4} after {} frames, {} collisions, {} wall contacts",
                reason,
                self.elapsed(),
                self.frames,
                self.collisions,
                self.wall_contacts
            );
        }
        Ok(self.status)
    }

    /// Run frames until a termination condition holds
    pub fn run(&mut self) -> Result<Termination> {
        loop {
            if let Status::Terminated(reason) = self.status {
                return Ok(reason);
            }
            self.frame()?;
        }
    }

    /// Number of frames after which `max_t` counts as reached, if a time limit is set
    pub fn max_frames(&self) -> Option<u64> {
        self.parameters
            .max_t
            .map(|max_t| (max_t / self.parameters.dt * (1.0 - FRAME_SLACK)).ceil().max(0.0) as u64)
    }

    fn evaluate_status(&self) -> Status {
        if let Some(limit) = self.max_frames() {
            if self.frames >= limit {
                return Status::Terminated(Termination::MaxTime);
            }
        }
        if let Some(eps) = self.parameters.ke_epsilon {
            if self.kinetic_energy() < eps {
                return Status::Terminated(Termination::EnergyExhausted);
            }
        }
        Status::Running
    }
}

/// Place `cfg.count` unit particles (mass, length and width 1) on distinct integer
/// slots along x, and along y in 2D, so no two start overlapping.
/// Velocities are nonzero integers in `[-max_v, max_v]`, or zero when `max_v < 1`.
pub fn place_random(mode: Mode, bounds: NVec2, cfg: &RandomConfig, rng: &mut StdRng) -> Result<Vec<Particle>> {
    // slot k holds a unit particle when k + 1 <= limit
    let slots = |limit: f64| if limit >= 1.0 { limit.floor() as usize } else { 0 };
    let (nx, ny) = match mode {
        Mode::OneD => (slots(bounds.x), cfg.count),
        Mode::TwoD => (slots(bounds.x), slots(bounds.y)),
    };
    if cfg.count > nx || cfg.count > ny {
        return Err(Error::InvalidParam(format!(
            "cannot place {} particles without overlap in bounds {}x{}",
            cfg.count, bounds.x, bounds.y
        )));
    }

    let xs = index::sample(rng, nx, cfg.count).into_vec();
    let ys = match mode {
        Mode::OneD => vec![0; cfg.count],
        Mode::TwoD => index::sample(rng, ny, cfg.count).into_vec(),
    };

    let mut particles = Vec::with_capacity(cfg.count);
    for (id, (&x, &y)) in xs.iter().zip(ys.iter()).enumerate() {
        let (x, y) = (x as f64, y as f64);
        let vx = random_speed(rng, cfg.max_vx);
        let vy = match mode {
            Mode::OneD => 0.0,
            Mode::TwoD => random_speed(rng, cfg.max_vy),
        };
        particles.push(Particle::new(id, 1.0, 1.0, 1.0, NVec2::new(x, y), NVec2::new(vx, vy))?);
    }
    debug!("placed {} particles at random", particles.len());
    Ok(particles)
}

fn random_speed(rng: &mut StdRng, max_v: f64) -> f64 {
    if !max_v.is_finite() || max_v < 1.0 {
        return 0.0;
    }
    let k = max_v.floor() as i64;
    let speed = rng.random_range(1..=k) as f64;
    if rng.random_bool(0.5) { speed } else { -speed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::integrator::Integrator;
    use crate::simulation::system::CollisionMode;

    fn engine_1d() -> Engine {
        Engine { mode: Mode::OneD, integrator: Integrator::EulerCromer, collision: CollisionMode::Elastic }
    }

    fn unit(id: usize, x: f64, vx: f64) -> Particle {
        Particle::new(id, 1.0, 1.0, 1.0, NVec2::new(x, 0.0), NVec2::new(vx, 0.0)).unwrap()
    }

    #[test]
    fn rejects_non_permutation_ids() {
        let ps = vec![unit(0, 1.0, 0.0), unit(2, 4.0, 0.0)];
        let err = Simulation::new(engine_1d(), Parameters::default(), NVec2::new(10.0, 0.0), ps).unwrap_err();
        assert!(err.to_string().contains("permutation"));
    }

    #[test]
    fn rejects_negative_bounds_and_oversized_particles() {
        let ps = vec![unit(0, 1.0, 0.0)];
        assert!(Simulation::new(engine_1d(), Parameters::default(), NVec2::new(-1.0, 0.0), ps.clone()).is_err());
        assert!(Simulation::new(engine_1d(), Parameters::default(), NVec2::new(0.5, 0.0), ps).is_err());
    }

    #[test]
    fn sorts_particles_by_id() {
        let ps = vec![unit(1, 5.0, 0.0), unit(0, 1.0, 0.0)];
        let sim = Simulation::new(engine_1d(), Parameters::default(), NVec2::new(10.0, 0.0), ps).unwrap();
        assert_eq!(sim.particles()[0].x.x, 1.0);
        assert_eq!(sim.particles()[1].id, 1);
    }

    #[test]
    fn frame_after_termination_fails() {
        let params = Parameters { dt: 0.1, max_t: Some(0.2), ..Parameters::default() };
        let mut sim = Simulation::new(engine_1d(), params, NVec2::new(10.0, 0.0), vec![unit(0, 1.0, 1.0)]).unwrap();
        assert_eq!(sim.run().unwrap(), Termination::MaxTime);
        assert_eq!(sim.frames(), 2);
        assert!(matches!(sim.frame(), Err(Error::SimulationTerminated)));
    }

    #[test]
    fn resting_system_terminates_on_energy_immediately() {
        let params = Parameters { max_t: None, ke_epsilon: Some(1e-9), ..Parameters::default() };
        let sim = Simulation::new(engine_1d(), params, NVec2::new(10.0, 0.0), vec![unit(0, 1.0, 0.0)]).unwrap();
        assert_eq!(sim.status(), Status::Terminated(Termination::EnergyExhausted));
    }

    #[test]
    fn random_placement_is_seeded_and_non_overlapping() {
        let cfg = RandomConfig { count: 5, max_vx: 3.0, max_vy: 2.0 };
        let bounds = NVec2::new(8.0, 6.0);
        let a = place_random(Mode::TwoD, bounds, &cfg, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = place_random(Mode::TwoD, bounds, &cfg, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.len(), 5);
        for (p, q) in a.iter().zip(b.iter()) {
            assert_eq!(p.x, q.x);
            assert_eq!(p.v, q.v);
            assert!(p.v.x != 0.0 && p.v.x.abs() <= 3.0);
            assert!(p.v.y != 0.0 && p.v.y.abs() <= 2.0);
            assert!(p.x.x + 1.0 <= bounds.x && p.x.y + 1.0 <= bounds.y);
        }
        for i in 0..a.len() {
            for j in (i + 1)..a.len() {
                assert_ne!(a[i].x.x, a[j].x.x);
            }
        }
    }

    #[test]
    fn random_placement_in_a_huge_box() {
        let cfg = RandomConfig { count: 3, max_vx: 2.0, max_vy: 0.0 };
        let ps = place_random(Mode::OneD, NVec2::new(1e15, 0.0), &cfg, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(ps.len(), 3);
        assert!(ps.iter().all(|p| p.x.x >= 0.0 && p.x.x + 1.0 <= 1e15 && p.x.y == 0.0));
        assert!(ps[0].x.x != ps[1].x.x && ps[1].x.x != ps[2].x.x && ps[0].x.x != ps[2].x.x);
    }

    #[test]
    fn time_limit_counts_frames() {
        let with = |dt: f64, max_t: f64| {
            let params = Parameters { dt, max_t: Some(max_t), ..Parameters::default() };
            Simulation::new(engine_1d(), params, NVec2::new(10.0, 0.0), vec![unit(0, 1.0, 0.0)])
                .unwrap()
                .max_frames()
        };
        assert_eq!(with(0.1, 0.3), Some(3));
        assert_eq!(with(0.1, 0.25), Some(3));
        assert_eq!(with(0.01, 3.0), Some(300));
        assert_eq!(with(0.1, 1e5), Some(1_000_000));
        assert_eq!(with(1e-3, 1e6), Some(1_000_000_000));
    }

    #[test]
    fn random_placement_rejects_overfull_box() {
        let cfg = RandomConfig { count: 4, max_vx: 1.0, max_vy: 0.0 };
        let err = place_random(Mode::OneD, NVec2::new(3.0, 0.0), &cfg, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(err.to_string().contains("cannot place"));
    }
}
