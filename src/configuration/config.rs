//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – mode (1D/2D), integrator and collision mode
//! - [`ParametersConfig`] – time step, termination rules and friction
//! - [`BoundsConfig`]     – size of the box the particles live in
//! - [`ParticleConfig`]   – explicit initial state for each particle, or
//! - [`RandomConfig`]     – parameters for seeded random placement
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example 1D scenario YAML matching these types:
//!
//! ```yaml
//! engine:
//!   mode: "1D"                  # "1D" or "2D"
//!   integrator: "euler-cromer"  # or "midpoint", "verlet"
//!   collision: "elastic"        # or "inelastic"
//!
//! parameters:
//!   dt: 0.01                    # fixed step size
//!   max_t: 30.0                 # total simulation time
//!   ke_epsilon: 1.0e-6          # optional: halt when kinetic energy drops below
//!   friction: 0.0               # kinetic friction coefficient
//!   seed: 42                    # optional: seed for random placement
//!
//! bounds:
//!   length: 15.0
//!   width: 10.0
//!
//! particles:
//!   - { length: 1.0, width: 1.0, mass: 1.0, x: [2.0], v: [3.0] }
//!   - { length: 1.0, width: 1.0, mass: 1.0, x: [12.0], v: [-3.0] }
//! ```
//!
//! Leaving `particles` out and giving a `random:` block instead places
//! `count` unit particles at random. Unknown mode, integrator or collision
//! names fail while the file is parsed.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::simulation::integrator::Integrator;
use crate::simulation::params::GRAVITY;
use crate::simulation::states::{Mode, NVec2};
use crate::simulation::system::CollisionMode;

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub mode: Mode, // "1D" or "2D"
    pub integrator: Integrator, // time integrator used for advancing particles
    #[serde(default = "default_collision")]
    pub collision: CollisionMode, // momentum exchange rule between particles
}

fn default_collision() -> CollisionMode {
    CollisionMode::Elastic
}

fn default_gravity() -> f64 {
    GRAVITY
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt: f64, // time step size
    #[serde(default)]
    pub max_t: Option<f64>, // time end
    #[serde(default)]
    pub ke_epsilon: Option<f64>, // kinetic energy floor
    #[serde(default)]
    pub friction: f64, // kinetic friction coefficient
    #[serde(default = "default_gravity")]
    pub gravity: f64, // gravitational acceleration
    #[serde(default)]
    pub seed: Option<u64>, // deterministic seed to make random placement reproducible
}

/// Box the particles are confined to, `[0, length] x [0, width]`
#[derive(Deserialize, Debug, Clone)]
pub struct BoundsConfig {
    pub length: f64,
    #[serde(default)]
    pub width: f64, // unused in 1D
}

/// Configuration for a single particle's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub length: f64, // extent along x
    pub width: f64, // extent along y
    pub mass: f64,
    pub x: Vec<f64>, // initial lower-left corner, [x] or [x, y]
    pub v: Vec<f64>, // initial velocity, [vx] or [vx, vy]
}

impl ParticleConfig {
    pub fn position(&self) -> Result<NVec2> {
        to_vec2(&self.x, "x")
    }

    pub fn velocity(&self) -> Result<NVec2> {
        to_vec2(&self.v, "v")
    }
}

/// Random placement: `count` unit particles on distinct integer slots
#[derive(Deserialize, Debug, Clone)]
pub struct RandomConfig {
    pub count: usize,
    pub max_vx: f64, // speeds drawn from the nonzero integers in [-max_vx, max_vx]
    #[serde(default)]
    pub max_vy: f64,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bounds: BoundsConfig,
    #[serde(default)]
    pub particles: Vec<ParticleConfig>, // explicit initial states, used when non-empty
    #[serde(default)]
    pub random: Option<RandomConfig>, // used when `particles` is empty
    #[serde(default)]
    pub output: Option<PathBuf>, // CSV path for the trajectory
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Read and parse a scenario file
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
    Ok(cfg)
}

fn to_vec2(values: &[f64], what: &str) -> Result<NVec2> {
    match values {
        [a] => Ok(NVec2::new(*a, 0.0)),
        [a, b] => Ok(NVec2::new(*a, *b)),
        _ => Err(Error::InvalidParam(format!(
            "{what} must have 1 or 2 components, got {}",
            values.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
engine:
  mode: "1D"
  integrator: "midpoint"
parameters:
  dt: 0.01
  max_t: 30.0
bounds:
  length: 15.0
random:
  count: 2
  max_vx: 10
"#;

    #[test]
    fn parses_sample_with_defaults() {
        let cfg = ScenarioConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(cfg.engine.mode, Mode::OneD);
        assert_eq!(cfg.engine.integrator, Integrator::Midpoint);
        assert_eq!(cfg.engine.collision, CollisionMode::Elastic);
        assert_eq!(cfg.parameters.gravity, GRAVITY);
        assert_eq!(cfg.parameters.friction, 0.0);
        assert_eq!(cfg.bounds.width, 0.0);
        assert!(cfg.particles.is_empty());
        assert_eq!(cfg.random.as_ref().map(|r| r.count), Some(2));
    }

    #[test]
    fn unknown_integrator_fails_at_load() {
        let text = SAMPLE.replace("midpoint", "rk4");
        assert!(matches!(ScenarioConfig::from_yaml_str(&text), Err(Error::Config(_))));
    }

    #[test]
    fn unknown_mode_fails_at_load() {
        let text = SAMPLE.replace("\"1D\"", "\"3D\"");
        assert!(ScenarioConfig::from_yaml_str(&text).is_err());
    }

    #[test]
    fn particle_vectors_accept_one_or_two_components() {
        let p = ParticleConfig { length: 1.0, width: 1.0, mass: 1.0, x: vec![2.0], v: vec![1.0, -1.0] };
        assert_eq!(p.position().unwrap(), NVec2::new(2.0, 0.0));
        assert_eq!(p.velocity().unwrap(), NVec2::new(1.0, -1.0));
        let bad = ParticleConfig { x: vec![], ..p };
        assert!(bad.position().is_err());
    }
}
