//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size and optional end time,
//! - optional kinetic-energy floor that halts the run,
//! - kinetic friction coefficient and gravitational acceleration,
//! - random seed for generated initial conditions

use crate::error::{Error, Result};

/// Standard gravity used to turn a friction coefficient into a deceleration
pub const GRAVITY: f64 = 9.8;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub dt: f64, // step size
    pub max_t: Option<f64>, // time end
    pub ke_epsilon: Option<f64>, // halt once total kinetic energy drops below this
    pub friction: f64, // kinetic friction coefficient
    pub gravity: f64, // gravitational acceleration
    pub seed: Option<u64>, // deterministic seed
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            dt: 1e-2,
            max_t: Some(30.0),
            ke_epsilon: None,
            friction: 0.0,
            gravity: GRAVITY,
            seed: None,
        }
    }
}

impl Parameters {
    /// Check every field; called once when a `Simulation` is built
    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(Error::InvalidParam("dt must be finite and > 0".into()));
        }
        if let Some(t) = self.max_t {
            if !t.is_finite() || t <= 0.0 {
                return Err(Error::InvalidParam("max_t must be finite and > 0".into()));
            }
        }
        if let Some(eps) = self.ke_epsilon {
            if !eps.is_finite() || eps < 0.0 {
                return Err(Error::InvalidParam("ke_epsilon must be finite and >= 0".into()));
            }
        }
        if self.max_t.is_none() && self.ke_epsilon.is_none() {
            return Err(Error::InvalidParam(
                "at least one of max_t or ke_epsilon must be set".into(),
            ));
        }
        if !self.friction.is_finite() || self.friction < 0.0 {
            return Err(Error::InvalidParam("friction must be finite and >= 0".into()));
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(Error::InvalidParam("gravity must be finite and >= 0".into()));
        }
        Ok(())
    }
}
