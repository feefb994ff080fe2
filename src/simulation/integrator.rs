//! Fixed-step time integrators for a single particle axis
//!
//! Provides Euler–Cromer (semi-implicit), midpoint and velocity-Verlet
//! schemes over a piecewise-constant acceleration. All schemes are pure:
//! `(x, v, a, dt) -> (x', v')`

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use super::states::NVec2;

/// Which integrator method is used by the system
/// integrator: "euler-cromer" | "midpoint" | "verlet"
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrator {
    #[serde(rename = "euler-cromer")] // semi-implicit Euler, updated velocity drives position, first order
    EulerCromer,

    #[serde(rename = "midpoint")] // average of old and new velocity drives position
    Midpoint,

    #[serde(rename = "verlet")] // position from Taylor expansion, same acceleration for both half kicks
    Verlet,
}

impl Integrator {
    pub const ALL: [Integrator; 3] = [Integrator::EulerCromer, Integrator::Midpoint, Integrator::Verlet];

    /// Advance one axis by one step of size `dt` under constant acceleration `a`
    pub fn step(self, x: f64, v: f64, a: f64, dt: f64) -> (f64, f64) {
        match self {
            Integrator::EulerCromer => {
                // v_n+1 = v_n + a dt
                let v_new = v + a * dt;
                // x_n+1 = x_n + v_n+1 dt
                (x + v_new * dt, v_new)
            }
            Integrator::Midpoint => {
                let v_new = v + a * dt;
                // x_n+1 = x_n + 1/2 (v_n + v_n+1) dt
                (x + 0.5 * (v + v_new) * dt, v_new)
            }
            Integrator::Verlet => {
                // x_n+1 = x_n + v_n dt + 1/2 a dt^2
                let x_new = x + v * dt + 0.5 * a * dt * dt;
                // v_n+1 = v_n + 1/2 (a_n + a_n+1) dt, with a_n+1 = a_n
                (x_new, v + a * dt)
            }
        }
    }

    /// Component-wise [`Integrator::step`] on a 2D state
    pub fn step_vec(self, x: NVec2, v: NVec2, a: NVec2, dt: f64) -> (NVec2, NVec2) {
        let (x0, v0) = self.step(x.x, v.x, a.x, dt);
        let (x1, v1) = self.step(x.y, v.y, a.y, dt);
        (NVec2::new(x0, x1), NVec2::new(v0, v1))
    }

    pub fn name(self) -> &'static str {
        match self {
            Integrator::EulerCromer => "euler-cromer",
            Integrator::Midpoint => "midpoint",
            Integrator::Verlet => "verlet",
        }
    }

    /// Global convergence order for smooth acceleration
    pub fn order(self) -> usize {
        match self {
            Integrator::EulerCromer => 1,
            Integrator::Midpoint | Integrator::Verlet => 2,
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Integrator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Integrator::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::UnknownIntegrator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_cromer_uses_updated_velocity() {
        let (x, v) = Integrator::EulerCromer.step(0.0, 1.0, 2.0, 0.5);
        assert_eq!(v, 2.0);
        // 0 + 2.0 * 0.5, not 1.0 * 0.5
        assert_eq!(x, 1.0);
    }

    #[test]
    fn midpoint_averages_velocity() {
        let (x, v) = Integrator::Midpoint.step(0.0, 1.0, 2.0, 0.5);
        assert_eq!(v, 2.0);
        assert_eq!(x, 0.75);
    }

    #[test]
    fn verlet_taylor_position() {
        let (x, v) = Integrator::Verlet.step(1.0, 1.0, 2.0, 0.5);
        // 1 + 0.5 + 0.5 * 2 * 0.25
        assert_eq!(x, 1.75);
        assert_eq!(v, 2.0);
    }

    #[test]
    fn orders() {
        assert_eq!(Integrator::EulerCromer.order(), 1);
        assert_eq!(Integrator::Midpoint.order(), 2);
        assert_eq!(Integrator::Verlet.order(), 2);
    }

    #[test]
    fn names_round_trip_and_unknown_fails() {
        for m in Integrator::ALL {
            assert_eq!(m.name().parse::<Integrator>().unwrap(), m);
        }
        let err = "rk4".parse::<Integrator>().unwrap_err();
        assert!(matches!(err, Error::UnknownIntegrator(ref n) if n == "rk4"));
    }

    #[test]
    fn step_vec_is_componentwise() {
        let (x, v) = Integrator::EulerCromer.step_vec(
            NVec2::new(0.0, 10.0),
            NVec2::new(1.0, 0.0),
            NVec2::new(0.0, -10.0),
            0.1,
        );
        assert!((x.x - 0.1).abs() < 1e-12);
        assert!((v.y + 1.0).abs() < 1e-12);
        assert!((x.y - 9.9).abs() < 1e-12);
    }
}
