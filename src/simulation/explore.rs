//! Free projectile under constant acceleration
//!
//! Integrates a single point with each scheme and compares it against the
//! closed-form solution x(t) = x0 + v0 t + 1/2 a t^2, so the integrators can
//! be explored without any walls, friction or collisions.

use crate::error::{Error, Result};
use super::integrator::Integrator;
use super::states::NVec2;

/// One point of a projectile trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub t: f64,
    pub x: NVec2,
    pub v: NVec2,
}

/// Integrate from `(x0, v0)` under constant `a` at `t = 0, dt, 2dt, ...` up to `t_end`.
/// The first sample is the initial condition.
pub fn approximate(method: Integrator, x0: NVec2, v0: NVec2, a: NVec2, t_end: f64, dt: f64) -> Result<Vec<Sample>> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(Error::InvalidParam("dt must be finite and > 0".into()));
    }
    if !t_end.is_finite() || t_end < 0.0 {
        return Err(Error::InvalidParam("t_end must be finite and >= 0".into()));
    }

    let steps = (t_end / dt + 1e-9).floor() as usize;
    let mut out = Vec::with_capacity(steps + 1);
    let (mut x, mut v) = (x0, v0);
    out.push(Sample { t: 0.0, x, v });
    for k in 1..=steps {
        (x, v) = method.step_vec(x, v, a, dt);
        out.push(Sample { t: k as f64 * dt, x, v });
    }
    Ok(out)
}

/// Closed-form state at time `t`
pub fn exact(x0: NVec2, v0: NVec2, a: NVec2, t: f64) -> Sample {
    Sample {
        t,
        x: x0 + v0 * t + 0.5 * a * t * t,
        v: v0 + a * t,
    }
}

/// Largest distance between the approximation and the exact solution over all samples
pub fn max_position_error(samples: &[Sample], x0: NVec2, v0: NVec2, a: NVec2) -> f64 {
    samples
        .iter()
        .map(|s| (s.x - exact(x0, v0, a, s.t).x).norm())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gravity() -> NVec2 {
        NVec2::new(0.0, -9.8)
    }

    #[test]
    fn sample_count_and_times() {
        let s = approximate(Integrator::Verlet, NVec2::zeros(), NVec2::new(1.0, 1.0), gravity(), 1.0, 0.25).unwrap();
        assert_eq!(s.len(), 5);
        assert!((s[4].t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn second_order_schemes_are_exact_for_constant_acceleration() {
        let (x0, v0, g) = (NVec2::new(0.0, 1000.0), NVec2::new(5.0, 10.0), gravity());
        for m in [Integrator::Midpoint, Integrator::Verlet] {
            let s = approximate(m, x0, v0, g, 10.0, 0.1).unwrap();
            assert!(max_position_error(&s, x0, v0, g) < 1e-8, "{m} drifted");
        }
    }

    #[test]
    fn euler_cromer_error_is_first_order() {
        let (x0, v0, g) = (NVec2::new(0.0, 1000.0), NVec2::new(5.0, 10.0), gravity());
        let coarse = approximate(Integrator::EulerCromer, x0, v0, g, 10.0, 0.1).unwrap();
        let fine = approximate(Integrator::EulerCromer, x0, v0, g, 10.0, 0.05).unwrap();
        let e1 = max_position_error(&coarse, x0, v0, g);
        let e2 = max_position_error(&fine, x0, v0, g);
        assert!(e1 > 0.0);
        let ratio = e1 / e2;
        assert!((ratio - 2.0).abs() < 0.05, "ratio {ratio}");
    }

    #[test]
    fn rejects_bad_step() {
        assert!(approximate(Integrator::Midpoint, NVec2::zeros(), NVec2::zeros(), gravity(), 1.0, 0.0).is_err());
    }
}
