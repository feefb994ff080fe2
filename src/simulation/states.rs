//! Core state types for the kinematics sandbox.
//!
//! Defines the rigid rectangular `Particle`, the simulation `Mode` (1D / 2D)
//! and the axis-aligned bounding box used for wall and pair tests.
//!
//! A particle only carries its *current* state; the sample-by-sample history
//! lives in the optional [`Trajectory`](super::trajectory::Trajectory) recorder.

use nalgebra::Vector2;
use serde::Deserialize;
use std::str::FromStr;

use crate::error::{Error, Result};

pub type NVec2 = Vector2<f64>;

/// Spatial mode of a simulation.
/// In `OneD` only the x axis is integrated, reflected and collided
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[serde(rename = "1D")]
    OneD,

    #[serde(rename = "2D")]
    TwoD,
}

impl Mode {
    /// Number of axes that take part in the dynamics (1 or 2)
    pub fn axes(self) -> usize {
        match self {
            Mode::OneD => 1,
            Mode::TwoD => 2,
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1D" | "1d" => Ok(Mode::OneD),
            "2D" | "2d" => Ok(Mode::TwoD),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

/// Axis-aligned bounding box, `min` is the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: NVec2,
    pub max: NVec2,
}

impl Aabb {
    /// Strict overlap along one axis: flush boxes do not overlap
    pub fn overlaps_on(&self, other: &Aabb, axis: usize) -> bool {
        self.min[axis] < other.max[axis] && other.min[axis] < self.max[axis]
    }

    /// Center along `axis`
    pub fn center(&self, axis: usize) -> f64 {
        0.5 * (self.min[axis] + self.max[axis])
    }
}

/// A rigid rectangle moving on a frictional floor.
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: usize, // stable identifier, equality only
    length: f64,   // extent along x
    width: f64,    // extent along y
    mass: f64,     // mass
    pub x: NVec2,  // position of the lower-left corner
    pub v: NVec2,  // velocity
}

impl PartialEq for Particle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Particle {}

impl Particle {
    /// Create a particle after validating its geometry and mass.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `length`, `width` or `mass` is non-positive or not finite,
    ///   or if a state component is NaN/inf.
    pub fn new(id: usize, length: f64, width: f64, mass: f64, x: NVec2, v: NVec2) -> Result<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(Error::InvalidParam(format!("particle {id}: length must be finite and > 0")));
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidParam(format!("particle {id}: width must be finite and > 0")));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam(format!("particle {id}: mass must be finite and > 0")));
        }
        if !x.iter().all(|c| c.is_finite()) || !v.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidParam(format!("particle {id}: state must be finite")));
        }
        Ok(Self { id, length, width, mass, x, v })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Extent of the rectangle along `axis` (0 = length, 1 = width)
    pub fn extent(&self, axis: usize) -> f64 {
        if axis == 0 { self.length } else { self.width }
    }

    /// Kinetic energy: 1/2 m |v|^2, computed from the current velocity
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.v.norm_squared()
    }

    /// Linear momentum m v
    #[inline]
    pub fn momentum(&self) -> NVec2 {
        self.mass * self.v
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb {
            min: self.x,
            max: self.x + NVec2::new(self.length, self.width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_ok() -> Result<()> {
        let p = Particle::new(3, 2.0, 1.0, 4.0, NVec2::new(1.0, 2.0), NVec2::new(3.0, -4.0))?;
        assert_eq!(p.id, 3);
        assert_eq!(p.length(), 2.0);
        assert_eq!(p.width(), 1.0);
        assert_eq!(p.mass(), 4.0);
        // |v|^2 = 25, KE = 0.5 * 4 * 25
        assert!((p.kinetic_energy() - 50.0).abs() < 1e-12);
        assert_eq!(p.momentum(), NVec2::new(12.0, -16.0));
        Ok(())
    }

    #[test]
    fn invalid_geometry_rejected() {
        let err = Particle::new(0, 0.0, 1.0, 1.0, NVec2::zeros(), NVec2::zeros()).unwrap_err();
        assert!(err.to_string().contains("length"));
        let err = Particle::new(0, 1.0, -1.0, 1.0, NVec2::zeros(), NVec2::zeros()).unwrap_err();
        assert!(err.to_string().contains("width"));
        let err = Particle::new(0, 1.0, 1.0, 0.0, NVec2::zeros(), NVec2::zeros()).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn equality_is_by_id() -> Result<()> {
        let a = Particle::new(1, 1.0, 1.0, 1.0, NVec2::zeros(), NVec2::zeros())?;
        let b = Particle::new(1, 2.0, 2.0, 5.0, NVec2::new(4.0, 4.0), NVec2::new(1.0, 0.0))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn flush_boxes_do_not_overlap() -> Result<()> {
        let a = Particle::new(0, 1.0, 1.0, 1.0, NVec2::new(0.0, 0.0), NVec2::zeros())?;
        let b = Particle::new(1, 1.0, 1.0, 1.0, NVec2::new(1.0, 0.0), NVec2::zeros())?;
        let c = Particle::new(2, 1.0, 1.0, 1.0, NVec2::new(0.5, 0.0), NVec2::zeros())?;
        assert!(!a.bounding_box().overlaps_on(&b.bounding_box(), 0));
        assert!(a.bounding_box().overlaps_on(&c.bounding_box(), 0));
        assert!(a.bounding_box().overlaps_on(&c.bounding_box(), 1));
        Ok(())
    }

    #[test]
    fn mode_parses_from_name() {
        assert_eq!("1D".parse::<Mode>().unwrap(), Mode::OneD);
        assert_eq!("2D".parse::<Mode>().unwrap(), Mode::TwoD);
        assert!(matches!("3D".parse::<Mode>(), Err(Error::UnknownMode(_))));
    }
}
