//! Frictional floor, walls and pair collisions
//!
//! `System` owns the global physical rules and applies them to particles:
//! - `step`    – one integrator step under kinetic friction,
//! - `wall`    – reflection off the simulation bounds with impact-velocity back-solve,
//! - `collide` – momentum exchange between two overlapping rectangles

use log::{debug, warn};
use serde::Deserialize;
use std::str::FromStr;

use crate::error::{Error, Result};
use super::integrator::Integrator;
use super::states::{Mode, NVec2, Particle};

/// How two particles exchange momentum on contact
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMode {
    #[serde(rename = "elastic")] // momentum and kinetic energy conserved
    Elastic,

    #[serde(rename = "inelastic")] // perfectly inelastic, both leave with the center-of-mass velocity
    Inelastic,
}

impl FromStr for CollisionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "elastic" => Ok(CollisionMode::Elastic),
            "inelastic" => Ok(CollisionMode::Inelastic),
            other => Err(Error::UnknownCollisionMode(other.to_string())),
        }
    }
}

/// Which side of the bounds a particle crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Lower,   // position below 0
    Upper,   // position beyond the bound
    FarEdge, // position inside, far edge beyond the bound
}

/// Outcome of one wall reflection on one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub axis: usize,
    pub boundary: Boundary,
    pub depth: f64, // penetration past the wall
    pub speed: f64, // speed the particle leaves the wall with
}

/// Outcome of a resolved pair collision
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub ids: (usize, usize),
    pub axes: Vec<usize>, // axes on which velocities were exchanged, x first
}

#[derive(Debug, Clone)]
pub struct System {
    mode: Mode,
    collision: CollisionMode,
    integrator: Integrator,
    deceleration: f64, // mu_k * g
}

impl System {
    /// Build a system from already-parsed settings.
    ///
    /// Errors: `Error::InvalidParam` if `friction` or `gravity` is negative or not finite.
    pub fn new(mode: Mode, collision: CollisionMode, integrator: Integrator, friction: f64, gravity: f64) -> Result<Self> {
        if !friction.is_finite() || friction < 0.0 {
            return Err(Error::InvalidParam("friction must be finite and >= 0".into()));
        }
        if !gravity.is_finite() || gravity < 0.0 {
            return Err(Error::InvalidParam("gravity must be finite and >= 0".into()));
        }
        Ok(Self {
            mode,
            collision,
            integrator,
            deceleration: friction * gravity,
        })
    }

    /// Build a system from textual names, failing on the first unknown one
    pub fn from_names(mode: &str, collision: &str, integrator: &str, friction: f64, gravity: f64) -> Result<Self> {
        Self::new(mode.parse()?, collision.parse()?, integrator.parse()?, friction, gravity)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn collision_mode(&self) -> CollisionMode {
        self.collision
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    /// Magnitude of the friction deceleration
    pub fn deceleration(&self) -> f64 {
        self.deceleration
    }

    /// Friction acceleration on one axis and whether it brings the particle to rest this step.
    /// Opposes motion, zero at rest, and never strong enough to reverse a moving particle
    fn friction_acceleration(&self, v: f64, dt: f64) -> (f64, bool) {
        if v == 0.0 || self.deceleration == 0.0 {
            return (0.0, false);
        }
        if v.abs() <= self.deceleration * dt {
            return (-v / dt, true);
        }
        (-self.deceleration * v.signum(), false)
    }

    /// Advance a particle by one integrator step of size `dt`
    pub fn step(&self, p: &mut Particle, dt: f64) {
        for axis in 0..self.mode.axes() {
            let (a, stops) = self.friction_acceleration(p.v[axis], dt);
            let (x_new, v_new) = self.integrator.step(p.x[axis], p.v[axis], a, dt);
            if stops {
                // never past the distance friction needs to bring it to rest
                let reach = p.v[axis] * p.v[axis] / (2.0 * self.deceleration);
                p.x[axis] += (x_new - p.x[axis]).clamp(-reach, reach);
                p.v[axis] = 0.0;
            } else {
                p.x[axis] = x_new;
                p.v[axis] = v_new;
            }
        }
    }

    /// Speed at the moment of contact for a particle found `depth` past a wall with
    /// speed `v` after the step.
    ///
    /// Friction opposed the travel toward the wall, so with `a` against the travel and
    /// `ds = +depth` along it: v_c^2 = v^2 - 2 a ds = v^2 + 2 mu g depth
    fn contact_speed(&self, v: f64, depth: f64) -> f64 {
        let arg = v * v + 2.0 * self.deceleration * depth;
        if arg < 0.0 {
            warn!("wall back-solve argument {arg} < 0, clamping contact speed to 0");
            return 0.0;
        }
        arg.sqrt()
    }

    /// Reflect a particle off the box `[0, bounds.x] x [0, bounds.y]`.
    ///
    /// The particle is clamped flush to the wall it crossed and leaves with the back-solved
    /// contact speed pointing inward. A particle already moving away from the wall is only
    /// clamped. Returns one contact per reflected axis, empty when the particle was inside.
    pub fn wall(&self, p: &mut Particle, bounds: NVec2) -> Vec<WallContact> {
        let mut contacts = Vec::new();

        for axis in 0..self.mode.axes() {
            let limit = bounds[axis];
            let extent = p.extent(axis);
            let pos = p.x[axis];

            let (boundary, depth) = if pos < 0.0 {
                (Boundary::Lower, -pos)
            } else if pos > limit {
                (Boundary::Upper, pos + extent - limit)
            } else if pos + extent > limit {
                (Boundary::FarEdge, pos + extent - limit)
            } else {
                continue;
            };

            // inward direction and the clamped position
            let (inward, clamped) = match boundary {
                Boundary::Lower => (1.0, 0.0),
                Boundary::Upper | Boundary::FarEdge => (-1.0, limit - extent),
            };

            let v = p.v[axis];
            let speed = if v * inward > 0.0 {
                v.abs()
            } else {
                let speed = self.contact_speed(v, depth);
                p.v[axis] = inward * speed;
                speed
            };
            p.x[axis] = clamped;

            debug!("particle {} hit {:?} wall on axis {} (depth {:.3e}, speed {:.4})", p.id, boundary, axis, depth, speed);
            contacts.push(WallContact { axis, boundary, depth, speed });
        }

        contacts
    }

    /// Post-collision velocities of a 1D two-body exchange
    fn exchange(&self, m1: f64, v1: f64, m2: f64, v2: f64) -> (f64, f64) {
        let total = m1 + m2;
        match self.collision {
            CollisionMode::Elastic => (
                ((m1 - m2) * v1 + 2.0 * m2 * v2) / total,
                ((m2 - m1) * v2 + 2.0 * m1 * v1) / total,
            ),
            CollisionMode::Inelastic => {
                let v_cm = (m1 * v1 + m2 * v2) / total;
                (v_cm, v_cm)
            }
        }
    }

    /// Resolve a collision between `a` and `b` if their rectangles overlap.
    ///
    /// Axes are handled x first, then y; an axis is resolved only if the pair is closing
    /// along it. After each resolved axis `b` is moved flush against `a` on that axis.
    /// If that would push `b` out of `bounds`, `b` is clamped to the wall and `a` is
    /// moved flush against `b` instead, so both end inside the box.
    pub fn collide(&self, a: &mut Particle, b: &mut Particle, bounds: NVec2) -> Option<Collision> {
        let axes = self.mode.axes();
        let (box_a, box_b) = (a.bounding_box(), b.bounding_box());
        if !(0..axes).all(|k| box_a.overlaps_on(&box_b, k)) {
            return None;
        }

        let mut resolved = Vec::new();
        for axis in 0..axes {
            // separation of centers from a to b, and velocity of b relative to a
            let gap = b.bounding_box().center(axis) - a.bounding_box().center(axis);
            let rel = b.v[axis] - a.v[axis];
            let closing = if gap != 0.0 { gap * rel < 0.0 } else { rel != 0.0 };
            if !closing {
                continue;
            }

            let (va, vb) = self.exchange(a.mass(), a.v[axis], b.mass(), b.v[axis]);
            a.v[axis] = va;
            b.v[axis] = vb;

            // b goes on the side it was on, or the side it now separates toward
            let side = if gap != 0.0 { gap } else { vb - va };
            b.x[axis] = if side >= 0.0 {
                a.x[axis] + a.extent(axis)
            } else {
                a.x[axis] - b.extent(axis)
            };
            let b_max = (bounds[axis] - b.extent(axis)).max(0.0);
            if b.x[axis] < 0.0 || b.x[axis] > b_max {
                b.x[axis] = b.x[axis].clamp(0.0, b_max);
                let a_max = (bounds[axis] - a.extent(axis)).max(0.0);
                let flush = if side >= 0.0 {
                    b.x[axis] - a.extent(axis)
                } else {
                    b.x[axis] + b.extent(axis)
                };
                a.x[axis] = flush.clamp(0.0, a_max);
                debug!("pair {} / {} pressed against the wall on axis {}", a.id, b.id, axis);
            }
            resolved.push(axis);
        }

        if resolved.is_empty() {
            return None;
        }
        debug!("collision between {} and {} on axes {:?}", a.id, b.id, resolved);
        Some(Collision { ids: (a.id, b.id), axes: resolved })
    }

    /// Total kinetic energy, recomputed from the particles
    pub fn kinetic_energy(particles: &[Particle]) -> f64 {
        particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Total linear momentum
    pub fn momentum(particles: &[Particle]) -> NVec2 {
        particles.iter().fold(NVec2::zeros(), |acc, p| acc + p.momentum())
    }
}
