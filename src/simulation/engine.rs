//! High-level runtime engine settings
//!
//! Selects the spatial mode (1D/2D), the integrator and the collision mode
//! used when building and running a `Simulation`

use crate::simulation::integrator::Integrator;
use crate::simulation::states::Mode;
use crate::simulation::system::CollisionMode;

#[derive(Debug, Clone, Copy)]
pub struct Engine {
    pub mode: Mode, // 1D or 2D
    pub integrator: Integrator, // euler-cromer, midpoint or verlet
    pub collision: CollisionMode, // elastic or inelastic
}
