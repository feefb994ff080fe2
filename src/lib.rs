pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{Error, Result};

pub use simulation::states::{Aabb, Mode, NVec2, Particle};
pub use simulation::params::{Parameters, GRAVITY};
pub use simulation::engine::Engine;
pub use simulation::integrator::Integrator;
pub use simulation::system::{Boundary, Collision, CollisionMode, System, WallContact};
pub use simulation::trajectory::{History, Trajectory, TrajectoryTable};
pub use simulation::scenario::{place_random, FrameView, RectView, Simulation, Status, Termination};

pub use configuration::config::{
    load_scenario, BoundsConfig, EngineConfig, ParametersConfig, ParticleConfig, RandomConfig, ScenarioConfig,
};

pub use benchmark::benchmark::{bench_convergence, bench_frames};
