pub mod states;
pub mod params;
pub mod engine;
pub mod integrator;
pub mod system;
pub mod trajectory;
pub mod scenario;
pub mod explore;
