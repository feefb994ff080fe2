use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the kinematics core.
///
/// Every construction-time defect is reported through one of these variants;
/// numeric edge cases inside a frame are corrected locally and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid scenario or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Integrator name outside {euler-cromer, midpoint, verlet}.
    #[error("unknown integrator: {0}")]
    UnknownIntegrator(String),

    /// Collision mode outside {elastic, inelastic}.
    #[error("unknown collision mode: {0}")]
    UnknownCollisionMode(String),

    /// Simulation mode outside {1D, 2D}.
    #[error("unknown simulation mode: {0}")]
    UnknownMode(String),

    /// A frame was requested after the simulation reached a termination condition.
    #[error("simulation already terminated")]
    SimulationTerminated,

    /// Scenario file could not be parsed.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),

    /// Propagated I/O errors (scenario loading, trajectory export).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidParam("mass must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("mass"));

        let e = Error::UnknownIntegrator("rk4".into());
        assert_eq!(e.to_string(), "unknown integrator: rk4");
    }
}
