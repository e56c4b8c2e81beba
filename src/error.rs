//! Error types for the fluid solver.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the solver API.
///
/// Configuration problems surface from `SphSolver::initialize` and never
/// later. Host calls between steps reject bad indices and non-finite input.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of range or non-finite.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Time step passed to `step` was negative, NaN or infinite.
    #[error("invalid time step {0}: must be finite and >= 0")]
    InvalidTimeStep(f32),

    /// Host addressed a particle that does not exist.
    #[error("particle index {index} out of range (count {count})")]
    ParticleIndexOutOfRange { index: usize, count: usize },

    /// Host addressed an obstacle that does not exist.
    #[error("obstacle index {index} out of range (count {count})")]
    ObstacleIndexOutOfRange { index: usize, count: usize },

    /// A host-supplied force, interaction or obstacle position was NaN or infinite.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An explicit layout did not match the configured particle count.
    #[error("layout has {actual} positions, expected {expected}")]
    LayoutMismatch { expected: usize, actual: usize },

    /// The solver was terminated and can no longer step.
    #[error("solver has been terminated")]
    Terminated,
}
