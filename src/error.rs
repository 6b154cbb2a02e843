//! Error types for the scheduler and pipeline simulation engine
//!
//! ## Table of Contents
//! - **SimError**: Main error enum covering all failure modes
//! - **Result**: Type alias for `Result<T, SimError>`

use thiserror::Error;

/// Result type alias used throughout this crate
pub type Result<T> = std::result::Result<T, SimError>;

/// Main error type for placement and simulation operations.
///
/// Unscheduled pods are never represented as an error — see
/// [`crate::workload::Decision`]. This enum is reserved for inputs that
/// violate a data-model invariant before either engine runs.
#[derive(Error, Debug)]
pub enum SimError {
    /// A cluster, pod, or scenario violates a data-model invariant.
    #[error("input validation error: {0}")]
    InputValidation(String),

    /// A defensive path that validation should have prevented was reached
    /// anyway (e.g. a zero-divisor surfacing inside the simulation loop).
    #[error("simulation internal error: {0}")]
    Simulation(String),

    /// Serialization/deserialization error for the wire formats in the
    /// external interfaces.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Metrics registration or export failure.
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl SimError {
    /// Create an input validation error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InputValidation(msg.into())
    }

    /// Create a simulation-internal error.
    pub fn simulation(msg: impl Into<String>) -> Self {
        Self::Simulation(msg.into())
    }
}
