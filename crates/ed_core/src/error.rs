//! Error types for configuration and simulation runs.

use thiserror::Error;

/// Rejected configuration; raised before any event is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("room count must be positive")]
    NonPositiveRoomCount,

    #[error("patient count must be positive")]
    NonPositivePatientCount,

    #[error("arrival interval must be positive")]
    NonPositiveArrivalInterval,

    #[error("arrival window is empty: end {end} ms is not after start {start} ms")]
    EmptyWindow { start: u64, end: u64 },

    #[error("{what} must be a positive duration")]
    ZeroDuration { what: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// `run` or `step` called before `init`.
    #[error("simulation has not been initialized")]
    NotInitialized,

    /// Handler logic broke an engine invariant; the run cannot continue.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("event queue still pending after {0} steps")]
    StepLimitExceeded(usize),
}
