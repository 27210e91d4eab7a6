//! Error taxonomy for filter design and tuner state

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TunerError {
    /// Unrecognized filter type, window or parameter name
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Non-numeric or out-of-domain parameter value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Programming error: the design has no exact centre tap
    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    #[error("FFT failed: {0}")]
    Transform(String),
}

pub type Result<T> = std::result::Result<T, TunerError>;
