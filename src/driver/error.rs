//! Error types for driver operations.

use thiserror::Error;

/// Errors raised by driver implementations and the factories that build them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// Input could not be decoded by this driver.
    #[error("Invalid hashid: {0}")]
    InvalidHashid(String),

    /// Driver options were missing or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Any other driver-specific failure.
    #[error("{0}")]
    Other(String),
}
