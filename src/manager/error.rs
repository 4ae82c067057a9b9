use crate::driver::DriverError;

/// Errors that can occur while resolving a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("A driver must be specified for connection [{connection}]")]
    MissingDriver { connection: String },

    #[error("Unsupported driver [{driver}]")]
    UnsupportedDriver { driver: String },

    #[error("no default connection configured")]
    NoDefaultConnection,

    #[error("driver construction failed: {0}")]
    Driver(#[from] DriverError),
}
