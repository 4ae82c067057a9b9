use crate::driver::DriverError;

/// Errors that can occur while resolving a binding
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no binding registered for: {0}")]
    NotBound(String),

    #[error(transparent)]
    Factory(#[from] DriverError),
}
