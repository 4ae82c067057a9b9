//! Driver abstraction layer.
//!
//! A driver performs the actual encode/decode work for a connection. This
//! crate ships no encoding algorithms of its own: implementations are supplied
//! by the host through container bindings or custom creators, and the
//! connection registry hands them out as shared `Arc<dyn Driver>` handles.

pub mod environment;
pub mod error;

pub use environment::Environment;
pub use error::DriverError;

use std::sync::Arc;

/// Reversible integer obfuscation backend.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn Driver>`.
/// Instances are shared between every caller that resolves the same
/// connection, so implementations must be `Send + Sync`.
pub trait Driver: Send + Sync + 'static {
    /// Driver type name, e.g. "hashids" or "base62".
    fn name(&self) -> &str;

    /// Obfuscate `value` into its hashid representation.
    fn encode(&self, value: u64) -> Result<String, DriverError>;

    /// Recover the integer behind `hashid`.
    ///
    /// Returns `DriverError::InvalidHashid` when the input was not produced
    /// by this driver.
    fn decode(&self, hashid: &str) -> Result<u64, DriverError>;
}

/// Shared handle to a resolved driver.
pub type DriverInstance = Arc<dyn Driver>;
