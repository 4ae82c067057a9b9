//! Hashid connection manager
//!
//! This library resolves named hashid connections to driver instances. Each
//! connection is configured by name, resolved lazily on first use and cached
//! for the life of the registry. Drivers themselves are supplied by the host
//! through container bindings or custom creators.

pub mod config;
pub mod container;
pub mod driver;
pub mod logging;
pub mod manager;

pub use config::{ConfigStore, ConnectionConfig, HashidConfig};
pub use container::{Container, Resolver};
pub use driver::{Driver, DriverError, DriverInstance, Environment};
pub use manager::{ConnectionError, ConnectionRegistry, CustomCreator};
