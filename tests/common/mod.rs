//! Shared test utilities for hashid integration tests.
//!
//! Provides a reversible test driver and helpers for building containers and
//! registries from TOML snippets.

#![allow(dead_code)]

use hashid::config::HashidConfig;
use hashid::container::{BindingParams, Container};
use hashid::driver::{Driver, DriverError, DriverInstance, Environment};
use hashid::ConnectionRegistry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Offset-and-hex driver: reversible, salt-dependent, good enough for tests.
pub struct OffsetHex {
    name: String,
    offset: u64,
}

impl OffsetHex {
    pub fn new(name: &str, offset: u64) -> Self {
        Self {
            name: name.to_string(),
            offset,
        }
    }

    /// Build from binding params, reading the `offset` option.
    pub fn from_params(name: &str, params: &BindingParams) -> Result<Self, DriverError> {
        let offset = match params.config.get("offset") {
            Some(value) => value
                .as_u64()
                .ok_or_else(|| DriverError::Configuration("offset must be a number".to_string()))?,
            None => 0,
        };
        Ok(Self::new(name, offset))
    }
}

impl Driver for OffsetHex {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, value: u64) -> Result<String, DriverError> {
        Ok(format!("{:x}", value.wrapping_add(self.offset)))
    }

    fn decode(&self, hashid: &str) -> Result<u64, DriverError> {
        u64::from_str_radix(hashid, 16)
            .map(|n| n.wrapping_sub(self.offset))
            .map_err(|_| DriverError::InvalidHashid(hashid.to_string()))
    }
}

/// Container binding "hex" (transient) and "shared" (singleton), counting builds.
pub fn make_container(builds: Arc<AtomicUsize>) -> Container {
    let shared_builds = Arc::clone(&builds);

    let mut container = Container::new(Environment::new("integration"));
    container
        .bind_driver("hex", move |params| {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(OffsetHex::from_params("hex", &params)?) as DriverInstance)
        })
        .singleton_driver("shared", move |params| {
            shared_builds.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(OffsetHex::from_params("shared", &params)?) as DriverInstance)
        });
    container
}

/// Parse a TOML snippet into a config.
pub fn parse_config(toml: &str) -> HashidConfig {
    toml::from_str(toml).expect("test config must parse")
}

/// Registry over a TOML snippet with the standard test container.
pub fn make_registry(toml: &str) -> (ConnectionRegistry, Arc<AtomicUsize>) {
    let builds = Arc::new(AtomicUsize::new(0));
    let registry =
        ConnectionRegistry::from_config(parse_config(toml), make_container(Arc::clone(&builds)));
    (registry, builds)
}
