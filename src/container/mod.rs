//! Driver binding container.
//!
//! An explicit registry of driver factories keyed by binding name, built once
//! at startup. The connection registry talks to it only through the
//! [`Resolver`] trait.

mod error;

pub use error::ResolveError;

use crate::config::ConnectionConfig;
use crate::driver::{DriverError, DriverInstance, Environment};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Prefix of every driver binding key.
pub const BINDING_PREFIX: &str = "hashid.connection.";

/// Binding key under which the factory for `driver` is registered.
///
/// ```
/// assert_eq!(hashid::container::binding_key("hex"), "hashid.connection.hex");
/// ```
pub fn binding_key(driver: &str) -> String {
    format!("{}{}", BINDING_PREFIX, driver)
}

/// Construction parameters handed to a binding factory.
#[derive(Debug, Clone)]
pub struct BindingParams {
    /// Host environment handle
    pub env: Environment,
    /// Connection options with the `driver` key already removed
    pub config: ConnectionConfig,
}

/// Factory producing a driver instance from construction parameters.
pub type Factory =
    Arc<dyn Fn(BindingParams) -> Result<DriverInstance, DriverError> + Send + Sync>;

/// Capability to look up and build driver bindings.
pub trait Resolver: Send + Sync {
    /// Whether anything is registered under `key`.
    fn has_binding(&self, key: &str) -> bool;

    /// Whether `key` is bound as a shared instance.
    fn is_singleton(&self, key: &str) -> bool;

    /// Build (or fetch, for singletons) the instance bound to `key`.
    ///
    /// Singletons ignore `params` once built.
    fn resolve(
        &self,
        key: &str,
        params: Option<BindingParams>,
    ) -> Result<DriverInstance, ResolveError>;
}

enum Binding {
    Transient(Factory),
    Singleton {
        factory: Factory,
        instance: Mutex<Option<DriverInstance>>,
    },
}

/// Default [`Resolver`] backed by an in-memory map of factories.
///
/// # Examples
///
/// ```
/// use hashid::container::{Container, Resolver, binding_key};
/// use hashid::driver::{Driver, DriverError, Environment};
/// use std::sync::Arc;
///
/// struct Plain;
///
/// impl Driver for Plain {
///     fn name(&self) -> &str { "plain" }
///     fn encode(&self, value: u64) -> Result<String, DriverError> { Ok(value.to_string()) }
///     fn decode(&self, hashid: &str) -> Result<u64, DriverError> {
///         hashid.parse().map_err(|_| DriverError::InvalidHashid(hashid.to_string()))
///     }
/// }
///
/// let mut container = Container::new(Environment::new("demo"));
/// container.bind_driver("plain", |_params| Ok(Arc::new(Plain)));
///
/// assert!(container.has_binding(&binding_key("plain")));
/// assert!(!container.is_singleton(&binding_key("plain")));
/// ```
pub struct Container {
    env: Environment,
    bindings: HashMap<String, Binding>,
}

impl Container {
    /// Create an empty container whose singletons are built with `env`.
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            bindings: HashMap::new(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Register a factory that builds a fresh instance on every resolve.
    ///
    /// Replaces any existing binding under `key`.
    pub fn bind<F>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(BindingParams) -> Result<DriverInstance, DriverError> + Send + Sync + 'static,
    {
        let key = key.into();
        tracing::debug!(key = %key, "binding transient driver factory");
        self.bindings
            .insert(key, Binding::Transient(Arc::new(factory)));
        self
    }

    /// Register a factory whose first instance is shared by every resolve.
    ///
    /// Replaces any existing binding under `key`.
    pub fn singleton<F>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(BindingParams) -> Result<DriverInstance, DriverError> + Send + Sync + 'static,
    {
        let key = key.into();
        tracing::debug!(key = %key, "binding singleton driver factory");
        self.bindings.insert(
            key,
            Binding::Singleton {
                factory: Arc::new(factory),
                instance: Mutex::new(None),
            },
        );
        self
    }

    /// [`bind`](Self::bind) under the binding key of `driver`.
    pub fn bind_driver<F>(&mut self, driver: &str, factory: F) -> &mut Self
    where
        F: Fn(BindingParams) -> Result<DriverInstance, DriverError> + Send + Sync + 'static,
    {
        self.bind(binding_key(driver), factory)
    }

    /// [`singleton`](Self::singleton) under the binding key of `driver`.
    pub fn singleton_driver<F>(&mut self, driver: &str, factory: F) -> &mut Self
    where
        F: Fn(BindingParams) -> Result<DriverInstance, DriverError> + Send + Sync + 'static,
    {
        self.singleton(binding_key(driver), factory)
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn default_params(&self) -> BindingParams {
        BindingParams {
            env: self.env.clone(),
            config: ConnectionConfig::new(),
        }
    }
}

impl Resolver for Container {
    fn has_binding(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    fn is_singleton(&self, key: &str) -> bool {
        matches!(self.bindings.get(key), Some(Binding::Singleton { .. }))
    }

    fn resolve(
        &self,
        key: &str,
        params: Option<BindingParams>,
    ) -> Result<DriverInstance, ResolveError> {
        let binding = self
            .bindings
            .get(key)
            .ok_or_else(|| ResolveError::NotBound(key.to_string()))?;

        match binding {
            Binding::Transient(factory) => {
                let params = params.unwrap_or_else(|| self.default_params());
                Ok(factory(params)?)
            }
            Binding::Singleton { factory, instance } => {
                // Held across the build so concurrent first resolves share one instance
                let mut slot = instance.lock().unwrap_or_else(|e| e.into_inner());
                if let Some(existing) = slot.as_ref() {
                    return Ok(Arc::clone(existing));
                }

                let params = params.unwrap_or_else(|| self.default_params());
                let built = factory(params)?;
                tracing::debug!(key = %key, driver = built.name(), "built singleton driver");
                *slot = Some(Arc::clone(&built));
                Ok(built)
            }
        }
    }
}
