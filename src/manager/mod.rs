//! Connection registry module.
//!
//! Resolves connection names to driver instances, memoizing one instance per
//! name. Resolution consults, in strict order:
//!
//! 1. a custom creator registered under the exact connection name,
//! 2. a custom creator registered under the connection's driver type,
//! 3. the container binding for the driver type,
//!
//! and fails when none applies.

mod error;

pub use error::ConnectionError;

use crate::config::{ConfigStore, ConnectionConfig, HashidConfig};
use crate::container::{binding_key, BindingParams, Container, ResolveError, Resolver};
use crate::driver::{DriverError, DriverInstance, Environment};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Caller-supplied factory overriding resolution for a connection name or
/// driver type.
///
/// Receives the host environment, the connection options and the connection
/// name being resolved.
pub type CustomCreator = Arc<
    dyn Fn(&Environment, ConnectionConfig, &str) -> Result<DriverInstance, DriverError>
        + Send
        + Sync,
>;

/// Mutable state owned by the registry.
struct RegistryState {
    default_name: RwLock<String>,
    cache: DashMap<String, DriverInstance>,
}

/// Resolves named hashid connections to cached driver instances.
///
/// # Examples
///
/// ```
/// use hashid::config::{ConnectionConfig, HashidConfig};
/// use hashid::container::Container;
/// use hashid::driver::{Driver, DriverError, Environment};
/// use hashid::ConnectionRegistry;
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
/// let mut config = HashidConfig::default();
/// config.default = "main".to_string();
/// config
///     .connections
///     .insert("main".to_string(), ConnectionConfig::new().with("driver", "plain"));
///
/// let mut container = Container::new(Environment::new("demo"));
/// container.bind_driver("plain", |_params| Ok(Arc::new(Plain)));
///
/// let registry = ConnectionRegistry::from_config(config, container);
/// let first = registry.connection(None).unwrap();
/// let second = registry.connection(Some("main")).unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(registry.encode(42).unwrap(), "42");
/// ```
pub struct ConnectionRegistry {
    env: Environment,
    store: Arc<dyn ConfigStore>,
    resolver: Arc<dyn Resolver>,
    creators: HashMap<String, CustomCreator>,
    state: RegistryState,
}

impl ConnectionRegistry {
    /// Create a registry reading connection records from `store` and driver
    /// bindings from `resolver`.
    ///
    /// The default connection name is taken from the store once, here.
    pub fn new(
        env: Environment,
        store: Arc<dyn ConfigStore>,
        resolver: Arc<dyn Resolver>,
    ) -> Self {
        let default_name = store.default_connection().unwrap_or_default();

        Self {
            env,
            store,
            resolver,
            creators: HashMap::new(),
            state: RegistryState {
                default_name: RwLock::new(default_name),
                cache: DashMap::new(),
            },
        }
    }

    /// Create a registry over a loaded config and a container, sharing the
    /// container's environment.
    pub fn from_config(config: HashidConfig, container: Container) -> Self {
        let env = container.environment().clone();
        Self::new(env, Arc::new(config), Arc::new(container))
    }

    /// Register a custom creator under a connection name or a driver type.
    ///
    /// A creator keyed by connection name receives the full record, `driver`
    /// included. A creator keyed by driver type receives the record with
    /// `driver` removed. Registering the same key again replaces the creator.
    pub fn extend<F>(&mut self, key: impl Into<String>, creator: F) -> &mut Self
    where
        F: Fn(&Environment, ConnectionConfig, &str) -> Result<DriverInstance, DriverError>
            + Send
            + Sync
            + 'static,
    {
        let key = key.into();
        debug!(key = %key, "registered custom creator");
        self.creators.insert(key, Arc::new(creator));
        self
    }

    /// Get the driver instance for `name`, or for the default connection when
    /// `name` is `None` or empty.
    ///
    /// The first successful resolution of a name is cached and returned by
    /// every later call; a cached instance is never replaced.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::NoDefaultConnection` if no name is given and the
    ///   default is empty
    /// - `ConnectionError::MissingDriver` if the record declares no driver and
    ///   no creator matches the name
    /// - `ConnectionError::UnsupportedDriver` if nothing handles the driver
    /// - `ConnectionError::Driver` if a creator or factory fails
    pub fn connection(&self, name: Option<&str>) -> Result<DriverInstance, ConnectionError> {
        let name = match name.filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => self.default_connection(),
        };

        if name.is_empty() {
            return Err(ConnectionError::NoDefaultConnection);
        }

        if let Some(existing) = self.state.cache.get(&name) {
            debug!(connection = %name, "connection cache hit");
            return Ok(Arc::clone(existing.value()));
        }

        let instance = match self.create_driver(&name) {
            Ok(instance) => instance,
            Err(e) => {
                warn!(connection = %name, error = %e, "failed to resolve connection");
                return Err(e);
            }
        };

        // A concurrent resolution may have won; keep whichever landed first
        let cached = self.state.cache.entry(name).or_insert(instance);
        Ok(Arc::clone(cached.value()))
    }

    /// All connections resolved so far, keyed by name.
    ///
    /// Never triggers a resolution.
    pub fn connections(&self) -> HashMap<String, DriverInstance> {
        self.state
            .cache
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    /// Name of the connection used when none is given.
    pub fn default_connection(&self) -> String {
        self.state
            .default_name
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Change the default connection name.
    ///
    /// The name is not checked against the configuration; an unknown name
    /// only fails once it is resolved.
    pub fn set_default_connection(&self, name: impl Into<String>) -> &Self {
        let name = name.into();
        debug!(connection = %name, "default connection changed");
        *self
            .state
            .default_name
            .write()
            .unwrap_or_else(|e| e.into_inner()) = name;
        self
    }

    /// Alias of [`default_connection`](Self::default_connection).
    pub fn default_driver(&self) -> String {
        self.default_connection()
    }

    /// Encode `value` with the default connection.
    pub fn encode(&self, value: u64) -> Result<String, ConnectionError> {
        Ok(self.connection(None)?.encode(value)?)
    }

    /// Decode `hashid` with the default connection.
    pub fn decode(&self, hashid: &str) -> Result<u64, ConnectionError> {
        Ok(self.connection(None)?.decode(hashid)?)
    }

    fn create_driver(&self, name: &str) -> Result<DriverInstance, ConnectionError> {
        let config = self.store.connection(name).unwrap_or_default();

        if let Some(creator) = self.creators.get(name) {
            debug!(connection = %name, "resolving through connection creator");
            return Ok(creator(&self.env, config, name)?);
        }

        if let Some(driver) = config.driver() {
            if let Some(creator) = self.creators.get(driver) {
                debug!(connection = %name, driver = %driver, "resolving through driver creator");
                return Ok(creator(&self.env, config.without_driver(), name)?);
            }
        }

        self.create_connection(name, &config)
    }

    fn create_connection(
        &self,
        name: &str,
        config: &ConnectionConfig,
    ) -> Result<DriverInstance, ConnectionError> {
        let driver = config
            .driver()
            .ok_or_else(|| ConnectionError::MissingDriver {
                connection: name.to_string(),
            })?;

        let key = binding_key(driver);
        if !self.resolver.has_binding(&key) {
            return Err(ConnectionError::UnsupportedDriver {
                driver: driver.to_string(),
            });
        }

        let result = if self.resolver.is_singleton(&key) {
            debug!(connection = %name, driver = %driver, "resolving shared driver binding");
            self.resolver.resolve(&key, None)
        } else {
            debug!(connection = %name, driver = %driver, "building driver from binding");
            self.resolver.resolve(
                &key,
                Some(BindingParams {
                    env: self.env.clone(),
                    config: config.without_driver(),
                }),
            )
        };

        result.map_err(|e| match e {
            ResolveError::NotBound(_) => ConnectionError::UnsupportedDriver {
                driver: driver.to_string(),
            },
            ResolveError::Factory(e) => ConnectionError::Driver(e),
        })
    }
}
