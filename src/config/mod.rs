//! Configuration module for hashid connections
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. Environment variables (`HASHID_*`)
//! 2. Configuration file (TOML)
//! 3. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use hashid::config::HashidConfig;
//!
//! let toml = r#"
//! default = "main"
//!
//! [connections.main]
//! driver = "hashids"
//! salt = "pepper"
//! "#;
//! let config: HashidConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.default, "main");
//! assert_eq!(config.connections["main"].driver(), Some("hashids"));
//! ```

pub mod connection;
pub mod error;
pub mod logging;

pub use connection::{ConnectionConfig, DRIVER_KEY};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Read access to connection records.
///
/// The connection registry only ever reads through this trait, so hosts can
/// back it with whatever configuration system they already have.
pub trait ConfigStore: Send + Sync {
    /// Options of the named connection, if configured.
    fn connection(&self, name: &str) -> Option<ConnectionConfig>;

    /// Name of the connection used when none is given.
    fn default_connection(&self) -> Option<String>;
}

/// Top-level hashid configuration.
///
/// # Example
///
/// ```rust
/// use hashid::config::HashidConfig;
///
/// let config = HashidConfig::default();
/// assert_eq!(config.default, "default");
/// assert!(config.connections.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashidConfig {
    /// Connection used when callers do not name one
    pub default: String,
    /// Named connection records
    pub connections: HashMap<String, ConnectionConfig>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for HashidConfig {
    fn default() -> Self {
        Self {
            default: "default".to_string(),
            connections: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl HashidConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports HASHID_* environment variables.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(name) = std::env::var("HASHID_DEFAULT_CONNECTION") {
            if !name.is_empty() {
                self.default = name;
            }
        }

        if let Ok(level) = std::env::var("HASHID_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HASHID_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default.is_empty() {
            return Err(ConfigError::Validation {
                field: "default".to_string(),
                message: "default connection name cannot be empty".to_string(),
            });
        }

        for (name, connection) in &self.connections {
            let Some(driver) = connection.get(DRIVER_KEY) else {
                continue;
            };
            match driver.as_str() {
                Some("") => {
                    return Err(ConfigError::Validation {
                        field: format!("connections.{}.driver", name),
                        message: "driver cannot be empty".to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    return Err(ConfigError::Validation {
                        field: format!("connections.{}.driver", name),
                        message: "driver must be a string".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl ConfigStore for HashidConfig {
    fn connection(&self, name: &str) -> Option<ConnectionConfig> {
        self.connections.get(name).cloned()
    }

    fn default_connection(&self) -> Option<String> {
        Some(self.default.clone())
    }
}
