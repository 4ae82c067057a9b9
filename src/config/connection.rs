//! Per-connection configuration records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved option naming the driver type of a connection.
pub const DRIVER_KEY: &str = "driver";

/// Options of a single named connection.
///
/// A free-form mapping from option name to value. The reserved `driver` key
/// selects the driver type; every other option is handed to the driver
/// factory untouched.
///
/// # Example
///
/// ```rust
/// use hashid::config::ConnectionConfig;
///
/// let config = ConnectionConfig::new()
///     .with("driver", "hashids")
///     .with("salt", "pepper");
///
/// assert_eq!(config.driver(), Some("hashids"));
/// assert!(config.without_driver().driver().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionConfig(Map<String, Value>);

impl ConnectionConfig {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String option lookup; `None` for missing or non-string values.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Declared driver type.
    ///
    /// A `driver` entry that is null or not a string counts as undeclared.
    pub fn driver(&self) -> Option<&str> {
        self.get_str(DRIVER_KEY)
    }

    /// Copy of the record with the reserved `driver` key removed.
    pub fn without_driver(&self) -> Self {
        let mut options = self.0.clone();
        options.remove(DRIVER_KEY);
        Self(options)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ConnectionConfig {
    fn from(options: Map<String, Value>) -> Self {
        Self(options)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConnectionConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_driver_lookup() {
        let config = ConnectionConfig::new().with("driver", "hex");
        assert_eq!(config.driver(), Some("hex"));
    }

    #[test]
    fn test_non_string_driver_is_undeclared() {
        let config = ConnectionConfig::new().with("driver", json!(42));
        assert!(config.driver().is_none());

        let config = ConnectionConfig::new().with("driver", Value::Null);
        assert!(config.driver().is_none());
    }

    #[test]
    fn test_without_driver_keeps_other_options() {
        let config = ConnectionConfig::new()
            .with("driver", "hex")
            .with("x", 1)
            .with("salt", "abc");

        let stripped = config.without_driver();
        assert_eq!(stripped.len(), 2);
        assert_eq!(stripped.get("x"), Some(&json!(1)));
        assert_eq!(stripped.get_str("salt"), Some("abc"));
        assert!(stripped.get(DRIVER_KEY).is_none());

        // Source record is untouched
        assert_eq!(config.driver(), Some("hex"));
    }

    #[test]
    fn test_connection_config_from_toml_table() {
        let toml = r#"
        driver = "hashids"
        salt = "pepper"
        length = 8
        "#;

        let config: ConnectionConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.driver(), Some("hashids"));
        assert_eq!(config.get("length"), Some(&json!(8)));
    }

    #[test]
    fn test_connection_config_from_iter() {
        let config: ConnectionConfig = [("driver", "hex"), ("alphabet", "abc")]
            .into_iter()
            .collect();
        assert_eq!(config.len(), 2);
        assert_eq!(config.driver(), Some("hex"));
    }
}
