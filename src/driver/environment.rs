//! Host environment handle passed to driver factories and custom creators.

use std::collections::HashMap;
use std::sync::Arc;

/// Cheaply cloneable handle to the host application.
///
/// Factories receive it alongside the connection options so they can look up
/// values that do not belong in the connection record itself (secrets kept in
/// environment variables, the application name used as a salt, ...).
#[derive(Debug, Clone, Default)]
pub struct Environment {
    inner: Arc<EnvironmentInner>,
}

#[derive(Debug, Default)]
struct EnvironmentInner {
    app_name: String,
    vars: HashMap<String, String>,
}

impl Environment {
    /// Create an environment for the named application with no variables.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(EnvironmentInner {
                app_name: app_name.into(),
                vars: HashMap::new(),
            }),
        }
    }

    /// Snapshot every process environment variable starting with `prefix`.
    ///
    /// Keys are stored with the prefix stripped, so `HASHID_SALT` read with
    /// prefix `HASHID_` is available as `var("SALT")`.
    pub fn from_env(app_name: impl Into<String>, prefix: &str) -> Self {
        let vars = std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(prefix)
                    .filter(|k| !k.is_empty())
                    .map(|k| (k.to_string(), value))
            })
            .collect();

        Self {
            inner: Arc::new(EnvironmentInner {
                app_name: app_name.into(),
                vars,
            }),
        }
    }

    /// Return a copy of this environment with `key` set to `value`.
    pub fn with_var(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut vars = self.inner.vars.clone();
        vars.insert(key.into(), value.into());
        Self {
            inner: Arc::new(EnvironmentInner {
                app_name: self.inner.app_name.clone(),
                vars,
            }),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.inner.app_name
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.inner.vars.get(key).map(String::as_str)
    }

    /// Whether two handles point at the same environment.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_new_has_no_vars() {
        let env = Environment::new("app");
        assert_eq!(env.app_name(), "app");
        assert!(env.var("SALT").is_none());
    }

    #[test]
    fn test_environment_with_var_leaves_original_untouched() {
        let env = Environment::new("app");
        let derived = env.with_var("SALT", "pepper");

        assert_eq!(derived.var("SALT"), Some("pepper"));
        assert_eq!(derived.app_name(), "app");
        assert!(env.var("SALT").is_none());
        assert!(!env.ptr_eq(&derived));
    }

    #[test]
    fn test_environment_from_env_strips_prefix() {
        std::env::set_var("HASHID_ENV_TEST_SALT", "from-env");
        let env = Environment::from_env("app", "HASHID_ENV_TEST_");
        std::env::remove_var("HASHID_ENV_TEST_SALT");

        assert_eq!(env.var("SALT"), Some("from-env"));
        assert!(env.var("HASHID_ENV_TEST_SALT").is_none());
    }

    #[test]
    fn test_environment_clone_shares_state() {
        let env = Environment::new("app").with_var("KEY", "v");
        let clone = env.clone();
        assert!(env.ptr_eq(&clone));
    }
}
