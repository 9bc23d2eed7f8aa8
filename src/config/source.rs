//! Key/Value Configuration Sources
//!
//! All settings lookups go through the [`ConfigSource`] trait so that the
//! process environment can be swapped for an in-memory map in tests.

use std::collections::HashMap;
use std::env;
use std::fmt;

/// Read-only key/value lookup
pub trait ConfigSource {
    /// Returns the raw value for `key`, or `None` when the key is absent.
    ///
    /// An empty string is a present value.
    fn get(&self, key: &str) -> Option<String>;
}

impl<S: ConfigSource + ?Sized> ConfigSource for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Live process environment
///
/// Every call re-reads the environment; nothing is cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }
}

/// Plain in-memory source, mostly used as a fake environment
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MapSource {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Which layer a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Env,
    Property,
    Default,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Env => write!(f, "env"),
            Origin::Property => write!(f, "property"),
            Origin::Default => write!(f, "default"),
        }
    }
}

/// Environment layered over a properties source
///
/// The environment layer always wins when the variable is present, even if
/// its value is empty.
#[derive(Debug, Clone)]
pub struct LayeredConfig<E, P> {
    env: E,
    properties: P,
}

impl<P: ConfigSource> LayeredConfig<EnvSource, P> {
    /// Layer the live process environment over `properties`
    pub fn from_env(properties: P) -> Self {
        LayeredConfig::new(EnvSource, properties)
    }
}

impl<E: ConfigSource, P: ConfigSource> LayeredConfig<E, P> {
    pub fn new(env: E, properties: P) -> Self {
        LayeredConfig { env, properties }
    }

    pub fn properties(&self) -> &P {
        &self.properties
    }

    /// Look up a setting, env first
    pub fn lookup(&self, env_key: &str, prop_key: &str) -> Option<(String, Origin)> {
        if let Some(value) = self.env.get(env_key) {
            return Some((value, Origin::Env));
        }
        self.properties
            .get(prop_key)
            .map(|value| (value, Origin::Property))
    }

    /// Look up a setting, falling back to `default` when neither layer has it
    pub fn get_or(&self, env_key: &str, prop_key: &str, default: &str) -> String {
        let (value, origin) = self
            .lookup(env_key, prop_key)
            .unwrap_or_else(|| (default.to_string(), Origin::Default));
        tracing::debug!(env_key, prop_key, %origin, "resolved setting");
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_wins_over_property() {
        let config = LayeredConfig::new(
            MapSource::new().with("MY_KEY", "from-env"),
            MapSource::new().with("my.key", "from-prop"),
        );
        assert_eq!(
            config.lookup("MY_KEY", "my.key"),
            Some(("from-env".to_string(), Origin::Env))
        );
    }

    #[test]
    fn test_property_used_when_env_absent() {
        let config = LayeredConfig::new(
            MapSource::new(),
            MapSource::new().with("my.key", "from-prop"),
        );
        assert_eq!(config.get_or("MY_KEY", "my.key", "dflt"), "from-prop");
    }

    #[test]
    fn test_empty_env_still_wins() {
        let config = LayeredConfig::new(
            MapSource::new().with("MY_KEY", ""),
            MapSource::new().with("my.key", "from-prop"),
        );
        assert_eq!(config.get_or("MY_KEY", "my.key", "dflt"), "");
    }

    #[test]
    fn test_default_when_both_absent() {
        let config = LayeredConfig::new(MapSource::new(), MapSource::new());
        assert_eq!(config.lookup("MY_KEY", "my.key"), None);
        assert_eq!(config.get_or("MY_KEY", "my.key", "dflt"), "dflt");
    }

    #[test]
    fn test_env_source_reads_live_environment() {
        let key = "REDIS_TELEMETRY_SOURCE_TEST_LIVE_ENV";
        assert_eq!(EnvSource.get(key), None);
        env::set_var(key, "first");
        assert_eq!(EnvSource.get(key), Some("first".to_string()));
        env::set_var(key, "second");
        assert_eq!(EnvSource.get(key), Some("second".to_string()));
        env::remove_var(key);
        assert_eq!(EnvSource.get(key), None);
    }
}
