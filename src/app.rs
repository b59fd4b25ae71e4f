//! The host application extensions attach to.
//!
//! An [`Application`] owns a flat configuration mapping and a registry of
//! named extensions. It is passed explicitly to whatever needs it; there is
//! no ambient "current application".

use serde_json::Value;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A host application: a name, its configuration and its extensions.
#[derive(Debug, Default)]
pub struct Application {
    name: String,
    config: Config,
    extensions: Extensions,
}

impl Application {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

/// The application configuration mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config(BTreeMap<String, Value>);

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Return a string value. Null and non-string values read as absent.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Return a boolean value, accepting boolean-like strings as set from
    /// the environment.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, NotABool> {
        let invalid = || NotABool {
            key: key.to_string(),
        };
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(0) => Ok(Some(false)),
                Some(1) => Ok(Some(true)),
                _ => Err(invalid()),
            },
            Some(Value::String(s)) => parse_bool(s).map(Some).ok_or_else(invalid),
            Some(_) => Err(invalid()),
        }
    }

    /// Merge config layers, where the `greater` layer takes precedence.
    pub fn merge(mut self, greater: Self) -> Self {
        self.0.extend(greater.0);
        self
    }
}

/// A config value that was expected to be a boolean.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("config key {key} is not a boolean")]
pub struct NotABool {
    pub key: String,
}

/// Parse a boolean-like string as set from the environment.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl<K, V> FromIterator<(K, V)> for Config
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A registry of named extensions.
#[derive(Default)]
pub struct Extensions {
    map: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
    /// Register an extension, returning whether a previous one was replaced.
    pub fn insert<T>(&mut self, key: &'static str, extension: T) -> bool
    where
        T: Any + Send + Sync,
    {
        self.map.insert(key, Box::new(extension)).is_some()
    }

    /// Look up an extension. `None` if the key is absent or holds another
    /// type.
    pub fn get<T>(&self, key: &str) -> Option<&T>
    where
        T: Any,
    {
        self.map.get(key).and_then(|ext| ext.downcast_ref::<T>())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.map.keys().collect();
        keys.sort();
        f.debug_struct("Extensions").field("keys", &keys).finish()
    }
}
