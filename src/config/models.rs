use crate::app::{parse_bool, Config};
use crate::config::{default_config_path, ENV_PREFIX};
use crate::ext::{
    AUTH_EMAIL_KEY, AUTH_KEY_KEY, REDIS_COMPATIBILITY_KEY, STRICT_ATTRIBUTES_KEY,
};
use anyhow::{Context, Result};
use clap::Args;
use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// A model of all potential configuration options for the CLI system.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Args)]
pub struct ConfigOpts {
    /// The email address of your Cloudflare account.
    #[clap(long, value_name = "email")]
    pub auth_email: Option<String>,
    /// Your Cloudflare global API key.
    #[clap(long, value_name = "key")]
    pub auth_key: Option<String>,
    /// Read missing KV keys as empty rather than failing.
    #[clap(long = "redis-compat", value_name = "bool")]
    #[serde(default, deserialize_with = "de_flag")]
    pub enable_redis_compatibility: Option<bool>,
    /// Fail on unknown operation names rather than printing nothing.
    #[clap(long = "strict", value_name = "bool")]
    #[serde(default, deserialize_with = "de_flag")]
    pub strict_attributes: Option<bool>,
}

impl ConfigOpts {
    /// Read runtime config from a target path. A missing file at the default
    /// location is not an error, a missing file given explicitly is.
    pub fn from_file(path: Option<PathBuf>) -> Result<Self> {
        let explicit = path.is_some();
        let Some(mut cfg_path) = path.or_else(default_config_path) else {
            return Ok(Default::default());
        };
        if !cfg_path.exists() {
            anyhow::ensure!(!explicit, "config file {:?} does not exist", cfg_path);
            return Ok(Default::default());
        }
        if !cfg_path.is_absolute() {
            cfg_path = cfg_path.canonicalize().with_context(|| {
                format!("could not canonicalize path to config file {:?}", &cfg_path)
            })?;
        }
        let cfg_str = std::fs::read_to_string(&cfg_path).context("reading config file")?;
        let cfg: Self =
            toml::from_str(&cfg_str).context("reading config file contents as TOML data")?;
        Ok(cfg)
    }

    /// Read runtime config from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Self>(vars)
            .context("reading env var config")
    }

    /// Merge config layers, where the `greater` layer takes precedence.
    pub fn merge(self, mut greater: Self) -> Self {
        greater.auth_email = greater.auth_email.or(self.auth_email);
        greater.auth_key = greater.auth_key.or(self.auth_key);
        greater.enable_redis_compatibility = greater
            .enable_redis_compatibility
            .or(self.enable_redis_compatibility);
        greater.strict_attributes = greater.strict_attributes.or(self.strict_attributes);
        greater
    }
}

/// A flag given as a TOML boolean or as a boolean-like string, such as
/// `1` or `on` from the environment.
fn de_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(b)) => Ok(Some(b)),
        Some(Flag::Text(s)) => parse_bool(&s).map(Some).ok_or_else(|| {
            D::Error::invalid_value(Unexpected::Str(&s), &"a boolean such as true, 1 or on")
        }),
    }
}

impl From<ConfigOpts> for Config {
    /// Set only the keys that have a value.
    fn from(opts: ConfigOpts) -> Self {
        let mut config = Config::new();
        if let Some(email) = opts.auth_email {
            config.insert(AUTH_EMAIL_KEY, email);
        }
        if let Some(key) = opts.auth_key {
            config.insert(AUTH_KEY_KEY, key);
        }
        if let Some(redis) = opts.enable_redis_compatibility {
            config.insert(REDIS_COMPATIBILITY_KEY, redis);
        }
        if let Some(strict) = opts.strict_attributes {
            config.insert(STRICT_ATTRIBUTES_KEY, strict);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn merge_prefers_greater_layer_per_field() {
        let file = ConfigOpts {
            auth_email: Some("file@example.com".into()),
            auth_key: Some("file-key".into()),
            enable_redis_compatibility: Some(true),
            strict_attributes: None,
        };
        let cli = ConfigOpts {
            auth_key: Some("cli-key".into()),
            ..Default::default()
        };
        let merged = ConfigOpts::default().merge(file).merge(cli);
        assert_eq!(merged.auth_email.as_deref(), Some("file@example.com"));
        assert_eq!(merged.auth_key.as_deref(), Some("cli-key"));
        assert_eq!(merged.enable_redis_compatibility, Some(true));
        assert_eq!(merged.strict_attributes, None);
    }

    #[test]
    fn reads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "auth_email = \"user@example.com\"\nauth_key = \"secret\"\nenable_redis_compatibility = true"
        )
        .unwrap();
        let opts = ConfigOpts::from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(opts.auth_email.as_deref(), Some("user@example.com"));
        assert_eq!(opts.enable_redis_compatibility, Some(true));
    }

    #[test]
    fn env_flags_accept_boolean_like_strings() {
        let opts = ConfigOpts::from_vars(vec![
            ("CLOUDFLARE_AUTH_EMAIL".to_string(), "user@example.com".to_string()),
            ("CLOUDFLARE_ENABLE_REDIS_COMPATIBILITY".to_string(), "1".to_string()),
            ("CLOUDFLARE_STRICT_ATTRIBUTES".to_string(), "off".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ])
        .unwrap();
        assert_eq!(opts.auth_email.as_deref(), Some("user@example.com"));
        assert_eq!(opts.enable_redis_compatibility, Some(true));
        assert_eq!(opts.strict_attributes, Some(false));
    }

    #[test]
    fn env_flags_reject_nonsense() {
        let err = ConfigOpts::from_vars(vec![(
            "CLOUDFLARE_ENABLE_REDIS_COMPATIBILITY".to_string(),
            "perhaps".to_string(),
        )])
        .unwrap_err();
        assert!(format!("{err:#}").contains("perhaps"));
    }

    #[test]
    fn unset_env_flags_stay_unset() {
        let opts = ConfigOpts::from_vars(Vec::new()).unwrap();
        assert_eq!(opts, ConfigOpts::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(ConfigOpts::from_file(Some(missing)).is_err());
    }

    #[test]
    fn converts_to_app_config_keys() {
        let config = Config::from(ConfigOpts {
            auth_email: Some("user@example.com".into()),
            auth_key: Some("secret".into()),
            enable_redis_compatibility: None,
            strict_attributes: Some(true),
        });
        assert_eq!(config.get_str(AUTH_EMAIL_KEY), Some("user@example.com"));
        assert_eq!(config.get_str(AUTH_KEY_KEY), Some("secret"));
        assert!(config.get(REDIS_COMPATIBILITY_KEY).is_none());
        assert_eq!(config.get_bool(STRICT_ATTRIBUTES_KEY), Ok(Some(true)));
    }
}
