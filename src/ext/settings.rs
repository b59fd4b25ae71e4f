use crate::app::Config;
use crate::cloudflare::Credentials;
use crate::error::{Error, Result};

pub const AUTH_EMAIL_KEY: &str = "CLOUDFLARE_AUTH_EMAIL";
pub const AUTH_KEY_KEY: &str = "CLOUDFLARE_AUTH_KEY";
pub const REDIS_COMPATIBILITY_KEY: &str = "CLOUDFLARE_ENABLE_REDIS_COMPATIBILITY";
pub const STRICT_ATTRIBUTES_KEY: &str = "CLOUDFLARE_STRICT_ATTRIBUTES";

/// How by-name calls treat operations the client does not expose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingOperation {
    /// Log a warning and answer with `None`.
    #[default]
    Warn,
    /// Fail with [`Error::UnknownOperation`].
    Fail,
}

/// Extension settings read from the application config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub credentials: Credentials,
    pub enable_redis_compatibility: bool,
    pub missing_operation: MissingOperation,
}

impl Settings {
    /// Read the settings, failing if either credential is missing or blank.
    pub fn from_config(config: &Config) -> Result<Self> {
        let auth_email = non_blank(config, AUTH_EMAIL_KEY);
        let auth_key = non_blank(config, AUTH_KEY_KEY);
        let (auth_email, auth_key) = match (auth_email, auth_key) {
            (Some(email), Some(key)) => (email, key),
            (email, key) => {
                let mut keys = vec![];
                if email.is_none() {
                    keys.push(AUTH_EMAIL_KEY);
                }
                if key.is_none() {
                    keys.push(AUTH_KEY_KEY);
                }
                return Err(Error::MissingConfig { keys });
            }
        };

        let enable_redis_compatibility = flag(config, REDIS_COMPATIBILITY_KEY)?;
        let missing_operation = if flag(config, STRICT_ATTRIBUTES_KEY)? {
            MissingOperation::Fail
        } else {
            MissingOperation::Warn
        };

        Ok(Self {
            credentials: Credentials::new(auth_email, auth_key),
            enable_redis_compatibility,
            missing_operation,
        })
    }
}

fn non_blank<'a>(config: &'a Config, key: &str) -> Option<&'a str> {
    config.get_str(key).filter(|value| !value.trim().is_empty())
}

/// An optional boolean, defaulting to false.
fn flag(config: &Config, key: &'static str) -> Result<bool> {
    config
        .get_bool(key)
        .map(Option::unwrap_or_default)
        .map_err(|_| Error::InvalidConfig {
            key,
            expected: "a boolean",
        })
}
