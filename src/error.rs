use crate::cloudflare::models::CloudflareError;
use thiserror::Error;

/// A specialized result type for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the extension and the wrapped Cloudflare client.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more mandatory configuration keys were not set.
    #[error("missing Cloudflare configuration, set {} in the app config", .keys.join(" and "))]
    MissingConfig { keys: Vec<&'static str> },

    /// A configuration key was set to a value of the wrong shape.
    #[error("invalid value for config key {key}: expected {expected}")]
    InvalidConfig {
        key: &'static str,
        expected: &'static str,
    },

    #[error("the Cloudflare extension was used before init_app")]
    NotInitialized,

    #[error("the Cloudflare extension is already initialized")]
    AlreadyInitialized,

    /// A by-name call named an operation the client does not expose.
    #[error("operation '{0}' was not found on the Cloudflare client")]
    UnknownOperation(String),

    #[error("operation '{operation}' expects {expected} argument(s), got {got}")]
    InvalidArguments {
        operation: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("no account registered under the name '{0}'")]
    UnknownAccount(String),

    #[error("key '{0}' not found")]
    KeyNotFound(String),

    /// Cloudflare answered with `success: false`.
    #[error("unsuccessful cloudflare status: {}", format_api_errors(.0))]
    Api(Vec<CloudflareError>),

    #[error("error sending HTTP request")]
    Http(#[from] reqwest::Error),

    #[error("error deserializing cloudflare payload")]
    Decode(#[from] serde_json::Error),
}

fn format_api_errors(errors: &[CloudflareError]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
