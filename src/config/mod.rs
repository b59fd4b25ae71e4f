//! CLI config.
//!
//! The CLI takes the typical layered configuration approach. There are 3
//! layers. The config file is the base, which is then superseded by
//! environment variables, which are finally superseded by CLI arguments and
//! options. The merged options become the host application's config.

/// The file name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// The prefix of environment variables read into configuration.
pub const ENV_PREFIX: &str = "CLOUDFLARE_";

mod display;
pub mod models;

pub use models::ConfigOpts;

/// The default location of the config file,
/// `$XDG_CONFIG_HOME/cfext/config.toml` on Linux.
pub fn default_config_path() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("", "", "cfext")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
