use anyhow::Result;
use cfext::config::{default_config_path, ConfigOpts};
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Configuration controls
#[derive(Debug, Args)]
#[clap(name = "config")]
pub struct ConfigCmd {
    #[clap(subcommand)]
    action: ConfigSubcommands,
}

#[derive(Clone, Debug, Subcommand)]
enum ConfigSubcommands {
    /// Show the merged configuration.
    Show,
}

impl ConfigCmd {
    #[tracing::instrument(level = "trace", skip(self, opts))]
    pub async fn run(self, opts: ConfigOpts, path: Option<PathBuf>) -> Result<()> {
        match self.action {
            ConfigSubcommands::Show => {
                let path = path.or_else(default_config_path);
                match path {
                    Some(path) => println!("Config file: {}", path.display()),
                    None => println!("Config file: None"),
                }
                println!("{opts}");
            }
        }
        Ok(())
    }
}
