// Clippy
#![deny(clippy::unwrap_used)] // use context/with_context
#![deny(clippy::expect_used)] // use context/with_context
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use anyhow::{Context, Result};
use cfext::cloudflare::Client;
use cfext::config::ConfigOpts;
use cfext::{Application, CloudFlare};
use clap::{Parser, Subcommand};
use io::encoding::OutputFormat;
use std::path::PathBuf;
use tracing::{error, Level};
use tracing_subscriber::prelude::*;
mod cmd;
mod io;

/// Cloudflare API command line utility
#[derive(Parser, Debug)]
#[clap(about, author, version, name = "cfext")]
struct Args {
    #[clap(subcommand)]
    action: Subcommands,
    /// A config file to use. [default: $XDG_CONFIG_HOME/cfext/config.toml]
    #[clap(short, long, env = "CFEXT_CONFIG", value_name = "file")]
    pub config: Option<PathBuf>,
    /// Enable verbose logging.
    #[clap(short)]
    pub v: bool,
    /// The output format of results.
    #[clap(short, long, value_enum, default_value = "json")]
    pub output: OutputFormat,
    #[clap(flatten)]
    pub cfg: ConfigOpts,
}

impl Args {
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn run(self) -> Result<()> {
        // Apply CLI configuration layering
        let toml_cfg = ConfigOpts::from_file(self.config.clone())?;
        let env_cfg = ConfigOpts::from_env()?;
        let opts = ConfigOpts::default()
            .merge(toml_cfg)
            .merge(env_cfg)
            .merge(self.cfg);

        let output = self.output;
        let cloudflare = |opts: ConfigOpts| -> Result<CloudFlare> {
            let app = init(opts)?;
            CloudFlare::from_app(&app)
                .context("the cloudflare extension was not registered on the app")
        };
        match self.action {
            Subcommands::Config(inner) => inner.run(opts, self.config).await,
            Subcommands::Verify(inner) => inner.run(&cloudflare(opts)?).await,
            Subcommands::List(inner) => inner.run(&cloudflare(opts)?, output).await,
            Subcommands::Kv(inner) => inner.run(&cloudflare(opts)?, output).await,
            Subcommands::Call(inner) => inner.run(&cloudflare(opts)?, output).await,
        }
    }
}

/// Build the host application from the merged options with the extension
/// registered on it.
fn init(opts: ConfigOpts) -> Result<Application> {
    let mut app = Application::new("cfext").with_config(opts.into());
    CloudFlare::<Client>::new(Some(&mut app)).context(
        "error initializing the cloudflare extension, need help? see `cfext config show`",
    )?;
    Ok(app)
}

#[derive(Subcommand, Debug)]
enum Subcommands {
    Config(cmd::ConfigCmd),
    Verify(cmd::VerifyCmd),
    List(cmd::ListCmd),
    Kv(cmd::KvCmd),
    Call(cmd::CallCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    #[cfg(windows)]
    if let Err(err) = ansi_term::enable_ansi_support() {
        eprintln!("error enabling ANSI support: {:?}", err);
    }

    // Filter spans based on the RUST_LOG env var or -v flag.
    let (verbose, log_filter) =
        match tracing_subscriber::EnvFilter::try_from_default_env() {
            Ok(filter) => {
                let verbose = filter
                    .max_level_hint()
                    .is_some_and(|f| f >= Level::DEBUG);
                (verbose, filter)
            }
            Err(_) => (
                args.v,
                tracing_subscriber::EnvFilter::new(if args.v {
                    "info,cfext=trace"
                } else {
                    "info"
                }),
            ),
        };

    // Enable tracing/logging
    tracing_subscriber::registry()
        .with(log_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        // Install this registry as the global tracing registry.
        .try_init()
        .context("error initializing logging")?;

    if let Err(err) = args.run().await {
        if verbose {
            error!("{err:?}");
        } else {
            error!(
                "{err}\n\nEnable verbose logging (-v) for the full stack trace."
            );
        }
        std::process::exit(1);
    }
    Ok(())
}
