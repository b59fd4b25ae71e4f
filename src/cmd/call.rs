use crate::io::encoding::OutputFormat;
use anyhow::{Context, Result};
use cfext::{CloudFlare, Operation};
use clap::Args;
use tracing::debug;

/// Call a client operation by name.
#[derive(Debug, Args)]
#[clap(name = "call")]
pub struct CallCmd {
    /// The operation name, e.g. `zones` or `kv_get`.
    #[clap(value_name = "operation", required_unless_present = "list")]
    pub operation: Option<String>,
    /// Positional arguments for the operation.
    #[clap(value_name = "arg")]
    pub args: Vec<String>,
    /// List the available operations instead.
    #[clap(long, conflicts_with = "operation")]
    pub list: bool,
}

impl CallCmd {
    #[tracing::instrument(level = "trace", skip(self, cloudflare))]
    pub async fn run(self, cloudflare: &CloudFlare, format: OutputFormat) -> Result<()> {
        if self.list {
            for op in Operation::ALL {
                println!("{op} ({} args)", op.arity());
            }
            return Ok(());
        }

        let operation = self.operation.context("no operation was provided")?;
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let result = cloudflare
            .invoke(&operation, &args)
            .await
            .with_context(|| format!("error calling '{operation}'"))?;
        match result {
            Some(value) => format.print(&value)?,
            None => debug!(operation, "no result"),
        }
        Ok(())
    }
}
