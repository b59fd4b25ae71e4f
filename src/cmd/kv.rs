use crate::io::encoding::OutputFormat;
use anyhow::{Context, Result};
use cfext::cloudflare::CloudflareApi;
use cfext::CloudFlare;
use clap::{Args, Subcommand};

/// The local name the account given on the command line is registered as.
const CLI_ACCOUNT: &str = "cli";

/// Manage Workers KV storage
#[derive(Debug, Args)]
#[clap(name = "kv")]
pub struct KvCmd {
    /// The Cloudflare account owning the namespaces.
    #[clap(long, env = "CLOUDFLARE_ACCOUNT_ID", value_name = "id")]
    pub account_id: String,
    #[clap(subcommand)]
    action: KvSubcommands,
}

#[derive(Clone, Debug, Subcommand)]
enum KvSubcommands {
    /// List namespaces
    Namespaces,
    /// Create a namespace
    Create {
        #[clap(value_name = "title")]
        title: String,
    },
    /// List the keys of a namespace
    Keys {
        #[clap(value_name = "namespace")]
        namespace: String,
    },
    /// Print a value
    Get {
        #[clap(value_name = "namespace")]
        namespace: String,
        #[clap(value_name = "key")]
        key: String,
    },
    /// Write a value
    Put {
        #[clap(value_name = "namespace")]
        namespace: String,
        #[clap(value_name = "key")]
        key: String,
        #[clap(value_name = "value")]
        value: String,
    },
    /// Delete a value
    Delete {
        #[clap(value_name = "namespace")]
        namespace: String,
        #[clap(value_name = "key")]
        key: String,
    },
}

impl KvCmd {
    #[tracing::instrument(level = "trace", skip(self, cloudflare))]
    pub async fn run(self, cloudflare: &CloudFlare, format: OutputFormat) -> Result<()> {
        cloudflare.register_account(&self.account_id, CLI_ACCOUNT)?;

        match self.action {
            KvSubcommands::Namespaces => {
                let namespaces = cloudflare
                    .kv_namespaces(CLI_ACCOUNT)
                    .await
                    .context("error listing namespaces")?;
                format.print(&namespaces)?;
            }
            KvSubcommands::Create { title } => {
                let namespace = cloudflare
                    .create_kv_namespace(CLI_ACCOUNT, &title)
                    .await
                    .context("error creating namespace")?;
                format.print(&namespace)?;
            }
            KvSubcommands::Keys { namespace } => {
                let keys = cloudflare
                    .kv_keys(CLI_ACCOUNT, &namespace)
                    .await
                    .context("error listing keys")?;
                format.print(&keys)?;
            }
            KvSubcommands::Get { namespace, key } => {
                match cloudflare
                    .kv_get(CLI_ACCOUNT, &namespace, &key)
                    .await
                    .with_context(|| format!("error reading '{key}'"))?
                {
                    Some(value) => println!("{}", String::from_utf8_lossy(&value)),
                    None => println!("(nil)"),
                }
            }
            KvSubcommands::Put {
                namespace,
                key,
                value,
            } => {
                cloudflare
                    .kv_put(CLI_ACCOUNT, &namespace, &key, value.into_bytes())
                    .await
                    .with_context(|| format!("error writing '{key}'"))?;
                println!("OK");
            }
            KvSubcommands::Delete { namespace, key } => {
                cloudflare
                    .kv_delete(CLI_ACCOUNT, &namespace, &key)
                    .await
                    .with_context(|| format!("error deleting '{key}'"))?;
                println!("OK");
            }
        }
        Ok(())
    }
}
