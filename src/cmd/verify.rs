use anyhow::{Context, Result};
use cfext::cloudflare::CloudflareApi;
use cfext::CloudFlare;
use clap::Args;
use tracing::info;

/// Verify authentication to Cloudflare.
#[derive(Debug, Args)]
#[clap(name = "verify")]
pub struct VerifyCmd {}

impl VerifyCmd {
    #[tracing::instrument(level = "trace", skip(self, cloudflare))]
    pub async fn run(self, cloudflare: &CloudFlare) -> Result<()> {
        info!("Verifying...");
        let user = cloudflare
            .user()
            .await
            .context("error verifying API credentials")?;
        println!("Credentials are valid for {}.", user.email);
        Ok(())
    }
}
