use crate::io::encoding::OutputFormat;
use anyhow::{Context, Result};
use cfext::cloudflare::models::{Record, Zone};
use cfext::cloudflare::CloudflareApi;
use cfext::CloudFlare;
use clap::{Args, Subcommand};
use regex::Regex;

/// List Cloudflare resources
#[derive(Debug, Args)]
#[clap(name = "list")]
pub struct ListCmd {
    #[clap(subcommand)]
    action: Option<ListSubcommands>,
    #[clap(flatten)]
    pub filters: ListFilters,
}

#[derive(Clone, Debug, Subcommand)]
enum ListSubcommands {
    /// Show zones (domains, subdomains, and identities)
    Zones,
    /// Show DNS records
    Records(RecordArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RecordArgs {
    /// Print records belonging to a single zone, by name or ID
    #[clap(short, long)]
    pub zone: Option<String>,
}

/// Regex filters applied to listings.
#[derive(Clone, Debug, Default, Args)]
pub struct ListFilters {
    /// Include cloudflare zones by regex [default: all]
    #[clap(long, value_name = "pattern")]
    pub include_zones: Vec<String>,
    /// Ignore cloudflare zones by regex [default: none]
    #[clap(long, value_name = "pattern")]
    pub ignore_zones: Vec<String>,
    /// Include cloudflare zone records by regex [default: all]
    #[clap(long, value_name = "pattern")]
    pub include_records: Vec<String>,
    /// Ignore cloudflare zone records by regex [default: none]
    #[clap(long, value_name = "pattern")]
    pub ignore_records: Vec<String>,
}

impl ListCmd {
    #[tracing::instrument(level = "trace", skip(self, cloudflare))]
    pub async fn run(self, cloudflare: &CloudFlare, format: OutputFormat) -> Result<()> {
        let mut zones = cloudflare.zones().await.context("error listing zones")?;
        filter_zones(&mut zones, &self.filters)?;

        match self.action {
            Some(ListSubcommands::Zones) => format.print(&zones)?,
            Some(ListSubcommands::Records(args)) => {
                if let Some(zone) = args.zone {
                    zones.retain(|z| z.name == zone || z.id == zone);
                    anyhow::ensure!(!zones.is_empty(), "no results with that zone filter");
                }
                let records = collect_records(cloudflare, &zones, &self.filters).await?;
                format.print(&records)?;
            }
            None => {
                let records = collect_records(cloudflare, &zones, &self.filters).await?;
                format.print(&serde_json::json!({
                    "zones": zones,
                    "records": records,
                }))?;
            }
        }
        Ok(())
    }
}

async fn collect_records(
    cloudflare: &CloudFlare,
    zones: &[Zone],
    filters: &ListFilters,
) -> Result<Vec<Record>> {
    let mut records = vec![];
    for zone in zones {
        records.extend(
            cloudflare
                .records(&zone.id)
                .await
                .with_context(|| format!("error listing records of {}", zone.name))?,
        );
    }
    filter_records(&mut records, filters)?;
    Ok(records)
}

fn compile(patterns: &[String], what: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).with_context(|| format!("error compiling {what} regex filter"))
        })
        .collect()
}

fn filter_zones(zones: &mut Vec<Zone>, filters: &ListFilters) -> Result<()> {
    for pattern in compile(&filters.include_zones, "include_zones")? {
        zones.retain(|z| pattern.is_match(&z.id) || pattern.is_match(&z.name));
    }
    for pattern in compile(&filters.ignore_zones, "ignore_zones")? {
        zones.retain(|z| !pattern.is_match(&z.id) && !pattern.is_match(&z.name));
    }
    Ok(())
}

fn filter_records(records: &mut Vec<Record>, filters: &ListFilters) -> Result<()> {
    for pattern in compile(&filters.include_records, "include_records")? {
        records.retain(|r| pattern.is_match(&r.id) || pattern.is_match(&r.name));
    }
    for pattern in compile(&filters.ignore_records, "ignore_records")? {
        records.retain(|r| !pattern.is_match(&r.id) && !pattern.is_match(&r.name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: &str, name: &str) -> Zone {
        Zone {
            id: id.into(),
            name: name.into(),
            status: "active".into(),
            permissions: vec![],
            modified_on: None,
        }
    }

    fn record(id: &str, name: &str) -> Record {
        Record {
            id: id.into(),
            zone_id: None,
            zone_name: None,
            name: name.into(),
            record_type: "A".into(),
            content: "198.51.100.4".into(),
            proxied: None,
            ttl: None,
            locked: false,
        }
    }

    #[test]
    fn zone_filters_match_id_or_name() {
        let mut zones = vec![
            zone("z1", "example.com"),
            zone("z2", "example.org"),
            zone("z3", "imbleau.com"),
        ];
        let filters = ListFilters {
            include_zones: vec![r"\.com$".into()],
            ignore_zones: vec!["^z3$".into()],
            ..Default::default()
        };
        filter_zones(&mut zones, &filters).unwrap();
        assert_eq!(zones, vec![zone("z1", "example.com")]);
    }

    #[test]
    fn record_filters_apply_in_sequence() {
        let mut records = vec![
            record("r1", "www.example.com"),
            record("r2", "api.example.com"),
            record("r3", "www.example.org"),
        ];
        let filters = ListFilters {
            include_records: vec!["^www".into(), "example".into()],
            ignore_records: vec!["org$".into()],
            ..Default::default()
        };
        filter_records(&mut records, &filters).unwrap();
        assert_eq!(records, vec![record("r1", "www.example.com")]);
    }

    #[test]
    fn bad_pattern_is_an_error() {
        let mut zones = vec![zone("z1", "example.com")];
        let filters = ListFilters {
            include_zones: vec!["(".into()],
            ..Default::default()
        };
        let err = filter_zones(&mut zones, &filters).unwrap_err();
        assert!(err.to_string().contains("include_zones"));
    }
}
