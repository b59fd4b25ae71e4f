use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// How command results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Serialize an object in this format.
    pub fn render<T>(self, contents: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        match self {
            OutputFormat::Json => as_json(contents),
            OutputFormat::Yaml => as_yaml(contents),
        }
    }

    /// Print an object to stdout in this format.
    pub fn print<T>(self, contents: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        println!("{}", self.render(contents)?.trim_end());
        Ok(())
    }
}

/// Serialize an object to pretty JSON.
pub fn as_json<T>(contents: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    serde_json::to_string_pretty(contents).context("encoding as JSON")
}

/// Serialize an object to YAML.
pub fn as_yaml<T>(contents: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    serde_yaml::to_string(contents).context("encoding as YAML")
}
