use crate::cli::{Cli, Commands, OutputFormat};
use crate::errors::Result;
use colored::Colorize;
use scaleway_provider::client::{ClientFactory, Meta};
use scaleway_provider::locality::Zone;
use scaleway_provider::config::{Config, ConfigResolver, ConfigStore, ExplicitConfig, ProviderSettings};
use serde::Serialize;
use tracing::debug;

const REDACTED: &str = "<redacted>";

/// Effective configuration as printed by the `config` command
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConfigReport {
    pub access_key: Option<String>,
    pub secret_key: Option<&'static str>,
    pub organization_id: Option<String>,
    pub region: Option<String>,
    pub zone: Option<String>,
    pub store_path: Option<String>,
    pub profile: Option<String>,
}

impl ConfigReport {
    pub fn new(config: &Config, store: &ConfigStore) -> Self {
        Self {
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.as_ref().map(|_| REDACTED),
            organization_id: config.default_organization_id.clone(),
            region: config.default_region.as_ref().map(ToString::to_string),
            zone: config.default_zone.as_ref().map(ToString::to_string),
            store_path: store.path().map(|path| path.display().to_string()),
            profile: store.profile().map(str::to_string),
        }
    }
}

/// Settings of the clients built by the `check` command
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CheckReport {
    pub api_url: String,
    pub organization_id: Option<String>,
    pub region: Option<String>,
    pub zone: Option<String>,
    pub authenticated: bool,
    pub legacy_region: String,
    pub legacy_compute_url: String,
    pub availability_prefetched: bool,
}

/// Run the selected command
pub async fn run(cli: &Cli, store: &ConfigStore, settings: &ProviderSettings) -> Result<()> {
    let explicit = ExplicitConfig::from(&cli.credentials);
    let config = ConfigResolver::new(store).resolve(&explicit);
    debug!(config = ?config, "configuration resolved");

    match &cli.command {
        Commands::Config => {
            let report = ConfigReport::new(&config, store);
            print_report(cli.output, "Effective configuration", &report)
        }
        Commands::Check { no_prefetch } => {
            let report = check(&config, settings, !no_prefetch).await?;
            print_report(cli.output, "Clients ready", &report)
        }
    }
}

/// Build both clients from `config`
pub async fn check(
    config: &Config,
    settings: &ProviderSettings,
    prefetch: bool,
) -> Result<CheckReport> {
    check_with(ClientFactory::new(config, settings).with_prefetch(prefetch)).await
}

/// Build both clients with `factory` and describe them
pub async fn check_with(factory: ClientFactory<'_>) -> Result<CheckReport> {
    let meta = factory.meta().await?;
    Ok(CheckReport::new(&meta))
}

impl CheckReport {
    pub fn new(meta: &Meta) -> Self {
        let client = meta.client();
        let legacy = meta.legacy_client();
        let availability_prefetched = Zone::known()
            .iter()
            .all(|zone| client.server_availabilities(zone).is_some());

        Self {
            api_url: client.api_url().to_string(),
            organization_id: client.default_organization_id().map(str::to_string),
            region: client.default_region().map(ToString::to_string),
            zone: client.default_zone().map(ToString::to_string),
            authenticated: client.secret_key().is_some(),
            legacy_region: legacy.region().to_string(),
            legacy_compute_url: legacy.compute_url().to_string(),
            availability_prefetched,
        }
    }
}

fn print_report<T: Serialize>(format: OutputFormat, title: &str, report: &T) -> Result<()> {
    let value = serde_json::to_value(report)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFormat::Pretty => {
            println!("{}", title.bold().green());
            if let serde_json::Value::Object(fields) = value {
                for (key, field) in fields {
                    let rendered = match field {
                        serde_json::Value::Null => "-".dimmed().to_string(),
                        serde_json::Value::String(text) => text,
                        other => other.to_string(),
                    };
                    println!("  {:<24} {}", key.cyan(), rendered);
                }
            }
        }
    }
    Ok(())
}
