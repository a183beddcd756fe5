use clap::{Args, Parser, Subcommand, ValueEnum};
use scaleway_provider::config::ExplicitConfig;
use std::path::PathBuf;

/// Command line interface of the Scaleway provider core
#[derive(Parser, Debug)]
#[command(
    name = "scaleway-provider-cli",
    version,
    about = "Resolve Scaleway provider credentials and build its API clients"
)]
pub struct Cli {
    /// Provider settings file (TOML), overrides $SCALEWAY_PROVIDER_SETTINGS
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Log this crate's activity at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the effective configuration
    Config,
    /// Build both API clients and report their settings
    Check {
        /// Skip the server availability prefetch
        #[arg(long)]
        no_prefetch: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// Values that take precedence over every other configuration source
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialArgs {
    #[arg(long, global = true)]
    pub access_key: Option<String>,
    #[arg(long, global = true)]
    pub secret_key: Option<String>,
    #[arg(long, global = true)]
    pub organization_id: Option<String>,
    #[arg(long, global = true)]
    pub region: Option<String>,
    #[arg(long, global = true)]
    pub zone: Option<String>,
    /// Deprecated, use --secret-key
    #[arg(long, global = true, hide = true)]
    pub token: Option<String>,
    /// Deprecated, use --organization-id
    #[arg(long, global = true, hide = true)]
    pub organization: Option<String>,
}

impl From<&CredentialArgs> for ExplicitConfig {
    fn from(args: &CredentialArgs) -> Self {
        Self {
            access_key: args.access_key.clone(),
            secret_key: args.secret_key.clone(),
            organization_id: args.organization_id.clone(),
            region: args.region.clone(),
            zone: args.zone.clone(),
            token: args.token.clone(),
            organization: args.organization.clone(),
        }
    }
}
