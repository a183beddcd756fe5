use scaleway_provider::error::ConfigError;
use std::fmt;

pub static CONFIG_ERROR: &str = "Configuration Error: ";
pub static CLIENT_ERROR: &str = "Client Error: ";
pub static OUTPUT_ERROR: &str = "Output Error: ";

/// Errors reported by the CLI
#[derive(Debug)]
pub enum CliError {
    /// Settings or `scw` configuration cannot be loaded
    Config(ConfigError),
    /// One of the API clients cannot be built
    Client(ConfigError),
    /// Result cannot be rendered
    Output(String),
}

pub type Result<T> = std::result::Result<T, CliError>;

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Client { .. } => CliError::Client(error),
            other => CliError::Config(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::Output(format!("JSON error: {error}"))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(err) => write!(f, "{CONFIG_ERROR}{err}"),
            CliError::Client(err) => write!(f, "{CLIENT_ERROR}{err}"),
            CliError::Output(err) => write!(f, "{OUTPUT_ERROR}{err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(err) | CliError::Client(err) => Some(err),
            CliError::Output(_) => None,
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => exitcode::CONFIG,
            CliError::Client(_) => exitcode::UNAVAILABLE,
            CliError::Output(_) => exitcode::SOFTWARE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaleway_provider::error::{ClientError, ClientKind};
    use std::path::PathBuf;

    #[test]
    fn test_cli_error_display_and_exit_code() {
        let config_err = CliError::from(ConfigError::StoreLoad {
            path: PathBuf::from("/tmp/config.yaml"),
            source: "bad yaml".into(),
        });
        assert!(config_err.to_string().starts_with(CONFIG_ERROR));
        assert!(config_err.to_string().contains("/tmp/config.yaml"));
        assert_eq!(config_err.exit_code(), exitcode::CONFIG);

        let client_err = CliError::from(ConfigError::Client {
            which: ClientKind::Legacy,
            source: ClientError::InvalidRegion("waw1".to_string()),
        });
        assert!(client_err.to_string().contains("cannot create deprecated client"));
        assert_eq!(client_err.exit_code(), exitcode::UNAVAILABLE);

        let output_err = CliError::Output("boom".to_string());
        assert_eq!(output_err.to_string(), "Output Error: boom");
        assert_eq!(output_err.exit_code(), exitcode::SOFTWARE);
    }

    #[test]
    fn test_settings_error_is_config() {
        let err = CliError::from(ConfigError::Settings("invalid".to_string()));
        assert!(matches!(err, CliError::Config(_)));
    }
}
