//! Log subscriber setup
use crate::SERVICE_NAME;
use crate::config::{LogFormat, LoggingSettings};
use crate::error::ConfigError;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

impl From<ParseError> for ConfigError {
    fn from(err: ParseError) -> Self {
        ConfigError::Settings(format!("invalid log directive: {err}"))
    }
}

/// Create the filter of the fmt layer
pub fn fmt_filter(settings: &LoggingSettings) -> Result<EnvFilter, ConfigError> {
    let mut filter = EnvFilter::new(settings.filter_default.as_ref()).add_directive(
        format!("{}={}", SERVICE_NAME, settings.filter_self_directive).parse()?,
    );
    for directive in &settings.directives {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

/// Install the global subscriber, writing to stderr
///
/// ## Errors
/// - `ConfigError::Settings` - invalid directive or a subscriber is already installed
pub fn init(settings: &LoggingSettings) -> Result<(), ConfigError> {
    let registry = tracing_subscriber::registry();
    let result = match settings.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_filter(fmt_filter(settings)?),
            )
            .try_init(),
        LogFormat::Full => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(settings.ansi)
                    .with_writer(std::io::stderr)
                    .with_thread_names(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_filter(fmt_filter(settings)?),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(settings.ansi)
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_filter(fmt_filter(settings)?),
            )
            .try_init(),
    };
    result.map_err(|err| ConfigError::Settings(err.to_string()))
}
