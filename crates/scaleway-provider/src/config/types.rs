use once_cell::sync::Lazy;
use serde::{self, Deserialize, Serialize};
use std::borrow::Cow;

/// Environment variable holding the path of the provider settings file
pub static SETTINGS_PATH: &str = "SCALEWAY_PROVIDER_SETTINGS";
pub static SETTINGS: Lazy<ProviderSettings> = Lazy::new(ProviderSettings::new);

/// Provider settings file
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ProviderSettings {
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Network configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct NetworkSettings {
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Pool idle timeout in seconds
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,
    /// Maximum number of idle connections per host
    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: Cow<'static, str>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            max_idle_connections: default_max_idle_connections(),
            user_agent: default_user_agent(),
        }
    }
}

/// Retry policy overrides
///
/// The defaults match the API rate-limit window, which is minutes long.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_min_wait_secs")]
    pub min_wait_secs: u64,
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            min_wait_secs: default_min_wait_secs(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

/// Log output format
#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Full,
    Json,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct LoggingSettings {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_ansi")]
    pub ansi: bool,
    #[serde(default = "default_filter_default")]
    pub filter_default: Cow<'static, str>,
    #[serde(default = "default_filter_self_directive")]
    pub filter_self_directive: Cow<'static, str>,
    #[serde(default = "default_directives")]
    pub directives: Vec<Cow<'static, str>>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            ansi: default_ansi(),
            filter_default: default_filter_default(),
            filter_self_directive: default_filter_self_directive(),
            directives: default_directives(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_pool_idle_timeout_secs() -> u64 {
    90
}
fn default_max_idle_connections() -> usize {
    10
}
fn default_user_agent() -> Cow<'static, str> {
    Cow::Borrowed(concat!("scaleway-provider/", env!("CARGO_PKG_VERSION")))
}
fn default_max_retries() -> usize {
    3
}
fn default_min_wait_secs() -> u64 {
    60
}
fn default_max_wait_secs() -> u64 {
    120
}
fn default_ansi() -> bool {
    true
}
fn default_filter_default() -> Cow<'static, str> {
    Cow::Borrowed("info")
}
fn default_filter_self_directive() -> Cow<'static, str> {
    Cow::Borrowed("info")
}
fn default_directives() -> Vec<Cow<'static, str>> {
    vec![Cow::Borrowed("hyper=info"), Cow::Borrowed("reqwest=info")]
}
