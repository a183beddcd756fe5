//! Error types
use reqwest::StatusCode;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while sending a single HTTP request
#[derive(Debug, Error)]
pub enum TransportError {
    /// Error reported by the HTTP client
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Connection level failure without a response
    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),
    /// Request cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,
    /// Request could not be rebuilt for sending
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors produced by the SDK clients
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid region: {0:?}")]
    InvalidRegion(String),

    #[error("Invalid zone: {0:?}")]
    InvalidZone(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("API error: HTTP {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// SDK generation a client error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Current,
    Legacy,
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientKind::Current => write!(f, "SDK"),
            ClientKind::Legacy => write!(f, "deprecated"),
        }
    }
}

/// Configuration errors, raised before any resource operation runs
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `scw` configuration file exists but cannot be loaded
    #[error("cannot load configuration from {}: {source}", .path.display())]
    StoreLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// One of the SDK clients could not be constructed
    #[error("cannot create {which} client: {source}")]
    Client {
        which: ClientKind,
        #[source]
        source: ClientError,
    },

    /// Provider settings or logging setup error
    #[error("Settings error: {0}")]
    Settings(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Settings(err.to_string())
    }
}

impl From<std::env::VarError> for ConfigError {
    fn from(err: std::env::VarError) -> Self {
        ConfigError::Settings(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Settings(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
