//! Commonly used imports and re-exports.
pub use crate::client::{
    ClientFactory, ClientOption, Endpoint, LegacyApi, Meta, ScwClient, ServerAvailabilities,
    ServerAvailability, fetch_server_availabilities, legacy_region,
};
pub use crate::config::*;
pub use crate::error::*;
pub use crate::locality::*;
pub use crate::logging;
pub use crate::transport::{
    ClientAdapter, HttpClient, LoggingTransport, RetryPolicy, RetryTransport, RetryableRequest,
    Transport, create_retryable_http_client,
};
