//! SDK clients and the [`Meta`] handle passed to every resource
pub mod availability;
pub mod current;
pub mod legacy;

use crate::config::{Config, ProviderSettings};
use crate::error::{ClientError, ClientKind, ConfigError, Result, TransportError};
use crate::locality::{Region, Zone};
use crate::transport::{HttpClient, create_retryable_http_client};
use reqwest::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

pub use availability::{ServerAvailabilities, ServerAvailability, fetch_server_availabilities};
pub use current::{ClientOption, ScwClient};
pub use legacy::{Endpoint, LegacyApi};

/// Header carrying the secret key
pub const AUTH_HEADER: &str = "X-Auth-Token";
pub const DEFAULT_USER_AGENT: &str = concat!("scaleway-provider/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Decode a JSON response, turning non-success statuses into [`ClientError::Api`]
pub(crate) async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await.map_err(TransportError::from)?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ApiErrorBody>(&body)
            .map(|error| error.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        return Err(ClientError::Api { status, message });
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Short region code of the deprecated API for a region/zone pair
///
/// `nl-ams` wins over `fr-par` when both match. Unknown localities map to an
/// empty code, which the deprecated client treats as its default region.
pub fn legacy_region(region: Option<&Region>, zone: Option<&Zone>) -> &'static str {
    let mut code = "";
    if region == Some(&Region::FR_PAR) || zone == Some(&Zone::FR_PAR_1) {
        code = legacy::PAR1;
    }
    if region == Some(&Region::NL_AMS) || zone == Some(&Zone::NL_AMS_1) {
        code = legacy::AMS1;
    }
    if code.is_empty() {
        warn!(
            region = ?region.map(Region::as_str),
            zone = ?zone.map(Zone::as_str),
            "no deprecated API region for this locality, using its default"
        );
    }
    code
}

type HttpClientBuilder<'a> =
    Box<dyn Fn() -> std::result::Result<Arc<dyn HttpClient>, TransportError> + Send + Sync + 'a>;

/// Builds both SDK clients from an effective [`Config`]
pub struct ClientFactory<'a> {
    config: &'a Config,
    settings: &'a ProviderSettings,
    make_http_client: HttpClientBuilder<'a>,
    prefetch: bool,
}

impl<'a> ClientFactory<'a> {
    /// Each client gets its own retrying HTTP client built from `settings`
    pub fn new(config: &'a Config, settings: &'a ProviderSettings) -> Self {
        Self {
            config,
            settings,
            make_http_client: Box::new(move || {
                let client = create_retryable_http_client(settings)?;
                Ok(Arc::new(client) as Arc<dyn HttpClient>)
            }),
            prefetch: true,
        }
    }

    /// Replace the HTTP client builder
    pub fn with_http_client<F>(mut self, make: F) -> Self
    where
        F: Fn() -> std::result::Result<Arc<dyn HttpClient>, TransportError> + Send + Sync + 'a,
    {
        self.make_http_client = Box::new(make);
        self
    }

    /// Enable or disable the server availability prefetch of [`meta`](Self::meta)
    pub fn with_prefetch(mut self, prefetch: bool) -> Self {
        self.prefetch = prefetch;
        self
    }

    /// Build the current generation client
    ///
    /// ## Errors
    /// - any [`ClientError`] raised while validating the configuration
    pub fn client(&self) -> Result<ScwClient> {
        let config = self.config;
        let mut options = vec![
            ClientOption::HttpClient((self.make_http_client)()?),
            ClientOption::UserAgent(self.settings.network.user_agent.to_string()),
        ];

        if let Some(secret_key) = non_empty(config.secret_key.as_deref()) {
            options.push(ClientOption::Auth {
                access_key: config.access_key.clone().unwrap_or_default(),
                secret_key: secret_key.to_string(),
            });
        }
        if let Some(organization_id) = non_empty(config.default_organization_id.as_deref()) {
            options.push(ClientOption::DefaultOrganizationId(organization_id.to_string()));
        }
        if let Some(region) = config.default_region.as_ref().filter(|r| !r.as_str().is_empty()) {
            options.push(ClientOption::DefaultRegion(region.clone()));
        }
        if let Some(zone) = config.default_zone.as_ref().filter(|z| !z.as_str().is_empty()) {
            options.push(ClientOption::DefaultZone(zone.clone()));
        }

        ScwClient::new(options)
    }

    /// Build the deprecated generation client
    ///
    /// ## Errors
    /// - `ClientError::InvalidRegion` - mapped region rejected by the client
    /// - `ClientError::Transport` - HTTP client cannot be built
    pub fn legacy_client(&self) -> Result<LegacyApi> {
        let config = self.config;
        let region = legacy_region(config.default_region.as_ref(), config.default_zone.as_ref());
        let http_client = (self.make_http_client)()?;
        let user_agent = self.settings.network.user_agent.to_string();

        LegacyApi::new(
            config.default_organization_id.clone().unwrap_or_default(),
            config.secret_key.clone().unwrap_or_default(),
            region,
            |api| {
                api.set_http_client(http_client);
                api.set_user_agent(user_agent);
            },
        )
    }

    /// Build both clients, then prefetch server availabilities
    ///
    /// A prefetch failure is logged and ignored.
    ///
    /// ## Errors
    /// - `ConfigError::Client` - either client cannot be built; no partial [`Meta`] is returned
    #[tracing::instrument(skip(self))]
    pub async fn meta(&self) -> std::result::Result<Meta, ConfigError> {
        let client = self.client().map_err(|source| ConfigError::Client {
            which: ClientKind::Current,
            source,
        })?;
        let legacy_client = self.legacy_client().map_err(|source| ConfigError::Client {
            which: ClientKind::Legacy,
            source,
        })?;

        if self.prefetch {
            if let Err(err) = fetch_server_availabilities(&client).await {
                warn!(error = %err, "cannot fetch server availabilities");
            }
        }

        debug!(
            region = ?client.default_region(),
            legacy_region = legacy_client.region(),
            "provider clients ready"
        );
        Ok(Meta {
            client,
            legacy_client,
        })
    }
}

/// Both SDK client generations, shared by every resource
#[derive(Debug)]
pub struct Meta {
    client: ScwClient,
    legacy_client: LegacyApi,
}

impl Meta {
    pub fn client(&self) -> &ScwClient {
        &self.client
    }

    pub fn legacy_client(&self) -> &LegacyApi {
        &self.legacy_client
    }
}

impl Config {
    /// Build the [`Meta`] handle with the default HTTP stack
    ///
    /// ## Errors
    /// - `ConfigError::Client` - either client cannot be built
    pub async fn meta(&self, settings: &ProviderSettings) -> std::result::Result<Meta, ConfigError> {
        ClientFactory::new(self, settings).meta().await
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
