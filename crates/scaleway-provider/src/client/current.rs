//! Current generation API client
use super::availability::ServerAvailabilities;
use super::{AUTH_HEADER, DEFAULT_USER_AGENT, decode_response};
use crate::error::{ClientError, Result};
use crate::locality::{Region, Zone};
use crate::transport::HttpClient;
use dashmap::DashMap;
use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::{Method, Request, Response, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.scaleway.com";

/// Construction option of [`ScwClient`]
#[derive(Clone)]
pub enum ClientOption {
    HttpClient(Arc<dyn HttpClient>),
    Auth {
        access_key: String,
        secret_key: String,
    },
    DefaultOrganizationId(String),
    DefaultRegion(Region),
    DefaultZone(Zone),
    ApiUrl(String),
    UserAgent(String),
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOption::HttpClient(_) => f.write_str("HttpClient(..)"),
            ClientOption::Auth { access_key, .. } => f
                .debug_struct("Auth")
                .field("access_key", access_key)
                .field("secret_key", &"<redacted>")
                .finish(),
            ClientOption::DefaultOrganizationId(id) => {
                f.debug_tuple("DefaultOrganizationId").field(id).finish()
            }
            ClientOption::DefaultRegion(region) => {
                f.debug_tuple("DefaultRegion").field(region).finish()
            }
            ClientOption::DefaultZone(zone) => f.debug_tuple("DefaultZone").field(zone).finish(),
            ClientOption::ApiUrl(url) => f.debug_tuple("ApiUrl").field(url).finish(),
            ClientOption::UserAgent(agent) => f.debug_tuple("UserAgent").field(agent).finish(),
        }
    }
}

/// Client of the current API generation
pub struct ScwClient {
    http_client: Arc<dyn HttpClient>,
    api_url: Url,
    user_agent: String,
    access_key: Option<String>,
    secret_key: Option<String>,
    default_organization_id: Option<String>,
    default_region: Option<Region>,
    default_zone: Option<Zone>,
    server_availabilities: DashMap<Zone, ServerAvailabilities>,
}

impl ScwClient {
    /// Build a client from options, later options overriding earlier ones
    ///
    /// ## Errors
    /// - `ClientError::InvalidRegion` / `ClientError::InvalidZone` - malformed locality
    /// - `ClientError::MissingCredential` - auth option with an empty secret key
    /// - `ClientError::InvalidUrl` - API URL cannot be parsed
    pub fn new(options: Vec<ClientOption>) -> Result<Self> {
        let mut http_client: Option<Arc<dyn HttpClient>> = None;
        let mut api_url = DEFAULT_API_URL.to_string();
        let mut user_agent = DEFAULT_USER_AGENT.to_string();
        let mut access_key = None;
        let mut secret_key = None;
        let mut default_organization_id = None;
        let mut default_region = None;
        let mut default_zone = None;

        for option in options {
            match option {
                ClientOption::HttpClient(client) => http_client = Some(client),
                ClientOption::Auth {
                    access_key: access,
                    secret_key: secret,
                } => {
                    if secret.is_empty() {
                        return Err(ClientError::MissingCredential("secret_key"));
                    }
                    access_key = Some(access).filter(|key| !key.is_empty());
                    secret_key = Some(secret);
                }
                ClientOption::DefaultOrganizationId(id) => default_organization_id = Some(id),
                ClientOption::DefaultRegion(region) => {
                    if !region.is_valid() {
                        return Err(ClientError::InvalidRegion(region.to_string()));
                    }
                    default_region = Some(region);
                }
                ClientOption::DefaultZone(zone) => {
                    if !zone.is_valid() {
                        return Err(ClientError::InvalidZone(zone.to_string()));
                    }
                    default_zone = Some(zone);
                }
                ClientOption::ApiUrl(url) => api_url = url,
                ClientOption::UserAgent(agent) => user_agent = agent,
            }
        }

        let api_url = Url::parse(&api_url)?;
        HeaderValue::from_str(&user_agent)?;
        if let Some(secret) = &secret_key {
            HeaderValue::from_str(secret)?;
        }

        debug!(
            api_url = %api_url,
            organization_id = ?default_organization_id,
            region = ?default_region,
            zone = ?default_zone,
            authenticated = secret_key.is_some(),
            "SDK client created"
        );

        Ok(Self {
            http_client: http_client
                .unwrap_or_else(|| Arc::new(reqwest::Client::new()) as Arc<dyn HttpClient>),
            api_url,
            user_agent,
            access_key,
            secret_key,
            default_organization_id,
            default_region,
            default_zone,
            server_availabilities: DashMap::new(),
        })
    }

    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    pub fn default_organization_id(&self) -> Option<&str> {
        self.default_organization_id.as_deref()
    }

    pub fn default_region(&self) -> Option<&Region> {
        self.default_region.as_ref()
    }

    pub fn default_zone(&self) -> Option<&Zone> {
        self.default_zone.as_ref()
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn http_client(&self) -> &Arc<dyn HttpClient> {
        &self.http_client
    }

    /// Cached server availabilities of a zone
    pub fn server_availabilities(&self, zone: &Zone) -> Option<ServerAvailabilities> {
        self.server_availabilities
            .get(zone)
            .map(|entry| entry.value().clone())
    }

    pub(crate) fn store_server_availabilities(&self, zone: Zone, value: ServerAvailabilities) {
        self.server_availabilities.insert(zone, value);
    }

    /// Build an authenticated request for an API path
    ///
    /// ## Errors
    /// - `ClientError::InvalidUrl` - path cannot be joined to the API URL
    pub fn request(&self, method: Method, path: &str) -> Result<Request> {
        let url = self.api_url.join(path)?;
        let mut request = Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        if let Some(secret) = &self.secret_key {
            let mut token = HeaderValue::from_str(secret)?;
            token.set_sensitive(true);
            headers.insert(AUTH_HEADER, token);
        }
        Ok(request)
    }

    #[tracing::instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, request: Request) -> Result<Response> {
        Ok(self.http_client.execute(request).await?)
    }

    pub async fn execute_with_cancel(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        Ok(self.http_client.execute_with_cancel(request, cancel).await?)
    }

    /// GET a path and decode its JSON body
    ///
    /// ## Errors
    /// - `ClientError::Api` - non-success status
    /// - `ClientError::Decode` - body is not the expected JSON
    /// - `ClientError::Transport` - request failed
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.request(Method::GET, path)?;
        let response = self.execute(request).await?;
        decode_response(response).await
    }
}

impl fmt::Debug for ScwClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScwClient")
            .field("api_url", &self.api_url.as_str())
            .field("user_agent", &self.user_agent)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("default_organization_id", &self.default_organization_id)
            .field("default_region", &self.default_region)
            .field("default_zone", &self.default_zone)
            .finish_non_exhaustive()
    }
}
