//! Deprecated API generation client
//!
//! The deprecated API is addressed by short region codes (`par1`, `ams1`)
//! instead of region and zone identifiers.
use super::{AUTH_HEADER, DEFAULT_USER_AGENT, decode_response};
use crate::error::{ClientError, Result};
use crate::transport::HttpClient;
use reqwest::header::{CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::{Body, Method, Request, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const PAR1: &str = "par1";
pub const AMS1: &str = "ams1";
/// Region used when none is given
pub const DEFAULT_LEGACY_REGION: &str = PAR1;
pub const ACCOUNT_URL: &str = "https://account.scaleway.com";

/// Endpoint family of the deprecated API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Compute,
    Account,
}

/// Client of the deprecated API generation
pub struct LegacyApi {
    organization: String,
    token: String,
    region: String,
    compute_url: Url,
    account_url: Url,
    user_agent: String,
    http_client: Arc<dyn HttpClient>,
}

impl LegacyApi {
    /// Create a client for `region`, then let `options` adjust it
    ///
    /// An empty region selects [`DEFAULT_LEGACY_REGION`].
    ///
    /// ## Errors
    /// - `ClientError::InvalidRegion` - region code is not served by the deprecated API
    pub fn new<F>(
        organization: impl Into<String>,
        token: impl Into<String>,
        region: &str,
        options: F,
    ) -> Result<Self>
    where
        F: FnOnce(&mut LegacyApi),
    {
        let region = match region {
            "" => DEFAULT_LEGACY_REGION,
            PAR1 | AMS1 => region,
            other => return Err(ClientError::InvalidRegion(other.to_string())),
        };
        let mut api = Self {
            organization: organization.into(),
            token: token.into(),
            region: region.to_string(),
            compute_url: Url::parse(&format!("https://cp-{region}.scaleway.com"))?,
            account_url: Url::parse(ACCOUNT_URL)?,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_client: Arc::new(reqwest::Client::new()),
        };
        options(&mut api);

        debug!(
            region = %api.region,
            compute_url = %api.compute_url,
            "deprecated client created"
        );
        Ok(api)
    }

    pub fn set_http_client(&mut self, client: Arc<dyn HttpClient>) {
        self.http_client = client;
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn compute_url(&self) -> &Url {
        &self.compute_url
    }

    pub fn account_url(&self) -> &Url {
        &self.account_url
    }

    pub fn http_client(&self) -> &Arc<dyn HttpClient> {
        &self.http_client
    }

    /// Build an authenticated request against one endpoint family
    ///
    /// ## Errors
    /// - `ClientError::InvalidUrl` - path cannot be joined to the endpoint URL
    /// - `ClientError::InvalidHeader` - token or user agent is not a valid header value
    pub fn request(&self, endpoint: Endpoint, method: Method, path: &str) -> Result<Request> {
        let base = match endpoint {
            Endpoint::Compute => &self.compute_url,
            Endpoint::Account => &self.account_url,
        };
        let mut request = Request::new(method, base.join(path)?);
        let headers = request.headers_mut();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        if !self.token.is_empty() {
            let mut token = HeaderValue::from_str(&self.token)?;
            token.set_sensitive(true);
            headers.insert(AUTH_HEADER, token);
        }
        Ok(request)
    }

    /// GET a path and decode its JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint, path: &str) -> Result<T> {
        let request = self.request(endpoint, Method::GET, path)?;
        let response = self.http_client.execute(request).await?;
        decode_response(response).await
    }

    /// POST a JSON body and decode the JSON answer
    pub async fn post_json<B, T>(&self, endpoint: Endpoint, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.request(endpoint, Method::POST, path)?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *request.body_mut() = Some(Body::from(serde_json::to_vec(body)?));
        let response = self.http_client.execute(request).await?;
        decode_response(response).await
    }
}

impl fmt::Debug for LegacyApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyApi")
            .field("organization", &self.organization)
            .field("token", &"<redacted>")
            .field("region", &self.region)
            .field("compute_url", &self.compute_url.as_str())
            .finish_non_exhaustive()
    }
}
