//! HTTP transport stack
//!
//! The stack used by the SDK clients is, from the outside in:
//! [`ClientAdapter`] (request buffering) → [`RetryTransport`] (rate-limit
//! aware retries) → [`LoggingTransport`] (request logging) → [`reqwest::Client`].
pub mod adapter;
pub mod logging;
pub mod retry;

use crate::PROVIDER_NAME;
use crate::config::{NetworkSettings, ProviderSettings};
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Request, Response};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub use adapter::ClientAdapter;
pub use logging::LoggingTransport;
pub use retry::{RetryPolicy, RetryTransport, RetryableRequest, check_retry};

/// Sends exactly one HTTP request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, TransportError>;
}

#[async_trait]
impl Transport for Client {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        Ok(self.execute(request).await?)
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        (**self).send(request).await
    }
}

/// HTTP client interface consumed by the SDK clients
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, TransportError>;

    /// Execute a request, giving up as soon as `cancel` fires
    async fn execute_with_cancel(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Response, TransportError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.execute(request) => result,
        }
    }
}

#[async_trait]
impl HttpClient for Client {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        Ok(Client::execute(self, request).await?)
    }
}

/// Build the underlying [`reqwest::Client`]
///
/// ## Errors
/// - `TransportError::Network` - TLS backend or client builder failure
pub fn build_http_client(settings: &NetworkSettings) -> Result<Client, TransportError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .pool_idle_timeout(Duration::from_secs(settings.pool_idle_timeout_secs))
        .pool_max_idle_per_host(settings.max_idle_connections)
        .tcp_nodelay(true)
        .user_agent(&*settings.user_agent)
        .use_rustls_tls()
        .build()?;
    Ok(client)
}

/// Build the retrying HTTP client shared by both SDK generations
///
/// ## Errors
/// - `TransportError::Network` - the underlying client cannot be built
#[tracing::instrument(skip(settings))]
pub fn create_retryable_http_client(
    settings: &ProviderSettings,
) -> Result<ClientAdapter, TransportError> {
    let client = build_http_client(&settings.network)?;
    let logging = LoggingTransport::new(PROVIDER_NAME, client);
    let retry = RetryTransport::new(logging, RetryPolicy::from(&settings.retry));
    Ok(ClientAdapter::new(retry))
}


#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;
    use reqwest::{Method, Url};

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&NetworkSettings::default()).is_ok());
    }

    #[test]
    fn test_create_retryable_http_client() {
        let adapter = create_retryable_http_client(&ProviderSettings::default()).unwrap();
        assert_eq!(adapter.policy(), &RetryPolicy::default());
    }

    #[tokio::test]
    async fn test_execute_with_cancel_already_cancelled() {
        let mock = MockTransport::status(200, "ok");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let request = Request::new(Method::GET, Url::parse("https://api.example.com").unwrap());

        let result = mock.execute_with_cancel(request, &cancel).await;
        assert!(matches!(result, Err(TransportError::Cancelled)));
    }

    #[tokio::test]
    async fn test_arc_transport_delegates() {
        let mock = Arc::new(MockTransport::status(204, ""));
        let request = Request::new(Method::GET, Url::parse("https://api.example.com").unwrap());
        let response = Transport::send(&mock, request).await.unwrap();
        assert_eq!(response.status().as_u16(), 204);
        assert_eq!(mock.calls(), 1);
    }
}
