//! Request logging transport
use super::Transport;
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::{Request, Response};
use std::borrow::Cow;
use std::time::Instant;
use tracing::{debug, warn};

/// Log target of every HTTP exchange
pub const HTTP_LOG_TARGET: &str = "scaleway_provider::http";

/// Logs each request and its outcome, tagged with the provider name
#[derive(Debug, Clone)]
pub struct LoggingTransport<T> {
    name: Cow<'static, str>,
    inner: T,
}

impl<T> LoggingTransport<T> {
    pub fn new(name: impl Into<Cow<'static, str>>, inner: T) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(
            target: HTTP_LOG_TARGET,
            provider = %self.name,
            method = %method,
            url = %url,
            "sending request"
        );

        let started = Instant::now();
        let result = self.inner.send(request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => debug!(
                target: HTTP_LOG_TARGET,
                provider = %self.name,
                method = %method,
                url = %url,
                status = response.status().as_u16(),
                elapsed_ms,
                "response received"
            ),
            Err(err) => warn!(
                target: HTTP_LOG_TARGET,
                provider = %self.name,
                method = %method,
                url = %url,
                elapsed_ms,
                error = %err,
                "request failed"
            ),
        }
        result
    }
}
