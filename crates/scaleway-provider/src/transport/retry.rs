//! Rate-limit aware retry transport
//!
//! The API rate limit window is measured in minutes, so waits start at one
//! minute and double up to two minutes. Network failures and `429 Too Many
//! Requests` are always retried; other statuses follow [`default_retry_policy`].
use super::{LoggingTransport, Transport};
use crate::config::RetrySettings;
use crate::error::TransportError;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Body, Client, Method, Request, Response, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Retry limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: usize,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            min_wait: Duration::from_secs(settings.min_wait_secs),
            max_wait: Duration::from_secs(settings.max_wait_secs),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt + 1`: `min_wait * 2^attempt`,
    /// kept within `[min_wait, max_wait]`
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(31) as u32);
        self.min_wait
            .saturating_mul(factor)
            .min(self.max_wait)
            .max(self.min_wait)
    }
}

/// Decide whether an attempt outcome should be retried
pub fn check_retry(method: &Method, outcome: &Result<Response, TransportError>) -> bool {
    match outcome {
        Err(TransportError::Cancelled | TransportError::InvalidRequest(_)) => false,
        Err(_) => true,
        Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => true,
        Ok(response) => default_retry_policy(method, response.status()),
    }
}

/// Status based policy: idempotent requests are retried on `408` and on
/// server errors other than `501 Not Implemented`
pub fn default_retry_policy(method: &Method, status: StatusCode) -> bool {
    if !method.is_idempotent() {
        return false;
    }
    status == StatusCode::REQUEST_TIMEOUT
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

/// Request with a fully buffered body, replayable on every attempt
#[derive(Debug, Clone)]
pub struct RetryableRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub cancel: Option<CancellationToken>,
}

impl RetryableRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            cancel: None,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Fresh [`Request`] for one attempt
    pub fn to_request(&self) -> Request {
        let mut request = Request::new(self.method.clone(), self.url.clone());
        *request.headers_mut() = self.headers.clone();
        if !self.body.is_empty() {
            *request.body_mut() = Some(Body::from(self.body.clone()));
        }
        request
    }
}

/// Retries requests according to a [`RetryPolicy`]
#[derive(Debug)]
pub struct RetryTransport<T = LoggingTransport<Client>> {
    inner: Arc<T>,
    policy: RetryPolicy,
}

impl<T> Clone for RetryTransport<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            policy: self.policy,
        }
    }
}

impl<T: Transport> RetryTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(inner),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Send a request, retrying while the policy allows
    ///
    /// The outcome of the last attempt is returned unchanged, including a
    /// `429` response once retries are exhausted.
    ///
    /// ## Errors
    /// - `TransportError::Cancelled` - the request token fired
    /// - any error of the last attempt
    pub async fn send(&self, request: RetryableRequest) -> Result<Response, TransportError> {
        let mut attempt = 0;
        loop {
            let outcome = self.attempt(&request).await;
            if !check_retry(&request.method, &outcome) {
                return outcome;
            }
            if attempt >= self.policy.max_retries {
                warn!(
                    method = %request.method,
                    url = %request.url,
                    attempts = attempt + 1,
                    "giving up after retries"
                );
                return outcome;
            }

            let wait = self.policy.backoff(attempt);
            attempt += 1;
            match &outcome {
                Ok(response) => warn!(
                    method = %request.method,
                    url = %request.url,
                    status = response.status().as_u16(),
                    "Request failed, retrying ({}/{}) after {:?}",
                    attempt,
                    self.policy.max_retries,
                    wait
                ),
                Err(err) => warn!(
                    method = %request.method,
                    url = %request.url,
                    error = %err,
                    "Request failed, retrying ({}/{}) after {:?}",
                    attempt,
                    self.policy.max_retries,
                    wait
                ),
            }
            drop(outcome);

            match &request.cancel {
                Some(cancel) => tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        debug!(url = %request.url, "retry wait cancelled");
                        return Err(TransportError::Cancelled);
                    }
                    _ = sleep(wait) => {}
                },
                None => sleep(wait).await,
            }
        }
    }

    async fn attempt(&self, request: &RetryableRequest) -> Result<Response, TransportError> {
        let send = self.inner.send(request.to_request());
        match &request.cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TransportError::Cancelled),
                result = send => result,
            },
            None => send.await,
        }
    }
}
