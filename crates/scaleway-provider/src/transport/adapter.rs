//! Adapter from SDK requests to replayable retry requests
use super::retry::{RetryPolicy, RetryTransport, RetryableRequest};
use super::{HttpClient, LoggingTransport, Transport};
use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::header::HeaderMap;
use reqwest::{Client, Request, Response};
use tokio_util::sync::CancellationToken;

/// [`HttpClient`] that buffers each request and hands it to a [`RetryTransport`]
///
/// Only the first value of every header is forwarded.
#[derive(Debug)]
pub struct ClientAdapter<T = LoggingTransport<Client>> {
    transport: RetryTransport<T>,
}

impl<T> Clone for ClientAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<T: Transport> ClientAdapter<T> {
    pub fn new(transport: RetryTransport<T>) -> Self {
        Self { transport }
    }

    pub fn policy(&self) -> &RetryPolicy {
        self.transport.policy()
    }

    pub fn transport(&self) -> &RetryTransport<T> {
        &self.transport
    }

    /// Convert a request into its replayable form
    ///
    /// ## Errors
    /// - `TransportError::Network` - a streaming body fails while being read
    pub async fn adapt(&self, mut request: Request) -> Result<RetryableRequest, TransportError> {
        let body = match request.body_mut().take() {
            None => Bytes::new(),
            Some(body) => match body.as_bytes() {
                Some(bytes) => Bytes::copy_from_slice(bytes),
                None => body.collect().await?.to_bytes(),
            },
        };

        let source = request.headers();
        let mut headers = HeaderMap::with_capacity(source.keys_len());
        for name in source.keys() {
            if let Some(value) = source.get(name) {
                headers.insert(name.clone(), value.clone());
            }
        }

        Ok(RetryableRequest::new(request.method().clone(), request.url().clone())
            .with_headers(headers)
            .with_body(body))
    }
}

#[async_trait]
impl<T: Transport + 'static> HttpClient for ClientAdapter<T> {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        let request = self.adapt(request).await?;
        self.transport.send(request).await
    }

    async fn execute_with_cancel(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Response, TransportError> {
        let request = self.adapt(request).await?.with_cancel(cancel.clone());
        self.transport.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};
    use reqwest::{Body, Method, Url};

    fn adapter(mock: MockTransport) -> ClientAdapter<MockTransport> {
        ClientAdapter::new(RetryTransport::new(mock, RetryPolicy::default()))
    }

    fn request(method: Method) -> Request {
        Request::new(
            method,
            Url::parse("https://api.scaleway.com/instance/v1/zones/fr-par-1/servers").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_body_and_headers_preserved() {
        let client = adapter(MockTransport::status(200, "{}"));
        let mut request = request(Method::POST);
        request
            .headers_mut()
            .insert("X-Test", HeaderValue::from_static("a"));
        *request.body_mut() = Some(Body::from("payload"));

        let response = client.execute(request).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let recorded = client.transport().inner().requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].method, Method::POST);
        assert_eq!(recorded[0].headers.get("x-test").unwrap(), "a");
        assert_eq!(recorded[0].body.as_deref(), Some(&b"payload"[..]));
    }

    #[tokio::test]
    async fn test_only_first_header_value_kept() {
        let client = adapter(MockTransport::status(200, ""));
        let mut request = request(Method::GET);
        request
            .headers_mut()
            .append("X-Multi", HeaderValue::from_static("first"));
        request
            .headers_mut()
            .append("X-Multi", HeaderValue::from_static("second"));

        let adapted = client.adapt(request).await.unwrap();
        let values: Vec<_> = adapted.headers.get_all("x-multi").iter().collect();
        assert_eq!(values, vec![&HeaderValue::from_static("first")]);
    }

    #[tokio::test]
    async fn test_streaming_body_is_buffered() {
        let client = adapter(MockTransport::status(200, ""));
        let chunks: Vec<Result<Bytes, std::io::Error>> =
            vec![Ok(Bytes::from_static(b"pay")), Ok(Bytes::from_static(b"load"))];
        let mut request = request(Method::PUT);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *request.body_mut() = Some(Body::wrap_stream(futures::stream::iter(chunks)));

        let adapted = client.adapt(request).await.unwrap();
        assert_eq!(adapted.body, Bytes::from_static(b"payload"));
        assert_eq!(adapted.method, Method::PUT);
        assert!(adapted.cancel.is_none());
    }

    #[tokio::test]
    async fn test_empty_body() {
        let client = adapter(MockTransport::status(200, ""));
        let adapted = client.adapt(request(Method::GET)).await.unwrap();
        assert!(adapted.body.is_empty());
        assert!(adapted.headers.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_request_not_sent() {
        let mock = MockTransport::status(200, "");
        let client = adapter(mock);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = client
            .execute_with_cancel(request(Method::GET), &cancel)
            .await;
        assert!(matches!(result, Err(TransportError::Cancelled)));
        assert_eq!(client.transport().inner().calls(), 0);
    }
}
