//! Scripted API server used by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::{Method, Request, Response};
use scaleway_provider::error::TransportError;
use scaleway_provider::transport::{HttpClient, Transport};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Request as seen by the fake API
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub url: String,
    pub auth_token: Option<String>,
    pub body: Option<Vec<u8>>,
}

/// Answers from a queue of statuses, repeating the last one
pub struct FakeApi {
    statuses: Mutex<VecDeque<u16>>,
    body: &'static str,
    seen: Mutex<Vec<Seen>>,
}

impl FakeApi {
    pub fn new(statuses: &[u16], body: &'static str) -> Self {
        Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            body,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(body: &'static str) -> Self {
        Self::new(&[200], body)
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn answer(&self, request: Request) -> Result<Response, TransportError> {
        self.seen.lock().unwrap().push(Seen {
            method: request.method().clone(),
            url: request.url().to_string(),
            auth_token: request
                .headers()
                .get("X-Auth-Token")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            body: request
                .body()
                .and_then(|body| body.as_bytes())
                .map(<[u8]>::to_vec),
        });

        let status = {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front().unwrap_or(200)
            } else {
                statuses.front().copied().unwrap_or(200)
            }
        };
        Ok(http::Response::builder()
            .status(status)
            .body(self.body.to_string())
            .unwrap()
            .into())
    }
}

#[async_trait]
impl HttpClient for FakeApi {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        self.answer(request)
    }
}

#[async_trait]
impl Transport for FakeApi {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        self.answer(request)
    }
}
