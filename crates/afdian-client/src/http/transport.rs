/*
[INPUT]:  URL, request body, optional cookie and headers
[OUTPUT]: Status (or transport error), lowercased response headers, raw body
[POS]:    HTTP layer - single-exchange transport seam under the API gateway
[UPDATE]: When changing how requests reach the network
*/

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{COOKIE, REFERER};

use crate::http::Result;

/// Status of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpStatus {
    /// Numeric status code from the server
    Code(u16),
    /// Transport failure (connect, timeout, TLS), verbatim
    Error(String),
}

impl HttpStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, HttpStatus::Code(200))
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpStatus::Code(code) => write!(f, "{code}"),
            HttpStatus::Error(message) => f.write_str(message),
        }
    }
}

/// One outgoing POST
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub body: String,
    pub cookie: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            cookie: None,
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Outcome of one exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: HttpStatus,
    /// Lowercased header name to every value received, in order
    pub headers: HashMap<String, Vec<String>>,
    pub body: String,
}

impl TransportResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: HttpStatus::Error(message.into()),
            headers: HashMap::new(),
            body: String::new(),
        }
    }
}

/// Performs exactly one HTTP exchange; never retries.
///
/// Transport-level failures are reported through [`HttpStatus::Error`]
/// rather than as an `Err`, so callers see them as a status.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: TransportRequest) -> TransportResponse;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, connect_timeout: Duration, user_agent: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| crate::http::AfdianError::Config(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> TransportResponse {
        let mut builder = self
            .http_client
            .post(&request.url)
            .header(REFERER, &request.url)
            .body(request.body);
        if let Some(cookie) = &request.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(url = %request.url, error = %err, "transport failure");
                return TransportResponse::failed(err.to_string());
            }
        };

        let status = response.status().as_u16();
        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(name.as_str().to_ascii_lowercase())
                    .or_default()
                    .push(value.trim().to_string());
            }
        }

        match response.text().await {
            Ok(body) => TransportResponse {
                status: HttpStatus::Code(status),
                headers,
                body,
            },
            Err(err) => TransportResponse::failed(err.to_string()),
        }
    }
}
