//! HTTP client abstraction and the reqwest-backed implementation


use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("endpoint-probe/", env!("CARGO_PKG_VERSION"));

/// HTTP client trait for abstraction and testing
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and wait for the complete response, body included
    async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    pub timeout: Option<Duration>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(url: String, method: Method) -> Self {
        Self {
            url,
            method,
            timeout: None,
            headers: Vec::new(),
        }
    }

    /// Create a GET request
    pub fn get(url: String) -> Self {
        Self::new(url, Method::GET)
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add custom header
    pub fn with_header(mut self, name: String, value: String) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Add `Authorization: Bearer <token>`
    pub fn with_bearer_token(self, token: &str) -> Self {
        self.with_header("Authorization".to_string(), format!("Bearer {}", token))
    }

    /// Add `Accept: application/json`
    pub fn accept_json(self) -> Self {
        self.with_header("Accept".to_string(), "application/json".to_string())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Complete HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Set when the status line arrived but the body could not be read
    pub body_error: Option<String>,
}

impl HttpResponse {
    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// reqwest-backed client. Redirects follow reqwest's default policy.
pub struct NetworkClient {
    client: Client,
    default_timeout: Option<Duration>,
}

impl NetworkClient {
    /// Create a client that never times out on its own
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Create a client applying `timeout` to requests that don't set their own
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }
}

#[async_trait]
impl HttpClient for NetworkClient {
    async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut req_builder = self.client.request(request.method, request.url.as_str());

        if let Some(timeout) = request.timeout.or(self.default_timeout) {
            req_builder = req_builder.timeout(timeout);
        }

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        let response = req_builder.send().await?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        // A response was received; only a timeout still voids it
        let (body, body_error) = match response.text().await {
            Ok(body) => (body, None),
            Err(e) if e.is_timeout() => return Err(e.into()),
            Err(e) => (String::new(), Some(e.to_string())),
        };

        Ok(HttpResponse {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().map(str::to_string),
            headers,
            body,
            body_error,
        })
    }
}
