//! HTTP transport for the backend API.
//!
//! [`Transport`] is the seam the record service talks through. [`HttpClient`]
//! is the `reqwest` implementation used in production; tests plug in a fake.

mod error;
mod response;

pub use error::ApiError;
pub use response::{parse_content_disposition_filename, FileDownload, HttpResponse};

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Default user agent for API requests.
pub const USER_AGENT: &str = concat!("leadunit/", env!("CARGO_PKG_VERSION"));

/// HTTP verbs used by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// A request against one of the configured base URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub base_url: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Expect a binary file rather than JSON.
    pub file: bool,
}

impl ApiRequest {
    pub fn new(method: Method, base_url: &str, path: &str) -> Self {
        Self {
            method,
            base_url: base_url.to_string(),
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            file: false,
        }
    }

    pub fn get(base_url: &str, path: &str) -> Self {
        Self::new(Method::Get, base_url, path)
    }

    pub fn post(base_url: &str, path: &str) -> Self {
        Self::new(Method::Post, base_url, path)
    }

    pub fn put(base_url: &str, path: &str) -> Self {
        Self::new(Method::Put, base_url, path)
    }

    pub fn delete(base_url: &str, path: &str) -> Self {
        Self::new(Method::Delete, base_url, path)
    }

    /// Append one query parameter.
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append query parameters in order.
    pub fn params<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.query.extend(pairs);
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Validation(format!("unserializable body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Mark the request as a file download.
    pub fn file(mut self) -> Self {
        self.file = true;
        self
    }

    /// Full URL with percent-encoded query string.
    ///
    /// Encoding follows `encodeURIComponent`, so spaces become `%20`.
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        let mut url = if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        };

        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        url
    }
}

/// Sends requests to the backend.
///
/// Implementations must return `Err` for any non-2xx response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<HttpResponse, ApiError>;
}

/// Connection settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub user_agent: Option<String>,
    pub bearer_token: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
            bearer_token: None,
        }
    }
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(options: &ClientOptions) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &options.bearer_token {
            if let Ok(mut value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        let client = Client::builder()
            .user_agent(options.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(options.timeout)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            timeout: options.timeout,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url();
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder = builder.header(
            ACCEPT,
            if request.file {
                "application/octet-stream, */*"
            } else {
                "application/json"
            },
        );

        debug!("{} {}", request.method, url);
        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&url, e, self.timeout))?;

        let status = response.status();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string(), v.to_string());
            }
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(&url, e, self.timeout))?
            .to_vec();

        debug!(
            "{} {} -> {} in {}ms ({} bytes)",
            request.method,
            url,
            status.as_u16(),
            start.elapsed().as_millis(),
            body.len()
        );

        if !status.is_success() {
            return Err(ApiError::from_status(status, &url, &body));
        }

        Ok(HttpResponse {
            status,
            url,
            headers,
            body,
        })
    }
}
