//! Buffered HTTP responses.

use std::collections::HashMap;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::ApiError;

/// A fully-read response.
///
/// Bodies are small JSON documents or single spreadsheet exports, so the
/// transport reads them eagerly and releases the connection.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            url: url.into(),
            headers: HashMap::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Check if the response is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(|s| s.as_str())
    }

    /// Get the filename from Content-Disposition header.
    pub fn content_disposition_filename(&self) -> Option<String> {
        self.headers
            .get("content-disposition")
            .and_then(|h| parse_content_disposition_filename(h))
    }

    /// Deserialize the body as JSON. An empty body reads as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(body).map_err(|e| ApiError::Decode {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }

    /// Turn the response into a downloaded file.
    pub fn into_file(self) -> FileDownload {
        FileDownload {
            filename: self.content_disposition_filename(),
            content_type: self.content_type().map(str::to_string),
            bytes: self.body,
        }
    }
}

/// Binary payload returned by a file request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Parse filename from Content-Disposition header value.
/// Parses both `filename="name.xlsx"` and `filename*=UTF-8''name.xlsx` formats.
pub fn parse_content_disposition_filename(header: &str) -> Option<String> {
    // RFC 5987 form wins when both are present
    if let Some(start) = header.find("filename*=") {
        let rest = &header[start + 10..];
        if let Some(quote_start) = rest.find("''") {
            let encoded = rest[quote_start + 2..].split([';', ' ']).next()?;
            if let Ok(decoded) = urlencoding::decode(encoded) {
                let filename = decoded.trim().to_string();
                if !filename.is_empty() {
                    return Some(filename);
                }
            }
        }
    }

    if let Some(start) = header.find("filename=") {
        let rest = &header[start + 9..];
        let filename = if let Some(quoted) = rest.strip_prefix('"') {
            quoted.split('"').next()
        } else {
            rest.split([';', ' ']).next()
        };

        if let Some(name) = filename {
            let name = name.trim().to_string();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }

    None
}
