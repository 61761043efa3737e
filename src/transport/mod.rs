//! Network transport for Linked Data documents
//!
//! Documents talk to the remote store through the [`Transport`] trait: a plain
//! GET to load, a PUT that must not overwrite an existing resource to create,
//! and a SPARQL Update PATCH to apply a diff. [`HttpTransport`] implements it
//! over reqwest; [`RecordingTransport`] replays scripted responses offline.

mod http;
mod recording;

pub use http::HttpTransport;
pub use recording::{RecordedRequest, RecordingTransport};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use thiserror::Error;

/// Transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The transport could not be set up
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Network(e.to_string())
    }
}

/// HTTP verb used by a document operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Patch,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        }
    }
}

/// Status, headers and text body of a completed request
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    /// Add a header, keeping earlier values with the same name
    ///
    /// Names or values that are not valid HTTP are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Reason phrase for the status, e.g. `Forbidden`
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Every value of a header joined with `, `
    pub fn header(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

/// Remote document store
#[async_trait]
pub trait Transport: Send + Sync {
    /// Load a document
    async fn get(&self, url: &str) -> TransportResult<TransportResponse>;

    /// Create a document; must not replace one that already exists
    async fn put(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> TransportResult<TransportResponse>;

    /// Apply a SPARQL Update to an existing document
    async fn patch(&self, url: &str, update: String) -> TransportResult<TransportResponse>;
}
