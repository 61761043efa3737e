//! Offline transport with scripted responses
//!
//! Every request is recorded. Responses are taken per method in the order they
//! were pushed; once a method's script runs out it answers `200 OK` with an
//! empty body.

use super::{Method, Transport, TransportError, TransportResponse, TransportResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// A request seen by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug)]
enum Scripted {
    Respond(TransportResponse),
    Fail(String),
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    scripts: Mutex<HashMap<Method, VecDeque<Scripted>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next `method` request
    pub fn push_response(&self, method: Method, response: TransportResponse) {
        self.scripts
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(Scripted::Respond(response));
    }

    /// Queue a network failure for the next `method` request
    pub fn push_failure(&self, method: Method, message: impl Into<String>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(Scripted::Fail(message.into()));
    }

    /// Every request so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests made with one method
    pub fn calls(&self, method: Method) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.method == method)
            .cloned()
            .collect()
    }

    fn answer(&self, request: RecordedRequest) -> TransportResult<TransportResponse> {
        let method = request.method;
        self.requests.lock().unwrap().push(request);
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&method)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(TransportError::Network(message)),
            None => Ok(TransportResponse::new(StatusCode::OK)),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get(&self, url: &str) -> TransportResult<TransportResponse> {
        self.answer(RecordedRequest {
            method: Method::Get,
            url: url.to_string(),
            content_type: None,
            body: None,
        })
    }

    async fn put(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> TransportResult<TransportResponse> {
        self.answer(RecordedRequest {
            method: Method::Put,
            url: url.to_string(),
            content_type: Some(content_type.to_string()),
            body: Some(body),
        })
    }

    async fn patch(&self, url: &str, update: String) -> TransportResult<TransportResponse> {
        self.answer(RecordedRequest {
            method: Method::Patch,
            url: url.to_string(),
            content_type: Some("application/sparql-update".to_string()),
            body: Some(update),
        })
    }
}
