//! reqwest-backed transport

use super::{Method, Transport, TransportError, TransportResponse, TransportResult};
use crate::client::ClientConfig;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, IF_NONE_MATCH};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;

const ACCEPT_RDF: &str = "text/turtle, application/n-triples;q=0.9";
const SPARQL_UPDATE: &str = "application/sparql-update";

/// Transport speaking plain HTTP to a Linked Data server
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport based on configuration
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> TransportResult<TransportResponse> {
        debug!(method = method.as_str(), url = %url, "sending request");
        let resp = request.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text().await?;
        debug!(method = method.as_str(), url = %url, status = status.as_u16(), "received response");
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> TransportResult<TransportResponse> {
        let request = self.client.get(url).header(ACCEPT, ACCEPT_RDF);
        self.send(Method::Get, url, request).await
    }

    async fn put(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> TransportResult<TransportResponse> {
        let request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .header(IF_NONE_MATCH, "*")
            .body(body);
        self.send(Method::Put, url, request).await
    }

    async fn patch(&self, url: &str, update: String) -> TransportResult<TransportResponse> {
        let request = self
            .client
            .patch(url)
            .header(CONTENT_TYPE, SPARQL_UPDATE)
            .body(update);
        self.send(Method::Patch, url, request).await
    }
}
