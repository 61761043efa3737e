//! Client entry point
//!
//! A [`Client`] owns the quad store shared by every document it opens and the
//! transport those documents talk through.

use crate::document::{DocumentResult, TripleDocument};
use crate::rdf::{Quad, QuadStore, RdfFormat, SharedStore};
use crate::transport::{HttpTransport, Transport, TransportResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// `User-Agent` sent with every request
    pub user_agent: String,
    /// Media type new documents are written in
    pub content_type: String,
    /// Create documents remotely as soon as they are created locally
    pub eager_create: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: format!("linked-doc/{}", crate::VERSION),
            content_type: "text/turtle".to_string(),
            eager_create: false,
        }
    }
}

impl ClientConfig {
    /// Parse a YAML configuration; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    fn format(&self) -> RdfFormat {
        RdfFormat::from_media_type(&self.content_type).unwrap_or(RdfFormat::Turtle)
    }
}

pub struct Client {
    config: ClientConfig,
    store: SharedStore,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client speaking HTTP
    pub fn new(config: ClientConfig) -> TransportResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client over any transport, with a fresh store
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            store: QuadStore::shared(),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Load the document at `url`
    ///
    /// A non-success status fails with the status code and reason in the
    /// error message.
    pub async fn fetch_document(&self, url: &str) -> DocumentResult<TripleDocument> {
        TripleDocument::fetch(
            url,
            self.store.clone(),
            self.transport.clone(),
            self.config.format(),
        )
        .await
    }

    /// A new document at `url`, holding `statements` once saved
    pub async fn create_document(
        &self,
        url: &str,
        statements: Vec<Quad>,
    ) -> DocumentResult<TripleDocument> {
        TripleDocument::create(
            url,
            statements,
            self.store.clone(),
            self.transport.clone(),
            self.config.format(),
            self.config.eager_create,
        )
        .await
    }
}
