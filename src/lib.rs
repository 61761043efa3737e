//! Linked Data documents over HTTP
//!
//! Read and edit RDF documents the way you would edit records: fetch a
//! document, look up its subjects, read typed values, change them, and save.
//! Changes are buffered per subject and written back as one SPARQL Update.
//!
//! # Modules
//!
//! - [`rdf`]: quads, literals, pattern matching, the shared quad store, Turtle I/O
//! - [`document`]: [`TripleDocument`] and [`TripleSubject`]
//! - [`transport`]: the [`Transport`] seam, with HTTP and scripted implementations
//! - [`client`]: [`Client`] and [`ClientConfig`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use linked_doc::rdf::vocab::foaf;
//! use linked_doc::{Client, ClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::default())?;
//! let mut profile = client.fetch_document("https://alice.example/profile/card").await?;
//!
//! let me = profile.get_subject("https://alice.example/profile/card#me");
//! println!("name: {:?}", me.get_string(foaf::NAME));
//! me.set_literal(foaf::NICK, "alice");
//!
//! profile.save().await?;
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod document;
pub mod rdf;
pub mod transport;

// Re-export main types for convenience
pub use client::{Client, ClientConfig};

pub use document::{
    AddSubjectOptions, DocumentError, DocumentResult, SubjectState, TripleDocument, TripleSubject,
};

pub use rdf::{
    BlankNode, Entity, Literal, LiteralValue, Quad, QuadStore, RdfObject, RdfSubject, Reference,
    SharedStore, XsdDatatype,
};

pub use transport::{
    HttpTransport, Method, RecordingTransport, Transport, TransportError, TransportResponse,
    TransportResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
