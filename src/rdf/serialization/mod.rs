//! RDF serialization formats
//!
//! Supports:
//! - Turtle (TTL)
//! - N-Triples (NT)
//! - SPARQL 1.1 Update requests for differential patches

mod turtle;
mod update;

pub use update::sparql_update;

use super::types::{BlankNodeArena, Quad};
use thiserror::Error;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
}

impl RdfFormat {
    /// Media type sent as `Content-Type`
    pub fn media_type(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::NTriples => "application/n-triples",
        }
    }

    /// Pick a format from a `Content-Type` header value
    pub fn from_media_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        let mime: mime::Mime = essence.parse().ok()?;
        match (mime.type_().as_str(), mime.subtype().as_str()) {
            ("text", "turtle") | ("application", "x-turtle") => Some(RdfFormat::Turtle),
            ("application", "n-triples") => Some(RdfFormat::NTriples),
            _ => None,
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<rio_turtle::TurtleError> for ParseError {
    fn from(e: rio_turtle::TurtleError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF parser
pub struct RdfParser;

impl RdfParser {
    /// Parse statements belonging to `document`
    ///
    /// Relative IRIs resolve against the document, every statement is placed in
    /// the document graph and blank node labels are interned into `blank_nodes`.
    pub fn parse(
        input: &str,
        format: RdfFormat,
        document: &str,
        blank_nodes: &mut BlankNodeArena,
    ) -> ParseResult<Vec<Quad>> {
        match format {
            RdfFormat::Turtle => turtle::parse_turtle(input, document, blank_nodes),
            RdfFormat::NTriples => turtle::parse_ntriples(input, document, blank_nodes),
        }
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize statements, dropping their graph component
    pub fn serialize(quads: &[Quad], format: RdfFormat) -> SerializeResult<String> {
        turtle::serialize(quads, format)
    }
}
