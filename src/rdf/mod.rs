//! RDF primitives for Linked Data documents
//!
//! This module provides the statement-level building blocks:
//! - RDF quads whose graph is always the owning document
//! - Document-scoped blank node handles
//! - Typed literal coercion (string, integer, decimal, dateTime)
//! - Pattern matching restricted to one document
//! - An in-memory quad store shared between documents
//! - Turtle / N-Triples I/O and SPARQL Update rendering
//!
//! # Example
//!
//! ```rust
//! use linked_doc::rdf::{find_object_in_statements, vocab, Literal, Quad, RdfSubject};
//!
//! let doc = "https://example.org/profile";
//! let me = format!("{}#me", doc);
//! let quads = vec![Quad::new(
//!     me.as_str(),
//!     vocab::foaf::NAME,
//!     Literal::new_simple_literal("Alice"),
//!     doc,
//! )];
//!
//! let name = find_object_in_statements(&quads, &RdfSubject::from(me), vocab::foaf::NAME, doc);
//! assert_eq!(name.and_then(|e| e.as_literal().map(|l| l.value().to_string())), Some("Alice".to_string()));
//! ```

mod types;
mod store;
mod literal;
mod matcher;
pub mod serialization;
pub mod vocab;

pub use types::{
    BlankNode, BlankNodeArena, Literal, Quad, QuadPattern, RdfError, RdfObject, RdfResult,
    RdfSubject, Reference,
};

pub use store::{QuadStore, SharedStore};

pub use literal::{
    classify, decode_date_time, decode_decimal, decode_integer, from_literal,
    is_date_time_literal, is_decimal_literal, is_integer_literal, is_locale_string_literal,
    is_string_literal, to_literal, LiteralValue, XsdDatatype,
};

pub use matcher::{
    find_entities, find_entity, find_object_in_statements, find_objects_in_statements,
    find_predicate_in_statements, find_predicates_in_statements, find_subject_in_statements,
    find_subjects_in_statements, Entity, EntityRole,
};

pub use serialization::{
    sparql_update, ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer,
    SerializeError, SerializeResult,
};

pub use vocab::{Namespace, NamespaceManager, PrefixError, PrefixResult};
