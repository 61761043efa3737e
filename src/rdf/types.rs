//! RDF type definitions
//!
//! References are plain IRI strings, literals wrap the oxrdf literal type, and
//! blank nodes are opaque handles into the owning document's [`BlankNodeArena`].

use oxrdf::{Literal as OxLiteral, NamedNode as OxNamedNode};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

/// RDF errors
#[derive(Error, Debug)]
pub enum RdfError {
    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Invalid blank node
    #[error("Invalid blank node: {0}")]
    InvalidBlankNode(String),

    /// Invalid literal
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// A URI identifying a node in the graph.
pub type Reference = String;

/// Blank node handle
///
/// Only meaningful inside the document it was read from. The handle is an index
/// into that document's [`BlankNodeArena`] tagged with the arena it came from,
/// so handles from two fetches of the same document never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode {
    arena: u32,
    index: u32,
}

impl BlankNode {
    /// Position of this node in its arena
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Label used when writing this node to the wire
    pub fn wire_label(&self) -> String {
        format!("b{}", self.index)
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:b{}", self.index)
    }
}

static NEXT_ARENA: AtomicU32 = AtomicU32::new(0);

/// Document-scoped blank node allocator
///
/// Maps the labels found while parsing one document onto [`BlankNode`] handles,
/// so the same label always yields the same handle within that document.
#[derive(Debug, Clone)]
pub struct BlankNodeArena {
    id: u32,
    labels: Vec<String>,
    by_label: HashMap<String, BlankNode>,
}

impl Default for BlankNodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl BlankNodeArena {
    /// Create an empty arena with a fresh identity
    pub fn new() -> Self {
        Self {
            id: NEXT_ARENA.fetch_add(1, Ordering::Relaxed),
            labels: Vec::new(),
            by_label: HashMap::new(),
        }
    }

    /// Get the handle for `label`, allocating one on first sight
    pub fn intern(&mut self, label: &str) -> BlankNode {
        if let Some(node) = self.by_label.get(label) {
            return *node;
        }
        let node = BlankNode {
            arena: self.id,
            index: self.labels.len() as u32,
        };
        self.labels.push(label.to_string());
        self.by_label.insert(label.to_string(), node);
        node
    }

    /// The label a handle was interned under
    ///
    /// `None` for handles allocated by another arena.
    pub fn label(&self, node: BlankNode) -> Option<&str> {
        if node.arena != self.id {
            return None;
        }
        self.labels.get(node.index as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// RDF literal value
///
/// Every literal has exactly one datatype; plain literals carry `xsd:string`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    /// Create a simple literal (plain string)
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    /// Create a literal with language tag
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> RdfResult<Self> {
        OxLiteral::new_language_tagged_literal(value, language)
            .map(Self)
            .map_err(|e| RdfError::InvalidLiteral(e.to_string()))
    }

    /// Create a typed literal
    pub fn new_typed_literal(value: impl Into<String>, datatype: &str) -> Self {
        Self(OxLiteral::new_typed_literal(
            value,
            OxNamedNode::new_unchecked(datatype),
        ))
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        self.0.value()
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Get the datatype IRI
    pub fn datatype(&self) -> &str {
        self.0.datatype().as_str()
    }

    /// Get the inner oxrdf Literal
    pub fn inner(&self) -> &OxLiteral {
        &self.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // oxrdf renders N-Triples syntax, escapes included
        write!(f, "{}", self.0)
    }
}

impl From<OxLiteral> for Literal {
    fn from(lit: OxLiteral) -> Self {
        Self(lit)
    }
}

/// RDF subject (Reference or BlankNode)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfSubject {
    /// Named node (IRI)
    Reference(Reference),
    /// Blank node
    BlankNode(BlankNode),
}

impl RdfSubject {
    /// Check if this is a named node
    pub fn is_reference(&self) -> bool {
        matches!(self, RdfSubject::Reference(_))
    }

    /// Check if this is a blank node
    pub fn is_blank_node(&self) -> bool {
        matches!(self, RdfSubject::BlankNode(_))
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            RdfSubject::Reference(r) => Some(r),
            RdfSubject::BlankNode(_) => None,
        }
    }
}

impl fmt::Display for RdfSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfSubject::Reference(r) => write!(f, "<{}>", r),
            RdfSubject::BlankNode(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for RdfSubject {
    fn from(iri: &str) -> Self {
        RdfSubject::Reference(iri.to_string())
    }
}

impl From<String> for RdfSubject {
    fn from(iri: String) -> Self {
        RdfSubject::Reference(iri)
    }
}

impl From<&String> for RdfSubject {
    fn from(iri: &String) -> Self {
        RdfSubject::Reference(iri.clone())
    }
}

impl From<BlankNode> for RdfSubject {
    fn from(node: BlankNode) -> Self {
        RdfSubject::BlankNode(node)
    }
}

/// RDF object (Reference, BlankNode, or Literal)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfObject {
    /// Named node (IRI)
    Reference(Reference),
    /// Blank node
    BlankNode(BlankNode),
    /// Literal value
    Literal(Literal),
}

impl RdfObject {
    /// Object pointing at another named node
    pub fn reference(iri: impl Into<String>) -> Self {
        RdfObject::Reference(iri.into())
    }

    /// Check if this is a named node
    pub fn is_reference(&self) -> bool {
        matches!(self, RdfObject::Reference(_))
    }

    /// Check if this is a blank node
    pub fn is_blank_node(&self) -> bool {
        matches!(self, RdfObject::BlankNode(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, RdfObject::Literal(_))
    }
}

impl fmt::Display for RdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfObject::Reference(r) => write!(f, "<{}>", r),
            RdfObject::BlankNode(b) => write!(f, "{}", b),
            RdfObject::Literal(l) => write!(f, "{}", l),
        }
    }
}

impl From<BlankNode> for RdfObject {
    fn from(node: BlankNode) -> Self {
        RdfObject::BlankNode(node)
    }
}

impl From<Literal> for RdfObject {
    fn from(lit: Literal) -> Self {
        RdfObject::Literal(lit)
    }
}

impl From<RdfSubject> for RdfObject {
    fn from(subject: RdfSubject) -> Self {
        match subject {
            RdfSubject::Reference(r) => RdfObject::Reference(r),
            RdfSubject::BlankNode(b) => RdfObject::BlankNode(b),
        }
    }
}

/// RDF quad: a statement plus the document graph it belongs to
///
/// The graph is always a document reference, never a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    /// Subject
    pub subject: RdfSubject,
    /// Predicate
    pub predicate: Reference,
    /// Object
    pub object: RdfObject,
    /// Owning document
    pub graph: Reference,
}

impl Quad {
    /// Create a new quad
    pub fn new(
        subject: impl Into<RdfSubject>,
        predicate: impl Into<Reference>,
        object: impl Into<RdfObject>,
        graph: impl Into<Reference>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph: graph.into(),
        }
    }

    /// Same statement placed in another document graph
    pub fn in_graph(self, graph: impl Into<Reference>) -> Self {
        Self {
            graph: graph.into(),
            ..self
        }
    }

    /// Whether subject or object is a blank node
    pub fn has_blank_node(&self) -> bool {
        self.subject.is_blank_node() || self.object.is_blank_node()
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {} <{}> .",
            self.subject, self.predicate, self.object, self.graph
        )
    }
}

/// Quad pattern for queries
///
/// Subject, predicate and object are wildcards when `None`. The graph is always
/// required, so a pattern can never match statements of another document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadPattern {
    /// Subject (None = variable)
    pub subject: Option<RdfSubject>,
    /// Predicate (None = variable)
    pub predicate: Option<Reference>,
    /// Object (None = variable)
    pub object: Option<RdfObject>,
    /// Document graph
    pub graph: Reference,
}

impl QuadPattern {
    /// Pattern matching every statement of one document
    pub fn in_graph(graph: impl Into<Reference>) -> Self {
        Self {
            subject: None,
            predicate: None,
            object: None,
            graph: graph.into(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<RdfSubject>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_predicate(mut self, predicate: impl Into<Reference>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn with_object(mut self, object: impl Into<RdfObject>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Check if a quad matches this pattern
    pub fn matches(&self, quad: &Quad) -> bool {
        if self.graph != quad.graph {
            return false;
        }
        if let Some(ref s) = self.subject {
            if s != &quad.subject {
                return false;
            }
        }
        if let Some(ref p) = self.predicate {
            if p != &quad.predicate {
                return false;
            }
        }
        if let Some(ref o) = self.object {
            if o != &quad.object {
                return false;
            }
        }
        true
    }
}
