//! Vocabulary namespaces and prefix management
//!
//! Common Linked Data vocabularies as constants, plus a small manager for
//! expanding and compacting `prefix:local` names.

use super::types::Reference;
use std::collections::HashMap;
use thiserror::Error;

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Not a `prefix:local` name
    #[error("Invalid compact IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Namespace (prefix → IRI mapping)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: &'static str,
    pub iri: &'static str,
}

impl Namespace {
    pub const fn new(prefix: &'static str, iri: &'static str) -> Self {
        Self { prefix, iri }
    }

    /// Full reference of a term in this namespace
    pub fn term(&self, local: &str) -> Reference {
        format!("{}{}", self.iri, local)
    }
}

pub const RDF: Namespace = Namespace::new("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
pub const RDFS: Namespace = Namespace::new("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
pub const XSD: Namespace = Namespace::new("xsd", "http://www.w3.org/2001/XMLSchema#");
pub const SCHEMA: Namespace = Namespace::new("schema", "http://schema.org/");
pub const FOAF: Namespace = Namespace::new("foaf", "http://xmlns.com/foaf/0.1/");
pub const VCARD: Namespace = Namespace::new("vcard", "http://www.w3.org/2006/vcard/ns#");
pub const ACL: Namespace = Namespace::new("acl", "http://www.w3.org/ns/auth/acl#");
pub const LDP: Namespace = Namespace::new("ldp", "http://www.w3.org/ns/ldp#");
pub const SOLID: Namespace = Namespace::new("solid", "http://www.w3.org/ns/solid/terms#");
pub const DCT: Namespace = Namespace::new("dct", "http://purl.org/dc/terms/");

/// Every namespace registered by default
pub const NAMESPACES: [Namespace; 10] = [RDF, RDFS, XSD, SCHEMA, FOAF, VCARD, ACL, LDP, SOLID, DCT];

pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

pub mod rdfs {
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    pub const SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
}

pub mod schema {
    pub const NAME: &str = "http://schema.org/name";
    pub const TEXT: &str = "http://schema.org/text";
    pub const DATE_CREATED: &str = "http://schema.org/dateCreated";
    pub const DATE_MODIFIED: &str = "http://schema.org/dateModified";
    pub const TEXT_DIGITAL_DOCUMENT: &str = "http://schema.org/TextDigitalDocument";
}

pub mod foaf {
    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
    pub const NICK: &str = "http://xmlns.com/foaf/0.1/nick";
    pub const KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";
    pub const AGE: &str = "http://xmlns.com/foaf/0.1/age";
    pub const PERSON: &str = "http://xmlns.com/foaf/0.1/Person";
}

pub mod vcard {
    pub const FN: &str = "http://www.w3.org/2006/vcard/ns#fn";
    pub const HAS_EMAIL: &str = "http://www.w3.org/2006/vcard/ns#hasEmail";
    pub const HAS_TELEPHONE: &str = "http://www.w3.org/2006/vcard/ns#hasTelephone";
    pub const VALUE: &str = "http://www.w3.org/2006/vcard/ns#value";
}

pub mod acl {
    pub const AUTHORIZATION: &str = "http://www.w3.org/ns/auth/acl#Authorization";
    pub const AGENT: &str = "http://www.w3.org/ns/auth/acl#agent";
    pub const ACCESS_TO: &str = "http://www.w3.org/ns/auth/acl#accessTo";
    pub const MODE: &str = "http://www.w3.org/ns/auth/acl#mode";
    pub const READ: &str = "http://www.w3.org/ns/auth/acl#Read";
    pub const WRITE: &str = "http://www.w3.org/ns/auth/acl#Write";
    pub const CONTROL: &str = "http://www.w3.org/ns/auth/acl#Control";
}

pub mod ldp {
    pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
    pub const CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
    pub const RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
}

pub mod solid {
    pub const PUBLIC_TYPE_INDEX: &str = "http://www.w3.org/ns/solid/terms#publicTypeIndex";
    pub const TYPE_REGISTRATION: &str = "http://www.w3.org/ns/solid/terms#TypeRegistration";
    pub const FOR_CLASS: &str = "http://www.w3.org/ns/solid/terms#forClass";
    pub const INSTANCE: &str = "http://www.w3.org/ns/solid/terms#instance";
}

pub mod dct {
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const CREATED: &str = "http://purl.org/dc/terms/created";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
}

/// Namespace manager with common prefixes
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    prefixes: HashMap<String, String>,
}

impl NamespaceManager {
    /// Create a new namespace manager with the common prefixes
    pub fn new() -> Self {
        let mut mgr = Self {
            prefixes: HashMap::new(),
        };
        for ns in NAMESPACES {
            mgr.add_prefix(ns.prefix, ns.iri);
        }
        mgr
    }

    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<Reference> {
        let (prefix, local) = compact_iri
            .split_once(':')
            .ok_or_else(|| PrefixError::InvalidIri(compact_iri.to_string()))?;
        Ok(format!("{}{}", self.get_iri(prefix)?, local))
    }

    /// Compact an IRI using the longest matching namespace
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| format!("{}:{}", prefix, &iri[ns.len()..]))
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}
