//! Linked Data documents
//!
//! A [`TripleDocument`] is one RDF graph addressed by URL. It hands out
//! [`TripleSubject`]s (one instance per subject, for the lifetime of the
//! document), finds subjects by pattern and commits their pending changes
//! in a single request: a PUT for a document that does not exist remotely
//! yet, a SPARQL Update PATCH otherwise.

pub mod headers;
mod subject;

pub use subject::{SubjectState, TripleSubject};

use crate::rdf::serialization::ParseError;
use crate::rdf::vocab::rdf;
use crate::rdf::{
    find_objects_in_statements, find_predicates_in_statements, find_subject_in_statements,
    find_subjects_in_statements, sparql_update, BlankNodeArena, Entity, Quad, QuadPattern,
    RdfFormat, RdfObject, RdfParser, RdfSerializer, RdfSubject, Reference, SerializeError,
    SharedStore,
};
use crate::transport::{Transport, TransportError, TransportResponse};
use chrono::Utc;
use indexmap::IndexMap;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Document errors
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Fetching the Document failed: {status} {status_text}.")]
    Fetch { status: u16, status_text: String },

    #[error("Creating the Document failed: {status} {status_text}.")]
    Create { status: u16, status_text: String },

    #[error("Updating the Document failed: {status} {status_text}.")]
    Update { status: u16, status_text: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error("Invalid document reference: {0}")]
    InvalidReference(String),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Options for [`TripleDocument::add_subject`]
#[derive(Debug, Clone, Default)]
pub struct AddSubjectOptions {
    pub identifier: Option<String>,
    pub identifier_prefix: Option<String>,
}

impl AddSubjectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed identifier instead of a generated one
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.identifier_prefix = Some(prefix.into());
        self
    }
}

/// Roughly chronological identifier for new subjects
///
/// Not suitable as a secret: it is a timestamp followed by random digits.
fn generate_identifier() -> String {
    let random: u64 = rand::thread_rng().gen_range(0..10_000_000_000_000_000);
    format!("{}{:016}", Utc::now().timestamp_millis(), random)
}

/// Canonical document reference: the URL without its fragment
pub(crate) fn document_reference(url: &str) -> DocumentResult<Reference> {
    // An empty reference resolves to the base without its fragment
    headers::resolve_reference(url, "")
        .ok_or_else(|| DocumentError::InvalidReference(url.to_string()))
}

fn status_of(response: &TransportResponse) -> (u16, String) {
    (response.status.as_u16(), response.status_text().to_string())
}

pub struct TripleDocument {
    reference: Reference,
    store: SharedStore,
    transport: Arc<dyn Transport>,
    format: RdfFormat,
    blank_nodes: Arc<BlankNodeArena>,
    subjects: IndexMap<RdfSubject, TripleSubject>,
    acl: Option<Reference>,
    updates_via: Option<Reference>,
    persisted: bool,
}

impl TripleDocument {
    /// Load a document and replace whatever the store held for it
    pub(crate) async fn fetch(
        url: &str,
        store: SharedStore,
        transport: Arc<dyn Transport>,
        format: RdfFormat,
    ) -> DocumentResult<Self> {
        let reference = document_reference(url)?;
        let response = transport.get(&reference).await?;
        if !response.is_success() {
            let (status, status_text) = status_of(&response);
            warn!(url = %reference, status, "fetching document failed");
            return Err(DocumentError::Fetch {
                status,
                status_text,
            });
        }

        let wire_format = response
            .content_type()
            .and_then(RdfFormat::from_media_type)
            .unwrap_or(RdfFormat::Turtle);
        let mut blank_nodes = BlankNodeArena::new();
        let quads = RdfParser::parse(&response.body, wire_format, &reference, &mut blank_nodes)?;
        info!(url = %reference, statements = quads.len(), "fetched document");
        store.write().unwrap().replace_graph(&reference, quads);

        let acl = headers::acl_from_link_header(response.header("Link").as_deref(), &reference);
        let updates_via =
            headers::updates_via(response.header("Updates-Via").as_deref(), &reference);

        Ok(Self {
            reference,
            store,
            transport,
            format,
            blank_nodes: Arc::new(blank_nodes),
            subjects: IndexMap::new(),
            acl,
            updates_via,
            persisted: true,
        })
    }

    /// A document that does not exist remotely yet
    ///
    /// `statements` replace whatever the store held for this URL, so they can
    /// be read and edited right away, and are written along with the first
    /// save. With `eager` the document is created right away.
    pub(crate) async fn create(
        url: &str,
        statements: Vec<Quad>,
        store: SharedStore,
        transport: Arc<dyn Transport>,
        format: RdfFormat,
        eager: bool,
    ) -> DocumentResult<Self> {
        let reference = document_reference(url)?;
        store.write().unwrap().replace_graph(&reference, statements);
        let mut document = Self {
            reference,
            store,
            transport,
            format,
            blank_nodes: Arc::new(BlankNodeArena::new()),
            subjects: IndexMap::new(),
            acl: None,
            updates_via: None,
            persisted: false,
        };
        if eager {
            document.put(&[], &[]).await?;
        }
        Ok(document)
    }

    /// The subject for `node`, constructed on first access
    ///
    /// Repeated calls with the same node return the same instance.
    pub fn get_subject(&mut self, node: impl Into<RdfSubject>) -> &mut TripleSubject {
        let node = node.into();
        let Self {
            reference,
            store,
            blank_nodes,
            subjects,
            ..
        } = self;
        subjects.entry(node.clone()).or_insert_with(|| {
            TripleSubject::new(reference.clone(), node, store.clone(), blank_nodes.clone())
        })
    }

    /// First blank node object of `subject` for `predicate`, as a cached subject
    ///
    /// Changes made through the returned subject are saved with the document.
    pub fn get_local_subject(
        &mut self,
        subject: impl Into<RdfSubject>,
        predicate: &str,
    ) -> Option<&mut TripleSubject> {
        let node = self.get_subject(subject).get_local_node(predicate)?;
        Some(self.get_subject(node))
    }

    pub fn get_all_local_subjects(
        &mut self,
        subject: impl Into<RdfSubject>,
        predicate: &str,
    ) -> Vec<&TripleSubject> {
        let nodes: Vec<RdfSubject> = self
            .get_subject(subject)
            .get_all_local_nodes(predicate)
            .into_iter()
            .map(RdfSubject::from)
            .collect();
        for node in &nodes {
            self.get_subject(node.clone());
        }
        nodes
            .iter()
            .filter_map(|node| self.subjects.get(node))
            .collect()
    }

    /// A subject that was already handed out by this document
    pub fn subject(&self, node: &RdfSubject) -> Option<&TripleSubject> {
        self.subjects.get(node)
    }

    /// A new subject at `{document}#{prefix}{identifier}`
    pub fn add_subject(&mut self, options: AddSubjectOptions) -> &mut TripleSubject {
        let identifier = options.identifier.unwrap_or_else(generate_identifier);
        let reference = format!(
            "{}#{}{}",
            self.reference,
            options.identifier_prefix.unwrap_or_default(),
            identifier
        );
        self.get_subject(reference)
    }

    fn graph_statements(&self) -> Vec<Quad> {
        self.store
            .read()
            .unwrap()
            .match_quads(&QuadPattern::in_graph(self.reference.as_str()))
    }

    fn cache_subjects(&mut self, entities: Vec<Entity>) -> Vec<RdfSubject> {
        let nodes: Vec<RdfSubject> = entities.into_iter().filter_map(Entity::into_subject).collect();
        for node in &nodes {
            self.get_subject(node.clone());
        }
        nodes
    }

    /// Subjects with `rdf:type` equal to `type_ref`
    pub fn get_subjects_of_type(&mut self, type_ref: &str) -> Vec<&TripleSubject> {
        self.find_subjects(rdf::TYPE, RdfObject::reference(type_ref))
    }

    /// First subject with the given predicate and object
    pub fn find_subject(
        &mut self,
        predicate: &str,
        object: impl Into<RdfObject>,
    ) -> Option<&mut TripleSubject> {
        let object = object.into();
        let statements = self.graph_statements();
        let node = find_subject_in_statements(&statements, predicate, &object, &self.reference)?
            .into_subject()?;
        Some(self.get_subject(node))
    }

    pub fn find_subjects(
        &mut self,
        predicate: &str,
        object: impl Into<RdfObject>,
    ) -> Vec<&TripleSubject> {
        let object = object.into();
        let statements = self.graph_statements();
        let found =
            find_subjects_in_statements(&statements, predicate, &object, &self.reference);
        let nodes = self.cache_subjects(found);
        nodes
            .iter()
            .filter_map(|node| self.subjects.get(node))
            .collect()
    }

    pub fn find_predicate(
        &self,
        subject: impl Into<RdfSubject>,
        object: impl Into<RdfObject>,
    ) -> Option<Reference> {
        self.find_predicates(subject, object).into_iter().next()
    }

    pub fn find_predicates(
        &self,
        subject: impl Into<RdfSubject>,
        object: impl Into<RdfObject>,
    ) -> Vec<Reference> {
        let statements = self.graph_statements();
        find_predicates_in_statements(
            &statements,
            &subject.into(),
            &object.into(),
            &self.reference,
        )
        .into_iter()
        .filter_map(|entity| entity.as_reference().map(str::to_string))
        .collect()
    }

    pub fn find_object(&self, subject: impl Into<RdfSubject>, predicate: &str) -> Option<Entity> {
        self.find_objects(subject, predicate).into_iter().next()
    }

    pub fn find_objects(&self, subject: impl Into<RdfSubject>, predicate: &str) -> Vec<Entity> {
        let statements = self.graph_statements();
        find_objects_in_statements(&statements, &subject.into(), predicate, &self.reference)
    }

    /// Every statement of this document currently in the store
    pub fn statements(&self) -> Vec<Quad> {
        self.graph_statements()
    }

    pub fn as_reference(&self) -> &str {
        &self.reference
    }

    /// ACL announced by the server, if exactly one was linked
    pub fn acl_ref(&self) -> Option<&str> {
        self.acl.as_deref()
    }

    /// Realtime update channel from `Updates-Via`
    pub fn web_socket_ref(&self) -> Option<&str> {
        self.updates_via.as_deref()
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Save every subject handed out so far
    pub async fn save(&mut self) -> DocumentResult<Vec<RdfSubject>> {
        let nodes: Vec<RdfSubject> = self.subjects.keys().cloned().collect();
        self.save_subjects(&nodes).await
    }

    /// Commit the pending changes of the given subjects in one request
    ///
    /// Subjects this document never handed out are skipped. Pending changes are
    /// only cleared once the server accepted them, so a failed save can be
    /// retried as is. Returns the subjects that were saved.
    pub async fn save_subjects(
        &mut self,
        subjects: &[RdfSubject],
    ) -> DocumentResult<Vec<RdfSubject>> {
        let mut nodes: Vec<RdfSubject> = Vec::new();
        for node in subjects {
            if !self.subjects.contains_key(node) {
                debug!(url = %self.reference, subject = %node, "skipping subject not handed out by this document");
                continue;
            }
            if !nodes.contains(node) {
                nodes.push(node.clone());
            }
        }

        let mut deletions = Vec::new();
        let mut additions = Vec::new();
        for node in &nodes {
            let (pending_deletions, pending_additions) = self.subjects[node].pending_statements();
            deletions.extend_from_slice(pending_deletions);
            additions.extend_from_slice(pending_additions);
        }

        if !self.persisted {
            self.put(&deletions, &additions).await?;
        } else if deletions.is_empty() && additions.is_empty() {
            debug!(url = %self.reference, "nothing to save");
        } else {
            self.patch(&deletions, &additions).await?;
        }

        for node in &nodes {
            if let Some(subject) = self.subjects.get_mut(node) {
                subject.on_save();
            }
        }
        self.refresh_subjects();
        Ok(nodes)
    }

    /// Create the document with its current statements after applying the diff
    async fn put(&mut self, deletions: &[Quad], additions: &[Quad]) -> DocumentResult<()> {
        let mut statements: Vec<Quad> = self
            .graph_statements()
            .into_iter()
            .filter(|quad| !deletions.contains(quad))
            .collect();
        for quad in additions {
            if !statements.contains(quad) {
                statements.push(quad.clone());
            }
        }

        let body = RdfSerializer::serialize(&statements, self.format)?;
        let response = self
            .transport
            .put(&self.reference, self.format.media_type(), body)
            .await?;
        if !response.is_success() {
            let (status, status_text) = status_of(&response);
            warn!(url = %self.reference, status, "creating document failed");
            return Err(DocumentError::Create {
                status,
                status_text,
            });
        }

        self.acl = headers::acl_from_link_header(response.header("Link").as_deref(), &self.reference);
        self.updates_via =
            headers::updates_via(response.header("Updates-Via").as_deref(), &self.reference);
        info!(url = %self.reference, statements = statements.len(), "created document");
        self.store
            .write()
            .unwrap()
            .replace_graph(&self.reference, statements);
        self.persisted = true;
        Ok(())
    }

    async fn patch(&mut self, deletions: &[Quad], additions: &[Quad]) -> DocumentResult<()> {
        let update = sparql_update(deletions, additions);
        let response = self.transport.patch(&self.reference, update).await?;
        if !response.is_success() {
            let (status, status_text) = status_of(&response);
            warn!(url = %self.reference, status, "updating document failed");
            return Err(DocumentError::Update {
                status,
                status_text,
            });
        }

        info!(
            url = %self.reference,
            deletions = deletions.len(),
            additions = additions.len(),
            "updated document"
        );
        let mut store = self.store.write().unwrap();
        for quad in deletions {
            store.remove(quad);
        }
        store.insert_all(additions.iter().cloned());
        Ok(())
    }

    fn refresh_subjects(&mut self) {
        for subject in self.subjects.values_mut() {
            subject.refresh();
        }
    }
}

impl std::fmt::Debug for TripleDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleDocument")
            .field("reference", &self.reference)
            .field("subjects", &self.subjects.len())
            .field("acl", &self.acl)
            .field("updates_via", &self.updates_via)
            .field("persisted", &self.persisted)
            .finish()
    }
}
