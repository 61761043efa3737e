//! One subject node within a document
//!
//! A [`TripleSubject`] reads from a snapshot of the statements the store held
//! for it when it was constructed (or last saved) and buffers every mutation
//! as a pending deletion or addition. Nothing reaches the store until the
//! owning document saves successfully.

use crate::rdf::vocab::rdf;
use crate::rdf::{
    decode_date_time, decode_decimal, decode_integer, find_objects_in_statements, from_literal,
    is_date_time_literal, is_decimal_literal, is_integer_literal, is_string_literal, to_literal,
    BlankNode, BlankNodeArena, Entity, Literal, LiteralValue, Quad, QuadPattern, RdfObject, RdfResult,
    RdfSubject, Reference, SharedStore,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

/// Whether a subject has unsaved changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectState {
    Clean,
    Dirty,
}

#[derive(Debug)]
pub struct TripleSubject {
    document: Reference,
    node: RdfSubject,
    store: SharedStore,
    blank_nodes: Arc<BlankNodeArena>,
    statements: Vec<Quad>,
    pending_deletions: Vec<Quad>,
    pending_additions: Vec<Quad>,
}

impl TripleSubject {
    pub(crate) fn new(
        document: Reference,
        node: RdfSubject,
        store: SharedStore,
        blank_nodes: Arc<BlankNodeArena>,
    ) -> Self {
        let mut subject = Self {
            document,
            node,
            store,
            blank_nodes,
            statements: Vec::new(),
            pending_deletions: Vec::new(),
            pending_additions: Vec::new(),
        };
        subject.refresh();
        subject
    }

    /// Re-read this subject's statements from the store
    pub(crate) fn refresh(&mut self) {
        let pattern = QuadPattern::in_graph(self.document.as_str()).with_subject(self.node.clone());
        self.statements = self.store.read().unwrap().match_quads(&pattern);
    }

    fn objects(&self, predicate: &str) -> Vec<Entity> {
        find_objects_in_statements(&self.statements, &self.node, predicate, &self.document)
    }

    fn literals(&self, predicate: &str) -> impl Iterator<Item = Literal> {
        self.objects(predicate)
            .into_iter()
            .filter_map(|entity| match entity {
                Entity::Literal(literal) => Some(literal),
                _ => None,
            })
    }

    /// Decode the literals of one datatype, skipping malformed lexical forms
    fn decoded<T>(
        &self,
        predicate: &str,
        matches: fn(&Literal) -> bool,
        decode: fn(&Literal) -> RdfResult<T>,
    ) -> impl Iterator<Item = T> {
        let subject = self.node.clone();
        let predicate = predicate.to_string();
        self.literals(&predicate)
            .filter(move |literal| matches(literal))
            .filter_map(move |literal| match decode(&literal) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(subject = %subject, predicate = %predicate, error = %e, "skipping undecodable literal");
                    None
                }
            })
    }

    fn decode_string(literal: &Literal) -> RdfResult<String> {
        Ok(literal.value().to_string())
    }

    pub fn get_string(&self, predicate: &str) -> Option<String> {
        self.decoded(predicate, is_string_literal, Self::decode_string)
            .next()
    }

    pub fn get_all_strings(&self, predicate: &str) -> Vec<String> {
        self.decoded(predicate, is_string_literal, Self::decode_string)
            .collect()
    }

    pub fn get_integer(&self, predicate: &str) -> Option<i64> {
        self.decoded(predicate, is_integer_literal, decode_integer)
            .next()
    }

    pub fn get_all_integers(&self, predicate: &str) -> Vec<i64> {
        self.decoded(predicate, is_integer_literal, decode_integer)
            .collect()
    }

    pub fn get_decimal(&self, predicate: &str) -> Option<f64> {
        self.decoded(predicate, is_decimal_literal, decode_decimal)
            .next()
    }

    pub fn get_all_decimals(&self, predicate: &str) -> Vec<f64> {
        self.decoded(predicate, is_decimal_literal, decode_decimal)
            .collect()
    }

    pub fn get_date_time(&self, predicate: &str) -> Option<DateTime<Utc>> {
        self.decoded(predicate, is_date_time_literal, decode_date_time)
            .next()
    }

    pub fn get_all_date_times(&self, predicate: &str) -> Vec<DateTime<Utc>> {
        self.decoded(predicate, is_date_time_literal, decode_date_time)
            .collect()
    }

    /// First literal of any datatype, in its native form
    pub fn get_literal(&self, predicate: &str) -> Option<LiteralValue> {
        self.decoded(predicate, |_| true, from_literal).next()
    }

    pub fn get_all_literals(&self, predicate: &str) -> Vec<LiteralValue> {
        self.decoded(predicate, |_| true, from_literal).collect()
    }

    /// First object that is a named node
    pub fn get_ref(&self, predicate: &str) -> Option<Reference> {
        self.objects(predicate)
            .into_iter()
            .find_map(|entity| match entity {
                Entity::Reference(reference) => Some(reference),
                _ => None,
            })
    }

    pub fn get_all_refs(&self, predicate: &str) -> Vec<Reference> {
        self.objects(predicate)
            .into_iter()
            .filter_map(|entity| match entity {
                Entity::Reference(reference) => Some(reference),
                _ => None,
            })
            .collect()
    }

    /// `rdf:type` of this subject
    pub fn get_type(&self) -> Option<Reference> {
        self.get_ref(rdf::TYPE)
    }

    /// First blank node object of `predicate`
    ///
    /// Pass it to [`TripleDocument::get_subject`](super::TripleDocument::get_subject)
    /// to read or edit it as a subject of the same document.
    pub fn get_local_node(&self, predicate: &str) -> Option<BlankNode> {
        self.objects(predicate)
            .into_iter()
            .find_map(|entity| entity.as_blank_node())
    }

    pub fn get_all_local_nodes(&self, predicate: &str) -> Vec<BlankNode> {
        self.objects(predicate)
            .into_iter()
            .filter_map(|entity| entity.as_blank_node())
            .collect()
    }

    fn statement(&self, predicate: &str, object: RdfObject) -> Quad {
        Quad::new(self.node.clone(), predicate, object, self.document.as_str())
    }

    pub fn add_literal(&mut self, predicate: &str, value: impl Into<LiteralValue>) {
        let quad = self.statement(predicate, to_literal(&value.into()).into());
        self.pending_additions.push(quad);
    }

    pub fn add_ref(&mut self, predicate: &str, reference: &str) {
        let quad = self.statement(predicate, RdfObject::reference(reference));
        self.pending_additions.push(quad);
    }

    /// Schedule deletion of one statement, whether or not it exists
    pub fn remove_literal(&mut self, predicate: &str, value: impl Into<LiteralValue>) {
        let quad = self.statement(predicate, to_literal(&value.into()).into());
        self.pending_deletions.push(quad);
    }

    pub fn remove_ref(&mut self, predicate: &str, reference: &str) {
        let quad = self.statement(predicate, RdfObject::reference(reference));
        self.pending_deletions.push(quad);
    }

    /// Schedule deletion of every known statement for `predicate`
    pub fn remove_all(&mut self, predicate: &str) {
        let matching = self
            .statements
            .iter()
            .filter(|quad| quad.predicate == predicate)
            .cloned();
        self.pending_deletions.extend(matching);
    }

    /// Replace every value of `predicate` with this literal
    pub fn set_literal(&mut self, predicate: &str, value: impl Into<LiteralValue>) {
        self.remove_all(predicate);
        self.add_literal(predicate, value);
    }

    pub fn set_ref(&mut self, predicate: &str, reference: &str) {
        self.remove_all(predicate);
        self.add_ref(predicate, reference);
    }

    /// Schedule deletion of every known statement about this subject
    pub fn clear(&mut self) {
        self.pending_deletions.extend(self.statements.iter().cloned());
    }

    /// Pending `(deletions, additions)`
    pub fn pending_statements(&self) -> (&[Quad], &[Quad]) {
        (&self.pending_deletions, &self.pending_additions)
    }

    /// Forget pending changes once they have been committed
    pub fn on_save(&mut self) {
        self.pending_deletions.clear();
        self.pending_additions.clear();
    }

    pub fn state(&self) -> SubjectState {
        if self.pending_deletions.is_empty() && self.pending_additions.is_empty() {
            SubjectState::Clean
        } else {
            SubjectState::Dirty
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state() == SubjectState::Dirty
    }

    /// The subject's IRI, or the document-local label of a blank node
    ///
    /// A blank node label is only meaningful within this document.
    pub fn as_reference(&self) -> Reference {
        match &self.node {
            RdfSubject::Reference(reference) => reference.clone(),
            RdfSubject::BlankNode(node) => self
                .blank_nodes
                .label(*node)
                .map(str::to_string)
                .unwrap_or_else(|| node.wire_label()),
        }
    }

    pub fn as_node(&self) -> &RdfSubject {
        &self.node
    }

    /// Statements about this subject as last read from the store
    pub fn statements(&self) -> &[Quad] {
        &self.statements
    }

    /// Reference of the owning document
    pub fn document(&self) -> &str {
        &self.document
    }
}
