//! Pattern matching over a document's statements
//!
//! Given statements, a partial (subject, predicate, object) pattern and the
//! document to look in, return the subjects, predicates or objects of the
//! matching statements. Statements belonging to another document are never
//! visible, even when subject, predicate and object all match.

use super::types::{BlankNode, Literal, Quad, QuadPattern, RdfObject, RdfSubject, Reference};

/// Which slot of a matching statement to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRole {
    Subject,
    Predicate,
    Object,
}

/// A node found in a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    Reference(Reference),
    Literal(Literal),
    BlankNode(BlankNode),
}

impl Entity {
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Entity::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Entity::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_blank_node(&self) -> Option<BlankNode> {
        match self {
            Entity::BlankNode(b) => Some(*b),
            _ => None,
        }
    }

    /// The entity as a statement subject; literals cannot be subjects
    pub fn into_subject(self) -> Option<RdfSubject> {
        match self {
            Entity::Reference(r) => Some(RdfSubject::Reference(r)),
            Entity::BlankNode(b) => Some(RdfSubject::BlankNode(b)),
            Entity::Literal(_) => None,
        }
    }
}

impl From<RdfSubject> for Entity {
    fn from(subject: RdfSubject) -> Self {
        match subject {
            RdfSubject::Reference(r) => Entity::Reference(r),
            RdfSubject::BlankNode(b) => Entity::BlankNode(b),
        }
    }
}

impl From<RdfObject> for Entity {
    fn from(object: RdfObject) -> Self {
        match object {
            RdfObject::Reference(r) => Entity::Reference(r),
            RdfObject::BlankNode(b) => Entity::BlankNode(b),
            RdfObject::Literal(l) => Entity::Literal(l),
        }
    }
}

fn pattern(
    subject: Option<&RdfSubject>,
    predicate: Option<&str>,
    object: Option<&RdfObject>,
    document: &str,
) -> QuadPattern {
    QuadPattern {
        subject: subject.cloned(),
        predicate: predicate.map(str::to_string),
        object: object.cloned(),
        graph: document.to_string(),
    }
}

fn select(quad: &Quad, role: EntityRole) -> Entity {
    match role {
        EntityRole::Subject => quad.subject.clone().into(),
        EntityRole::Predicate => Entity::Reference(quad.predicate.clone()),
        EntityRole::Object => quad.object.clone().into(),
    }
}

/// First entity in `role` position among statements matching the pattern
pub fn find_entity<'a>(
    statements: impl IntoIterator<Item = &'a Quad>,
    role: EntityRole,
    subject: Option<&RdfSubject>,
    predicate: Option<&str>,
    object: Option<&RdfObject>,
    document: &str,
) -> Option<Entity> {
    let pattern = pattern(subject, predicate, object, document);
    statements
        .into_iter()
        .find(|quad| pattern.matches(quad))
        .map(|quad| select(quad, role))
}

/// All entities in `role` position among statements matching the pattern
///
/// Statement order is preserved and no deduplication is performed.
pub fn find_entities<'a>(
    statements: impl IntoIterator<Item = &'a Quad>,
    role: EntityRole,
    subject: Option<&RdfSubject>,
    predicate: Option<&str>,
    object: Option<&RdfObject>,
    document: &str,
) -> Vec<Entity> {
    let pattern = pattern(subject, predicate, object, document);
    statements
        .into_iter()
        .filter(|quad| pattern.matches(quad))
        .map(|quad| select(quad, role))
        .collect()
}

pub fn find_subject_in_statements<'a>(
    statements: impl IntoIterator<Item = &'a Quad>,
    predicate: &str,
    object: &RdfObject,
    document: &str,
) -> Option<Entity> {
    find_entity(statements, EntityRole::Subject, None, Some(predicate), Some(object), document)
}

pub fn find_subjects_in_statements<'a>(
    statements: impl IntoIterator<Item = &'a Quad>,
    predicate: &str,
    object: &RdfObject,
    document: &str,
) -> Vec<Entity> {
    find_entities(statements, EntityRole::Subject, None, Some(predicate), Some(object), document)
}

pub fn find_predicate_in_statements<'a>(
    statements: impl IntoIterator<Item = &'a Quad>,
    subject: &RdfSubject,
    object: &RdfObject,
    document: &str,
) -> Option<Entity> {
    find_entity(statements, EntityRole::Predicate, Some(subject), None, Some(object), document)
}

pub fn find_predicates_in_statements<'a>(
    statements: impl IntoIterator<Item = &'a Quad>,
    subject: &RdfSubject,
    object: &RdfObject,
    document: &str,
) -> Vec<Entity> {
    find_entities(statements, EntityRole::Predicate, Some(subject), None, Some(object), document)
}

pub fn find_object_in_statements<'a>(
    statements: impl IntoIterator<Item = &'a Quad>,
    subject: &RdfSubject,
    predicate: &str,
    document: &str,
) -> Option<Entity> {
    find_entity(statements, EntityRole::Object, Some(subject), Some(predicate), None, document)
}

pub fn find_objects_in_statements<'a>(
    statements: impl IntoIterator<Item = &'a Quad>,
    subject: &RdfSubject,
    predicate: &str,
    document: &str,
) -> Vec<Entity> {
    find_entities(statements, EntityRole::Object, Some(subject), Some(predicate), None, document)
}
