//! SPARQL 1.1 Update requests for differential saves

use crate::rdf::types::{Quad, RdfObject, RdfSubject};
use std::fmt::Write;

fn subject_term(subject: &RdfSubject, as_variable: bool) -> String {
    match subject {
        RdfSubject::Reference(iri) => format!("<{}>", iri),
        RdfSubject::BlankNode(b) if as_variable => format!("?{}", b.wire_label()),
        RdfSubject::BlankNode(b) => b.to_string(),
    }
}

fn object_term(object: &RdfObject, as_variable: bool) -> String {
    match object {
        RdfObject::Reference(iri) => format!("<{}>", iri),
        RdfObject::BlankNode(b) if as_variable => format!("?{}", b.wire_label()),
        RdfObject::BlankNode(b) => b.to_string(),
        RdfObject::Literal(l) => l.to_string(),
    }
}

fn triples<'a>(quads: impl IntoIterator<Item = &'a Quad>, as_variables: bool) -> String {
    let mut out = String::new();
    for quad in quads {
        let _ = writeln!(
            out,
            "  {} <{}> {} .",
            subject_term(&quad.subject, as_variables),
            quad.predicate,
            object_term(&quad.object, as_variables)
        );
    }
    out
}

/// Build the update request that turns the stored document into the new state
///
/// Deletions are emitted before insertions. Blank nodes cannot be named in
/// `DELETE DATA`, so deletions touching them become a `DELETE ... WHERE`
/// with the blank nodes bound as variables. Returns an empty string when both
/// sides are empty.
pub fn sparql_update(deletions: &[Quad], additions: &[Quad]) -> String {
    let mut operations = Vec::new();

    let (with_blank, ground): (Vec<&Quad>, Vec<&Quad>) =
        deletions.iter().partition(|quad| quad.has_blank_node());

    if !ground.is_empty() {
        operations.push(format!("DELETE DATA {{\n{}}}", triples(ground, false)));
    }
    if !with_blank.is_empty() {
        let body = triples(with_blank, true);
        operations.push(format!("DELETE {{\n{}}} WHERE {{\n{}}}", body, body));
    }
    if !additions.is_empty() {
        operations.push(format!("INSERT DATA {{\n{}}}", triples(additions, false)));
    }

    operations.join(";\n")
}
