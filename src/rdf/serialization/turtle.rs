//! Turtle and N-Triples implementation

use super::{ParseError, ParseResult, RdfFormat, SerializeError, SerializeResult};
use crate::rdf::literal::XsdDatatype;
use crate::rdf::types::{BlankNodeArena, Literal, Quad, RdfObject, RdfSubject};
use rio_api::formatter::TriplesFormatter;
use rio_api::model::{
    BlankNode as RioBlankNode, Literal as RioLiteral, NamedNode as RioNamedNode,
    Subject as RioSubject, Term as RioTerm, Triple as RioTriple,
};
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleFormatter, TurtleParser};
use std::io::Cursor;

pub(super) fn parse_turtle(
    input: &str,
    document: &str,
    blank_nodes: &mut BlankNodeArena,
) -> ParseResult<Vec<Quad>> {
    let base = oxiri::Iri::parse(document.to_string())
        .map_err(|e| ParseError::Parse(format!("invalid base IRI {}: {}", document, e)))?;
    let mut parser = TurtleParser::new(Cursor::new(input), Some(base));
    collect_quads(&mut parser, document, blank_nodes)
}

pub(super) fn parse_ntriples(
    input: &str,
    document: &str,
    blank_nodes: &mut BlankNodeArena,
) -> ParseResult<Vec<Quad>> {
    let mut parser = NTriplesParser::new(Cursor::new(input));
    collect_quads(&mut parser, document, blank_nodes)
}

fn collect_quads<P>(
    parser: &mut P,
    document: &str,
    blank_nodes: &mut BlankNodeArena,
) -> ParseResult<Vec<Quad>>
where
    P: TriplesParser,
    ParseError: From<P::Error>,
{
    let mut quads = Vec::new();
    parser.parse_all(&mut |t: RioTriple<'_>| -> ParseResult<()> {
        let subject = convert_subject(t.subject, blank_nodes)?;
        let object = convert_object(t.object, blank_nodes)?;
        quads.push(Quad::new(subject, t.predicate.iri, object, document));
        Ok(())
    })?;
    Ok(quads)
}

fn convert_subject(
    s: RioSubject<'_>,
    blank_nodes: &mut BlankNodeArena,
) -> ParseResult<RdfSubject> {
    match s {
        RioSubject::NamedNode(n) => Ok(RdfSubject::Reference(n.iri.to_string())),
        RioSubject::BlankNode(b) => Ok(RdfSubject::BlankNode(blank_nodes.intern(b.id))),
        _ => Err(ParseError::Parse("Unsupported subject type".to_string())),
    }
}

fn convert_object(o: RioTerm<'_>, blank_nodes: &mut BlankNodeArena) -> ParseResult<RdfObject> {
    match o {
        RioTerm::NamedNode(n) => Ok(RdfObject::Reference(n.iri.to_string())),
        RioTerm::BlankNode(b) => Ok(RdfObject::BlankNode(blank_nodes.intern(b.id))),
        RioTerm::Literal(l) => match l {
            RioLiteral::Simple { value } => Ok(Literal::new_simple_literal(value).into()),
            RioLiteral::LanguageTaggedString { value, language } => {
                Literal::new_language_tagged_literal(value, language)
                    .map(RdfObject::Literal)
                    .map_err(|e| ParseError::Parse(e.to_string()))
            }
            RioLiteral::Typed { value, datatype } => {
                Ok(Literal::new_typed_literal(value, datatype.iri).into())
            }
        },
        _ => Err(ParseError::Parse("Unsupported object type".to_string())),
    }
}

pub(super) fn serialize(quads: &[Quad], format: RdfFormat) -> SerializeResult<String> {
    let mut output = Vec::new();
    match format {
        RdfFormat::Turtle => {
            let mut formatter = TurtleFormatter::new(&mut output);
            format_all(&mut formatter, quads)?;
            // Turtle closes its last statement on finish
            formatter.finish()?;
        }
        RdfFormat::NTriples => {
            let mut formatter = NTriplesFormatter::new(&mut output);
            format_all(&mut formatter, quads)?;
            let _ = formatter.finish();
        }
    }
    String::from_utf8(output).map_err(|e| SerializeError::Serialize(e.to_string()))
}

fn format_all<F: TriplesFormatter>(formatter: &mut F, quads: &[Quad]) -> SerializeResult<()> {
    for quad in quads {
        let subject_label;
        let subject = match &quad.subject {
            RdfSubject::Reference(iri) => RioSubject::NamedNode(RioNamedNode { iri: iri.as_str() }),
            RdfSubject::BlankNode(b) => {
                subject_label = b.wire_label();
                RioSubject::BlankNode(RioBlankNode { id: &subject_label })
            }
        };

        let object_label;
        let object = match &quad.object {
            RdfObject::Reference(iri) => RioTerm::NamedNode(RioNamedNode { iri: iri.as_str() }),
            RdfObject::BlankNode(b) => {
                object_label = b.wire_label();
                RioTerm::BlankNode(RioBlankNode { id: &object_label })
            }
            RdfObject::Literal(l) => RioTerm::Literal(match l.language() {
                Some(language) => RioLiteral::LanguageTaggedString {
                    value: l.value(),
                    language,
                },
                None if l.datatype() == XsdDatatype::String.iri() => {
                    RioLiteral::Simple { value: l.value() }
                }
                None => RioLiteral::Typed {
                    value: l.value(),
                    datatype: RioNamedNode { iri: l.datatype() },
                },
            }),
        };

        let triple = RioTriple {
            subject,
            predicate: RioNamedNode {
                iri: quad.predicate.as_str(),
            },
            object,
        };
        formatter
            .format(&triple)
            .map_err(|e| SerializeError::Serialize(e.to_string()))?;
    }
    Ok(())
}
