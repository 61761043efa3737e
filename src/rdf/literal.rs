//! Conversion between native values and RDF literals
//!
//! Four XSD datatypes get native treatment: `xsd:string`, `xsd:integer`,
//! `xsd:decimal` and `xsd:dateTime`. Literals of any other datatype are only
//! ever surfaced as their raw lexical value.

use super::types::{Literal, RdfError, RdfResult};
use super::vocab::rdf::LANG_STRING as RDF_LANG_STRING;
use chrono::{DateTime, TimeZone, Utc};

/// Datatypes with a native representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XsdDatatype {
    String,
    Integer,
    Decimal,
    DateTime,
}

/// Datatype ↔ IRI table, used for both encoding and classification
const DATATYPE_IRIS: [(XsdDatatype, &str); 4] = [
    (XsdDatatype::String, "http://www.w3.org/2001/XMLSchema#string"),
    (XsdDatatype::Integer, "http://www.w3.org/2001/XMLSchema#integer"),
    (XsdDatatype::Decimal, "http://www.w3.org/2001/XMLSchema#decimal"),
    (XsdDatatype::DateTime, "http://www.w3.org/2001/XMLSchema#dateTime"),
];

impl XsdDatatype {
    /// All supported datatypes
    pub const ALL: [XsdDatatype; 4] = [
        XsdDatatype::String,
        XsdDatatype::Integer,
        XsdDatatype::Decimal,
        XsdDatatype::DateTime,
    ];

    /// The datatype IRI
    pub fn iri(self) -> &'static str {
        DATATYPE_IRIS
            .iter()
            .find(|(datatype, _)| *datatype == self)
            .map(|(_, iri)| *iri)
            .unwrap_or_default()
    }

    /// Look up a datatype by IRI
    pub fn from_iri(iri: &str) -> Option<Self> {
        DATATYPE_IRIS
            .iter()
            .find(|(_, candidate)| *candidate == iri)
            .map(|(datatype, _)| *datatype)
    }
}

/// A literal value in its native form
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Integer(i64),
    Decimal(f64),
    DateTime(DateTime<Utc>),
}

impl LiteralValue {
    /// The datatype this value is written as
    pub fn datatype(&self) -> XsdDatatype {
        match self {
            LiteralValue::String(_) => XsdDatatype::String,
            LiteralValue::Integer(_) => XsdDatatype::Integer,
            LiteralValue::Decimal(d) if integral(*d).is_some() => XsdDatatype::Integer,
            LiteralValue::Decimal(_) => XsdDatatype::Decimal,
            LiteralValue::DateTime(_) => XsdDatatype::DateTime,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Integer(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Integer(value.into())
    }
}

impl From<u32> for LiteralValue {
    fn from(value: u32) -> Self {
        LiteralValue::Integer(value.into())
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Decimal(value)
    }
}

impl From<DateTime<Utc>> for LiteralValue {
    fn from(value: DateTime<Utc>) -> Self {
        LiteralValue::DateTime(value)
    }
}

/// Integral value of a float, if it has no fractional part and fits exactly
fn integral(value: f64) -> Option<i64> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        Some(value as i64)
    } else {
        None
    }
}

/// Encode a native value as a literal
///
/// Date-times are written in UTC with whole-second precision; a float without
/// a fractional part is written as `xsd:integer`.
pub fn to_literal(value: &LiteralValue) -> Literal {
    match value {
        LiteralValue::String(s) => Literal::new_simple_literal(s.as_str()),
        LiteralValue::Integer(i) => {
            Literal::new_typed_literal(i.to_string(), XsdDatatype::Integer.iri())
        }
        LiteralValue::Decimal(d) => match integral(*d) {
            Some(i) => Literal::new_typed_literal(i.to_string(), XsdDatatype::Integer.iri()),
            None => Literal::new_typed_literal(d.to_string(), XsdDatatype::Decimal.iri()),
        },
        LiteralValue::DateTime(dt) => Literal::new_typed_literal(
            dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            XsdDatatype::DateTime.iri(),
        ),
    }
}

/// Decode a literal into its native form, dispatching on the datatype
///
/// Unsupported datatypes decode to their raw string value.
pub fn from_literal(literal: &Literal) -> RdfResult<LiteralValue> {
    match classify(literal) {
        Some(XsdDatatype::DateTime) => decode_date_time(literal).map(LiteralValue::DateTime),
        Some(XsdDatatype::Integer) => decode_integer(literal).map(LiteralValue::Integer),
        Some(XsdDatatype::Decimal) => decode_decimal(literal).map(LiteralValue::Decimal),
        Some(XsdDatatype::String) | None => Ok(LiteralValue::String(literal.value().to_string())),
    }
}

/// Base-10 integer decoding
pub fn decode_integer(literal: &Literal) -> RdfResult<i64> {
    literal
        .value()
        .trim()
        .parse::<i64>()
        .map_err(|e| RdfError::InvalidLiteral(format!("{}: {}", literal, e)))
}

pub fn decode_decimal(literal: &Literal) -> RdfResult<f64> {
    literal
        .value()
        .trim()
        .parse::<f64>()
        .map_err(|e| RdfError::InvalidLiteral(format!("{}: {}", literal, e)))
}

/// Positional `YYYY-MM-DDTHH:MM:SS` decoding, always UTC
///
/// Fractional seconds are ignored.
pub fn decode_date_time(literal: &Literal) -> RdfResult<DateTime<Utc>> {
    let value = literal.value();
    let invalid = || RdfError::InvalidLiteral(literal.to_string());
    let field = |start: usize, end: usize| -> RdfResult<u32> {
        value
            .get(start..end)
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or_else(invalid)
    };

    let year = value
        .get(0..4)
        .and_then(|digits| digits.parse::<i32>().ok())
        .ok_or_else(invalid)?;
    let month = field(5, 7)?;
    let day = field(8, 10)?;
    let hour = field(11, 13)?;
    let minute = field(14, 16)?;
    let seconds_digits: String = value
        .get(17..)
        .unwrap_or_default()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let second = seconds_digits.parse::<u32>().map_err(|_| invalid())?;

    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .ok_or_else(invalid)
}

/// Which supported datatype a literal has, if any
pub fn classify(literal: &Literal) -> Option<XsdDatatype> {
    XsdDatatype::from_iri(literal.datatype())
}

pub fn is_string_literal(literal: &Literal) -> bool {
    classify(literal) == Some(XsdDatatype::String)
}

pub fn is_integer_literal(literal: &Literal) -> bool {
    classify(literal) == Some(XsdDatatype::Integer)
}

pub fn is_decimal_literal(literal: &Literal) -> bool {
    classify(literal) == Some(XsdDatatype::Decimal)
}

pub fn is_date_time_literal(literal: &Literal) -> bool {
    classify(literal) == Some(XsdDatatype::DateTime)
}

/// Language-tagged string in the given locale (case-insensitive)
pub fn is_locale_string_literal(literal: &Literal, locale: &str) -> bool {
    literal.datatype() == RDF_LANG_STRING
        && literal
            .language()
            .map(|language| language.eq_ignore_ascii_case(locale))
            .unwrap_or(false)
}
