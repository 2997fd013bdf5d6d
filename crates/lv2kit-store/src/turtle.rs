//! Turtle documents read through `oxttl`
//!
//! Relative IRIs are resolved by the parser against the document base.
//! Blank node labels are rewritten with a caller-supplied prefix so that
//! documents read into the same model never share blank nodes.

use crate::errors::StoreError;
use crate::model::Model;
use crate::types::{Literal, Term, Triple};
use oxrdf::vocab::{rdf, xsd};
use oxttl::TurtleParser;

/// Converts parsed statements into store terms
struct Converter<'a> {
    blank_prefix: &'a str,
}

impl Converter<'_> {
    fn blank(&self, node: &oxrdf::BlankNode) -> Term {
        Term::blank(format!("{}{}", self.blank_prefix, node.as_str()))
    }

    fn subject(&self, subject: oxrdf::Subject) -> Option<Term> {
        if let oxrdf::Subject::NamedNode(node) = subject {
            Some(Term::iri(node.into_string()))
        } else if let oxrdf::Subject::BlankNode(node) = subject {
            Some(self.blank(&node))
        } else {
            None
        }
    }

    fn object(&self, object: oxrdf::Term) -> Option<Term> {
        if let oxrdf::Term::NamedNode(node) = object {
            Some(Term::iri(node.into_string()))
        } else if let oxrdf::Term::BlankNode(node) = object {
            Some(self.blank(&node))
        } else if let oxrdf::Term::Literal(literal) = object {
            Some(Term::Literal(literal_of(&literal)))
        } else {
            None
        }
    }

    fn triple(&self, triple: oxrdf::Triple) -> Option<Triple> {
        Some(Triple::new(
            self.subject(triple.subject)?,
            Term::iri(triple.predicate.into_string()),
            self.object(triple.object)?,
        ))
    }
}

/// Plain strings carry neither datatype nor language
fn literal_of(literal: &oxrdf::Literal) -> Literal {
    let datatype = literal.datatype();
    Literal {
        value: literal.value().into(),
        datatype: (datatype != xsd::STRING && datatype != rdf::LANG_STRING)
            .then(|| datatype.as_str().into()),
        language: literal.language().map(Into::into),
    }
}

/// Parse `text` into `model`, stopping at the first syntax error
///
/// An empty `base_uri` leaves relative IRIs unresolvable.
pub(crate) fn read_into(
    model: &mut Model,
    text: &str,
    base_uri: &str,
    blank_prefix: &str,
) -> Result<(), StoreError> {
    let mut parser = TurtleParser::new();
    if !base_uri.is_empty() {
        parser = parser
            .with_base_iri(base_uri)
            .map_err(|e| StoreError::InvalidBase {
                base: base_uri.to_string(),
                message: e.to_string(),
            })?;
    }

    let converter = Converter { blank_prefix };
    for parsed in parser.for_slice(text.as_bytes()) {
        match parsed {
            Ok(triple) => {
                if let Some(triple) = converter.triple(triple) {
                    model.insert(triple);
                }
            }
            Err(e) => {
                let start = e.location().start;
                return Err(StoreError::Parse {
                    line: start.line as usize + 1,
                    column: start.column as usize + 1,
                    message: e.message().to_string(),
                });
            }
        }
    }
    Ok(())
}
