//! Statement types for the lv2kit triple store
//!
//! This module provides:
//! - `Term` as the unit exchanged with the store (IRI, blank node or literal)
//! - `Arc<str>` backed text so interned IRIs are shared across statements
//! - `Triple` with pattern matching against optional positions

use std::fmt;
use std::sync::Arc;

/// XML Schema datatype namespace
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// RDF namespace
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

// =============================================================================
// TERM - Subject, predicate or object position
// =============================================================================

/// A node in the statement graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(Arc<str>),
    Blank(Arc<str>),
    Literal(Literal),
}

impl Term {
    pub fn iri(value: impl Into<Arc<str>>) -> Self {
        Term::Iri(value.into())
    }

    pub fn blank(label: impl Into<Arc<str>>) -> Self {
        Term::Blank(label.into())
    }

    /// Plain string literal without datatype or language
    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: None,
            language: None,
        })
    }

    /// Literal with an explicit datatype IRI
    pub fn typed(value: impl Into<Arc<str>>, datatype: impl Into<Arc<str>>) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        })
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// IRIs and blank nodes may appear in subject position
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Lexical text of the term: the IRI, the blank label or the literal value
    pub fn text(&self) -> &str {
        match self {
            Term::Iri(s) | Term::Blank(s) => s,
            Term::Literal(lit) => &lit.value,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(label) => write!(f, "_:{}", label),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

// =============================================================================
// LITERAL - Lexical value with optional datatype or language
// =============================================================================

/// Literal value as written in the source document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: Arc<str>,
    pub datatype: Option<Arc<str>>,
    pub language: Option<Arc<str>>,
}

impl Literal {
    /// True when the datatype is `xsd:<local>`
    pub fn has_xsd_type(&self, local: &str) -> bool {
        self.datatype
            .as_deref()
            .and_then(|dt| dt.strip_prefix(XSD))
            .is_some_and(|name| name == local)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value.escape_default())?;
        if let Some(ref lang) = self.language {
            write!(f, "@{}", lang)?;
        } else if let Some(ref dt) = self.datatype {
            write!(f, "^^<{}>", dt)?;
        }
        Ok(())
    }
}

// =============================================================================
// TRIPLE - One statement
// =============================================================================

/// Subject-predicate-object statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }

    /// Check the statement against a pattern where `None` matches anything
    #[inline]
    pub fn matches(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> bool {
        subject.map_or(true, |s| *s == self.subject)
            && predicate.map_or(true, |p| *p == self.predicate)
            && object.map_or(true, |o| *o == self.object)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
