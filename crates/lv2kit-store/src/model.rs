//! Model operations - inserting statements and answering pattern queries
//!
//! The model is an append-only set of statements with one index per
//! position. Queries pick the most selective bound position and filter
//! the candidates against the rest of the pattern.

use crate::errors::StoreError;
use crate::interner::StringInterner;
use crate::turtle;
use crate::types::{Literal, Term, Triple};
use ahash::{AHashMap, AHashSet};
use smallvec::SmallVec;
use std::path::Path;
use tracing::debug;

type Postings = SmallVec<[usize; 4]>;

fn lookup<'a>(index: &'a AHashMap<Term, Postings>, term: &Term) -> &'a [usize] {
    index.get(term).map_or(&[], |list| list.as_slice())
}

/// Indexed in-memory statement set
#[derive(Debug, Default)]
pub struct Model {
    triples: Vec<Triple>,
    seen: AHashSet<Triple>,
    by_subject: AHashMap<Term, Postings>,
    by_predicate: AHashMap<Term, Postings>,
    by_object: AHashMap<Term, Postings>,
    interner: StringInterner,
}

impl Model {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct statements
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the model holds no statements
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over every statement in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    fn intern_term(&self, term: Term) -> Term {
        match term {
            Term::Iri(iri) => Term::Iri(self.interner.intern_arc(iri)),
            Term::Blank(label) => Term::Blank(self.interner.intern_arc(label)),
            Term::Literal(lit) => Term::Literal(Literal {
                value: lit.value,
                datatype: lit.datatype.map(|dt| self.interner.intern_arc(dt)),
                language: lit.language,
            }),
        }
    }

    /// Add a statement. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }

        let triple = Triple {
            subject: self.intern_term(triple.subject),
            predicate: self.intern_term(triple.predicate),
            object: self.intern_term(triple.object),
        };

        let idx = self.triples.len();
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(idx);
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .push(idx);
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .push(idx);
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Check whether an exact statement is present
    pub fn contains(&self, triple: &Triple) -> bool {
        self.seen.contains(triple)
    }

    /// Find all statements matching a pattern; `None` is a wildcard
    pub fn find<'a>(
        &'a self,
        subject: Option<&'a Term>,
        predicate: Option<&'a Term>,
        object: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        let candidates: Box<dyn Iterator<Item = usize> + 'a> =
            match self.postings(subject, predicate, object) {
                Some(postings) => Box::new(postings.iter().copied()),
                None => Box::new(0..self.triples.len()),
            };

        candidates
            .map(move |idx| &self.triples[idx])
            .filter(move |t| t.matches(subject, predicate, object))
    }

    /// Shortest posting list among the bound positions
    fn postings(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Option<&[usize]> {
        let lists = [
            subject.map(|s| lookup(&self.by_subject, s)),
            predicate.map(|p| lookup(&self.by_predicate, p)),
            object.map(|o| lookup(&self.by_object, o)),
        ];
        lists.into_iter().flatten().min_by_key(|list| list.len())
    }

    /// Objects of all `(subject, predicate, ?)` statements
    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a Term,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.find(Some(subject), Some(predicate), None)
            .map(|t| &t.object)
    }

    /// True if at least one statement matches the pattern
    pub fn ask(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> bool {
        self.find(subject, predicate, object).next().is_some()
    }

    /// Parse Turtle text into the model
    ///
    /// Statements read before a syntax error stay in the model.
    /// Returns the number of new statements.
    pub fn read_str(
        &mut self,
        text: &str,
        base_uri: &str,
        blank_prefix: &str,
    ) -> Result<usize, StoreError> {
        let before = self.len();
        let result = turtle::read_into(self, text, base_uri, blank_prefix);
        let added = self.len() - before;
        debug!(
            "Read {} statements (base {}, blank prefix {})",
            added, base_uri, blank_prefix
        );
        result.map(|()| added)
    }

    /// Parse a Turtle file into the model
    pub fn read_file(
        &mut self,
        path: &Path,
        base_uri: &str,
        blank_prefix: &str,
    ) -> Result<usize, StoreError> {
        debug!("Reading description file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        self.read_str(&content, base_uri, blank_prefix)
    }
}
