//! lv2kit triple store
//!
//! An in-memory, indexed set of RDF statements filled from Turtle
//! documents parsed with `oxttl`. This is the data layer underneath plugin
//! discovery: bundle manifests and description files are read into a single
//! [`Model`] and answered through subject/predicate/object pattern queries.
//!
//! Named graphs are not modeled; every query spans all loaded documents.

pub mod errors;
pub mod interner;
pub mod model;
mod turtle;
pub mod types;

pub use errors::StoreError;
pub use interner::StringInterner;
pub use model::Model;
pub use types::{Literal, Term, Triple, RDF, XSD};
