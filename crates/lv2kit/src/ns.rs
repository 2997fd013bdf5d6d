//! Namespace prefixes for the vocabularies plugin descriptions use

pub use lv2kit_store::{RDF, XSD};

pub const LV2: &str = "http://lv2plug.in/ns/lv2core#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const DOAP: &str = "http://usefulinc.com/ns/doap#";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const UI: &str = "http://lv2plug.in/ns/extensions/ui#";
pub const DMAN: &str = "http://lv2plug.in/ns/ext/dynmanifest#";
pub const DCTERMS: &str = "http://purl.org/dc/terms/";

/// `lv2:Plugin`, root of the plugin class taxonomy
pub const LV2_PLUGIN: &str = "http://lv2plug.in/ns/lv2core#Plugin";
