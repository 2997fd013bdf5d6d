//! Shared context: the statement store, the class taxonomy and the set of
//! discovered plugins
//!
//! Plugins keep an `Arc` to the [`Shared`] part only, so the world owns its
//! plugins without a reference cycle.

use crate::error::Lv2Error;
use crate::node::{Node, Nodes};
use crate::ns::{DCTERMS, DMAN, DOAP, FOAF, LV2, LV2_PLUGIN, RDF, RDFS, UI};
use crate::plugin::Plugin;
use crate::plugin_class::{PluginClass, PluginClasses};
use crate::plugins::Plugins;
use lv2kit_config::{bundle_dir_uri, lv2_path, uri_to_path, Settings};
use lv2kit_logger::{Diagnostic, DiagnosticSink, TracingSink};
use lv2kit_store::{Model, Term};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

#[cfg(feature = "dyn-manifest")]
use crate::dyn_manifest::DynManifestLoader;

const CLASSES_TTL: &str = include_str!("../data/classes.ttl");
const CLASSES_BASE: &str = "http://lv2plug.in/ns/lv2core";

/// Predicates and classes used while resolving plugins
pub(crate) struct Terms {
    pub rdf_type: Term,
    pub rdfs_see_also: Term,
    pub lv2_plugin: Term,
    pub lv2_port: Term,
    pub lv2_symbol: Term,
    pub lv2_index: Term,
    pub lv2_binary: Term,
    pub lv2_port_property: Term,
    pub lv2_reports_latency: Term,
    pub lv2_minimum: Term,
    pub lv2_maximum: Term,
    pub lv2_default: Term,
    pub lv2_optional_feature: Term,
    pub lv2_required_feature: Term,
    pub doap_name: Term,
    pub doap_maintainer: Term,
    pub foaf_name: Term,
    pub foaf_mbox: Term,
    pub foaf_homepage: Term,
    pub ui_ui: Term,
    pub ui_binary: Term,
    pub dman_dyn_manifest: Term,
    pub dcterms_replaces: Term,
}

impl Terms {
    fn new() -> Self {
        let iri = |ns: &str, local: &str| Term::iri(format!("{}{}", ns, local));
        Terms {
            rdf_type: iri(RDF, "type"),
            rdfs_see_also: iri(RDFS, "seeAlso"),
            lv2_plugin: Term::iri(LV2_PLUGIN),
            lv2_port: iri(LV2, "port"),
            lv2_symbol: iri(LV2, "symbol"),
            lv2_index: iri(LV2, "index"),
            lv2_binary: iri(LV2, "binary"),
            lv2_port_property: iri(LV2, "portProperty"),
            lv2_reports_latency: iri(LV2, "reportsLatency"),
            lv2_minimum: iri(LV2, "minimum"),
            lv2_maximum: iri(LV2, "maximum"),
            lv2_default: iri(LV2, "default"),
            lv2_optional_feature: iri(LV2, "optionalFeature"),
            lv2_required_feature: iri(LV2, "requiredFeature"),
            doap_name: iri(DOAP, "name"),
            doap_maintainer: iri(DOAP, "maintainer"),
            foaf_name: iri(FOAF, "name"),
            foaf_mbox: iri(FOAF, "mbox"),
            foaf_homepage: iri(FOAF, "homepage"),
            ui_ui: iri(UI, "ui"),
            ui_binary: iri(UI, "binary"),
            dman_dyn_manifest: iri(DMAN, "DynManifest"),
            dcterms_replaces: iri(DCTERMS, "replaces"),
        }
    }
}

/// State shared by the world and every plugin it discovered
pub(crate) struct Shared {
    pub model: RwLock<Model>,
    pub classes: RwLock<PluginClasses>,
    pub plugin_class: Arc<PluginClass>,
    pub terms: Terms,
    sink: Arc<dyn DiagnosticSink>,
    next_blank: AtomicUsize,
    #[cfg(feature = "dyn-manifest")]
    pub dyn_loader: RwLock<Option<Arc<dyn DynManifestLoader>>>,
}

impl Shared {
    pub fn diagnose(&self, diagnostic: Diagnostic) {
        self.sink.emit(diagnostic);
    }

    /// Fresh blank node prefix for one document read
    pub fn blank_prefix(&self) -> String {
        format!("b{}_", self.next_blank.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// All objects of `(subject, predicate, ?)`
    pub fn values(&self, subject: &Term, predicate: &Term) -> Nodes {
        self.model
            .read()
            .objects(subject, predicate)
            .map(Node::from)
            .collect()
    }

    /// Any one object of `(subject, predicate, ?)`, without complaint
    pub fn first_value(&self, subject: &Term, predicate: &Term) -> Option<Node> {
        self.model
            .read()
            .objects(subject, predicate)
            .next()
            .map(Node::from)
    }

    /// The single object of `(subject, predicate, ?)`
    ///
    /// Zero or several matches are reported and yield `None`.
    pub fn unique_value(&self, subject: &Term, predicate: &Term) -> Option<Node> {
        let mut values = self.values(subject, predicate).into_iter();
        match (values.next(), values.next()) {
            (Some(value), None) => Some(value),
            _ => {
                self.diagnose(Diagnostic::error(format!(
                    "{} does not have exactly one `{}' property",
                    subject,
                    predicate.text()
                )));
                None
            }
        }
    }

    pub fn ask(&self, subject: &Term, predicate: &Term, object: &Term) -> bool {
        self.model
            .read()
            .ask(Some(subject), Some(predicate), Some(object))
    }
}

/// Library context holding every loaded statement and plugin
pub struct World {
    shared: Arc<Shared>,
    plugins: Plugins,
    settings: Settings,
}

impl World {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::with_sink(settings, Arc::new(TracingSink))
    }

    /// World reporting diagnostics through `sink`
    pub fn with_sink(settings: Settings, sink: Arc<dyn DiagnosticSink>) -> Self {
        let shared = Shared {
            model: RwLock::new(Model::new()),
            classes: RwLock::new(PluginClasses::default()),
            plugin_class: Arc::new(PluginClass::new(LV2_PLUGIN, None, "Plugin")),
            terms: Terms::new(),
            sink,
            next_blank: AtomicUsize::new(0),
            #[cfg(feature = "dyn-manifest")]
            dyn_loader: RwLock::new(None),
        };

        let prefix = shared.blank_prefix();
        let read = shared
            .model
            .write()
            .read_str(CLASSES_TTL, CLASSES_BASE, &prefix);
        if let Err(e) = read {
            shared.diagnose(Diagnostic::error(format!(
                "Failed to read built-in plugin classes: {}",
                e
            )));
        }

        let world = World {
            shared: Arc::new(shared),
            plugins: Plugins::default(),
            settings,
        };
        world.load_specifications();
        world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Install the loader used to open dynamic manifest libraries
    #[cfg(feature = "dyn-manifest")]
    pub fn set_dyn_manifest_loader(&self, loader: Arc<dyn DynManifestLoader>) {
        *self.shared.dyn_loader.write() = Some(loader);
    }

    /// Rebuild the plugin class taxonomy from the loaded statements
    pub fn load_specifications(&self) {
        let classes = PluginClasses::from_model(&self.shared.model.read());
        debug!("Plugin class taxonomy has {} classes", classes.len());
        *self.shared.classes.write() = classes;
    }

    /// Number of statements in the store
    pub fn num_statements(&self) -> usize {
        self.shared.model.read().len()
    }

    pub fn new_uri(&self, uri: &str) -> Node {
        Node::uri(uri)
    }

    pub fn new_string(&self, value: &str) -> Node {
        Node::string(value)
    }

    pub fn new_int(&self, value: i64) -> Node {
        Node::Int(value)
    }

    pub fn new_float(&self, value: f64) -> Node {
        Node::Float(value)
    }

    pub fn new_bool(&self, value: bool) -> Node {
        Node::Bool(value)
    }

    pub fn plugins(&self) -> &Plugins {
        &self.plugins
    }

    pub fn plugin(&self, uri: &Node) -> Option<&Arc<Plugin>> {
        self.plugins.get_by_uri(uri)
    }

    pub fn plugin_by_uri(&self, uri: &str) -> Option<&Arc<Plugin>> {
        self.plugins.by_uri(uri)
    }

    /// The generic `lv2:Plugin` class
    pub fn plugin_class(&self) -> Arc<PluginClass> {
        Arc::clone(&self.shared.plugin_class)
    }

    pub fn plugin_classes(&self) -> PluginClasses {
        self.shared.classes.read().clone()
    }

    /// Discover the plugins described by one bundle's `manifest.ttl`
    ///
    /// Returns the number of newly registered plugins.
    pub fn load_bundle(&mut self, bundle_uri: &Node) -> Result<usize, Lv2Error> {
        let Some(uri) = bundle_uri.as_uri() else {
            return Err(Lv2Error::NotAUri(bundle_uri.turtle_token()));
        };
        let mut bundle = uri.to_string();
        if !bundle.ends_with('/') {
            bundle.push('/');
        }
        let Some(dir) = uri_to_path(&bundle) else {
            return Err(Lv2Error::InvalidBundle {
                uri: bundle,
                reason: "not a local directory".to_string(),
            });
        };
        let manifest_path = dir.join("manifest.ttl");
        if !manifest_path.is_file() {
            return Err(Lv2Error::InvalidBundle {
                uri: bundle,
                reason: "no manifest.ttl".to_string(),
            });
        }
        let manifest_uri = format!("{}manifest.ttl", bundle);

        // Read the manifest on its own first so only this bundle's
        // statements are considered for registration
        let prefix = self.shared.blank_prefix();
        let mut manifest = Model::new();
        if let Err(e) = manifest.read_file(&manifest_path, &bundle, &prefix) {
            if manifest.is_empty() {
                return Err(e.into());
            }
            self.shared.diagnose(Diagnostic::error(format!(
                "Error reading <{}>: {}",
                manifest_uri, e
            )));
        }
        {
            let mut model = self.shared.model.write();
            for triple in manifest.iter() {
                model.insert(triple.clone());
            }
        }

        let terms = &self.shared.terms;
        let dyn_manifest = if self.settings.dyn_manifest_enabled() {
            dyn_manifest_library(&manifest, terms)
        } else {
            None
        };

        let bundle_node = Node::uri(bundle.as_str());
        let mut added = 0;
        for triple in manifest.find(None, Some(&terms.rdf_type), Some(&terms.lv2_plugin)) {
            let Some(plugin_uri) = triple.subject.as_iri() else {
                self.shared.diagnose(Diagnostic::warning(format!(
                    "Ignoring plugin with non-URI subject in <{}>",
                    manifest_uri
                )));
                continue;
            };

            if let Some(existing) = self.plugins.by_uri(plugin_uri) {
                self.shared.diagnose(Diagnostic::warning(format!(
                    "Duplicate plugin <{}> in <{}> (already loaded from <{}>); ignoring",
                    plugin_uri,
                    bundle,
                    existing.bundle_uri()
                )));
                continue;
            }

            let mut data_uris = Nodes::new();
            data_uris.push(Node::uri(manifest_uri.as_str()));
            for see_also in manifest.objects(&triple.subject, &terms.rdfs_see_also) {
                if see_also.is_iri() {
                    let node = Node::from(see_also);
                    if !data_uris.contains(&node) {
                        data_uris.push(node);
                    }
                }
            }

            let plugin = Plugin::new(
                Arc::clone(&self.shared),
                Node::uri(plugin_uri),
                bundle_node.clone(),
                data_uris,
                dyn_manifest.clone(),
            );
            if self.plugins.insert(Arc::new(plugin)) {
                added += 1;
            }
        }

        self.mark_replaced();
        info!("Loaded bundle <{}> ({} new plugins)", bundle, added);
        Ok(added)
    }

    /// Flag every plugin named as the object of `dcterms:replaces`
    fn mark_replaced(&self) {
        let model = self.shared.model.read();
        for triple in model.find(None, Some(&self.shared.terms.dcterms_replaces), None) {
            if triple.subject == triple.object {
                continue;
            }
            if let Some(old) = triple.object.as_iri().and_then(|uri| self.plugins.by_uri(uri)) {
                old.set_replaced();
            }
        }
    }

    /// Load every `*.lv2` bundle found directly under the search path
    ///
    /// Returns the number of newly registered plugins. Bundles that fail to
    /// load are reported and skipped.
    pub fn load_all(&mut self) -> usize {
        let mut added = 0;
        for dir in lv2_path(&self.settings) {
            added += self.load_directory(&dir);
        }
        added
    }

    /// Load every `*.lv2` bundle directly inside `dir`
    pub fn load_directory(&mut self, dir: &Path) -> usize {
        if !dir.is_dir() {
            debug!("Skipping missing LV2 directory {}", dir.display());
            return 0;
        }

        let bundles: Vec<_> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".lv2"))
            .map(|entry| entry.into_path())
            .collect();

        let mut added = 0;
        for path in bundles {
            let uri = Node::uri(bundle_dir_uri(&path));
            match self.load_bundle(&uri) {
                Ok(n) => added += n,
                Err(e) => self
                    .shared
                    .diagnose(Diagnostic::warning(format!("Skipping bundle: {}", e))),
            }
        }
        added
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("plugins", &self.plugins.len())
            .field("statements", &self.num_statements())
            .finish()
    }
}

/// Library named by `?d a dman:DynManifest ; lv2:binary ?lib`
fn dyn_manifest_library(manifest: &Model, terms: &Terms) -> Option<Node> {
    manifest
        .find(None, Some(&terms.rdf_type), Some(&terms.dman_dyn_manifest))
        .find_map(|t| {
            manifest
                .objects(&t.subject, &terms.lv2_binary)
                .find(|lib| lib.is_iri())
                .map(Node::from)
        })
}
