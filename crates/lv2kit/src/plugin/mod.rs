//! Plugin descriptor with lazily resolved, cached metadata
//!
//! A [`Plugin`] starts out knowing only its URI, bundle and data files.
//! Description files are parsed into the shared store on the first accessor
//! call; the binary, class and port table are cached once resolved.
//!
//! Locking: a plugin's state mutex is always taken before the store lock,
//! never the other way around.

mod ports;
mod uis;

pub use ports::PortRanges;

use crate::node::{Node, Nodes};
use crate::plugin_class::PluginClass;
use crate::port::Port;
use crate::world::Shared;
use lv2kit_config::uri_to_path;
use lv2kit_logger::Diagnostic;
use lv2kit_store::Term;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
pub(crate) struct PluginState {
    loaded: bool,
    binary_uri: Option<Node>,
    class: Option<Arc<PluginClass>>,
    ports: Option<Vec<Option<Arc<Port>>>>,
}

pub struct Plugin {
    shared: Arc<Shared>,
    uri: Node,
    subject: Term,
    bundle_uri: Node,
    data_uris: Nodes,
    dyn_manifest: Option<Node>,
    replaced: AtomicBool,
    state: Mutex<PluginState>,
}

impl Plugin {
    pub(crate) fn new(
        shared: Arc<Shared>,
        uri: Node,
        bundle_uri: Node,
        data_uris: Nodes,
        dyn_manifest: Option<Node>,
    ) -> Self {
        let subject = uri.to_term();
        Plugin {
            shared,
            uri,
            subject,
            bundle_uri,
            data_uris,
            dyn_manifest,
            replaced: AtomicBool::new(false),
            state: Mutex::new(PluginState::default()),
        }
    }

    pub fn uri(&self) -> &Node {
        &self.uri
    }

    /// Directory URI of the bundle this plugin was discovered in
    pub fn bundle_uri(&self) -> &Node {
        &self.bundle_uri
    }

    /// Description files parsed when the plugin is first used
    pub fn data_uris(&self) -> &Nodes {
        &self.data_uris
    }

    /// Dynamic manifest library declared by the plugin's bundle
    pub fn dyn_manifest_uri(&self) -> Option<&Node> {
        self.dyn_manifest.as_ref()
    }

    /// True once another plugin declared `dcterms:replaces` for this one
    pub fn is_replaced(&self) -> bool {
        self.replaced.load(Ordering::Relaxed)
    }

    pub(crate) fn set_replaced(&self) {
        self.replaced.store(true, Ordering::Relaxed);
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().loaded
    }

    /// Parse the plugin's description files into the store, once
    pub fn ensure_loaded(&self) {
        let mut state = self.state.lock();
        self.load(&mut state);
    }

    fn load(&self, state: &mut PluginState) {
        if state.loaded {
            return;
        }

        let base = self.bundle_uri.as_uri().unwrap_or_default();
        for data_uri in &self.data_uris {
            let Some(path) = data_uri.as_uri().and_then(uri_to_path) else {
                self.shared.diagnose(Diagnostic::error(format!(
                    "Unable to read {}: not a local file",
                    data_uri.turtle_token()
                )));
                continue;
            };
            let prefix = self.shared.blank_prefix();
            let result = self.shared.model.write().read_file(&path, base, &prefix);
            match result {
                Ok(added) => debug!("Read {} statements from {}", added, data_uri),
                Err(e) => self.shared.diagnose(Diagnostic::error(format!(
                    "Error reading {}: {}",
                    data_uri.turtle_token(),
                    e
                ))),
            }
        }

        #[cfg(feature = "dyn-manifest")]
        if let Some(library) = &self.dyn_manifest {
            self.load_dyn_manifest(library, base);
        }

        state.loaded = true;
    }

    /// Run the dynamic manifest library and read its output into the store
    #[cfg(feature = "dyn-manifest")]
    fn load_dyn_manifest(&self, library: &Node, base: &str) {
        use crate::dyn_manifest::DynManifestError;

        let Some(loader) = self.shared.dyn_loader.read().clone() else {
            debug!("No dynamic manifest loader; skipping {}", library);
            return;
        };
        let Some(path) = library.as_uri().and_then(uri_to_path) else {
            self.shared.diagnose(Diagnostic::warning(
                DynManifestError::NotALocalPath(library.to_string()).to_string(),
            ));
            return;
        };
        let mut handle = match loader.open(&path) {
            Ok(handle) => handle,
            Err(e) => {
                self.shared.diagnose(Diagnostic::warning(e.to_string()));
                return;
            }
        };

        let report = |result: Result<(), DynManifestError>| match result {
            Ok(()) | Err(DynManifestError::MissingEntryPoint(_)) => {}
            Err(e) => self.shared.diagnose(Diagnostic::warning(e.to_string())),
        };

        report(handle.open());
        let plugin_uri = self.uri.as_uri().unwrap_or_default();
        let data = handle.get_data(plugin_uri);
        match data {
            Ok(text) => {
                let prefix = self.shared.blank_prefix();
                let result = self.shared.model.write().read_str(&text, base, &prefix);
                match result {
                    Ok(added) => debug!("Read {} statements from {}", added, library),
                    Err(e) => self.shared.diagnose(Diagnostic::error(format!(
                        "Error reading dynamic manifest data from {}: {}",
                        library.turtle_token(),
                        e
                    ))),
                }
            }
            Err(e) => report(Err(e)),
        }
        report(handle.close());
    }

    /// Library implementing the plugin (`lv2:binary`)
    ///
    /// Only a found URI is cached; a miss is reported on every call.
    pub fn binary_uri(&self) -> Option<Node> {
        let mut state = self.state.lock();
        self.load(&mut state);
        if state.binary_uri.is_none() {
            state.binary_uri = self
                .shared
                .values(&self.subject, &self.shared.terms.lv2_binary)
                .into_iter()
                .find(Node::is_uri);
        }
        if state.binary_uri.is_none() {
            self.shared.diagnose(Diagnostic::warning(format!(
                "Plugin {} has no lv2:binary",
                self.uri.turtle_token()
            )));
        }
        state.binary_uri.clone()
    }

    /// Most specific known class, or the generic `lv2:Plugin` class
    pub fn class(&self) -> Arc<PluginClass> {
        let mut state = self.state.lock();
        self.load(&mut state);
        if let Some(class) = &state.class {
            return Arc::clone(class);
        }

        let declared = self.shared.values(&self.subject, &self.shared.terms.rdf_type);
        let known = {
            let classes = self.shared.classes.read();
            declared
                .iter()
                .filter_map(Node::as_uri)
                .filter(|uri| *uri != crate::ns::LV2_PLUGIN)
                .find_map(|uri| classes.by_uri(uri).cloned())
        };
        let class = known.unwrap_or_else(|| Arc::clone(&self.shared.plugin_class));
        state.class = Some(Arc::clone(&class));
        class
    }

    /// `doap:name`, if declared as a string
    pub fn name(&self) -> Option<Node> {
        let name = self
            .value(&Node::from(&self.shared.terms.doap_name))
            .and_then(|names| names.into_iter().find(Node::is_string));
        if name.is_none() {
            self.shared.diagnose(Diagnostic::warning(format!(
                "Plugin {} has no (mandatory) doap:name",
                self.uri.turtle_token()
            )));
        }
        name
    }

    /// All values of `predicate` on the plugin
    pub fn value(&self, predicate: &Node) -> Option<Nodes> {
        self.value_for_subject(&self.uri, predicate)
    }

    /// All values of `(subject, predicate, ?)`, `None` when there are none
    pub fn value_for_subject(&self, subject: &Node, predicate: &Node) -> Option<Nodes> {
        {
            let mut state = self.state.lock();
            self.ensure_ports(&mut state);
        }

        if !subject.is_uri() && !subject.is_blank() {
            self.shared
                .diagnose(Diagnostic::error("Subject is not a resource"));
            return None;
        }
        if !predicate.is_uri() {
            self.shared
                .diagnose(Diagnostic::error("Predicate is not a URI"));
            return None;
        }

        let values = self.shared.values(&subject.to_term(), &predicate.to_term());
        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }

    /// True if the plugin has a type, a name and at least one port
    pub fn verify(&self) -> bool {
        let terms = &self.shared.terms;
        [&terms.rdf_type, &terms.doap_name, &terms.lv2_port]
            .into_iter()
            .all(|predicate| self.value(&Node::from(predicate)).is_some())
    }

    pub fn optional_features(&self) -> Option<Nodes> {
        self.value(&Node::from(&self.shared.terms.lv2_optional_feature))
    }

    pub fn required_features(&self) -> Option<Nodes> {
        self.value(&Node::from(&self.shared.terms.lv2_required_feature))
    }

    /// Optional features followed by required ones, without duplicates
    pub fn supported_features(&self) -> Nodes {
        let mut features = Nodes::new();
        let declared = self
            .optional_features()
            .into_iter()
            .chain(self.required_features())
            .flatten();
        for feature in declared {
            if !features.contains(&feature) {
                features.push(feature);
            }
        }
        features
    }

    pub fn has_feature(&self, feature: &Node) -> bool {
        self.supported_features().contains(feature)
    }

    /// First `doap:maintainer`, resolved anew on each call
    fn author(&self) -> Option<Term> {
        self.ensure_loaded();
        self.shared
            .first_value(&self.subject, &self.shared.terms.doap_maintainer)
            .map(|author| author.to_term())
    }

    fn author_property(&self, predicate: &Term) -> Option<Node> {
        let author = self.author()?;
        self.shared.first_value(&author, predicate)
    }

    pub fn author_name(&self) -> Option<Node> {
        self.author_property(&self.shared.terms.foaf_name)
    }

    pub fn author_email(&self) -> Option<Node> {
        self.author_property(&self.shared.terms.foaf_mbox)
    }

    pub fn author_homepage(&self) -> Option<Node> {
        self.author_property(&self.shared.terms.foaf_homepage)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("uri", &self.uri)
            .field("bundle_uri", &self.bundle_uri)
            .field("data_uris", &self.data_uris)
            .field("replaced", &self.is_replaced())
            .finish_non_exhaustive()
    }
}
