#![cfg(feature = "dyn-manifest")]

mod common;

use common::{world_in, write_bundle};
use lv2kit::dyn_manifest::{
    DynManifestError, DynManifestLibrary, DynManifestLoader, GET_DATA_SYMBOL,
};
use lv2kit::{Level, Settings, World};
use lv2kit_logger::MemorySink;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const SYNTH: &str = "http://example.org/synth";

const MANIFEST: &str = r#"
<http://example.org/synth-gen> a dman:DynManifest ;
    lv2:binary <synth-gen.so> .
<http://example.org/synth> a lv2:Plugin .
"#;

#[derive(Default)]
struct Calls(Mutex<Vec<String>>);

impl Calls {
    fn log(&self, call: impl Into<String>) {
        self.0.lock().push(call.into());
    }

    fn list(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

struct MockLoader {
    calls: Arc<Calls>,
    data: Option<&'static str>,
    fail_open: bool,
    get_data_code: i32,
}

struct MockLibrary {
    calls: Arc<Calls>,
    data: Option<&'static str>,
    get_data_code: i32,
}

impl DynManifestLoader for MockLoader {
    fn open(&self, library: &Path) -> Result<Box<dyn DynManifestLibrary>, DynManifestError> {
        self.calls.log(format!("load {}", library.display()));
        if self.fail_open {
            return Err(DynManifestError::LoadFailed {
                path: library.display().to_string(),
                reason: "cannot open shared object file".to_string(),
            });
        }
        Ok(Box::new(MockLibrary {
            calls: Arc::clone(&self.calls),
            data: self.data,
            get_data_code: self.get_data_code,
        }))
    }
}

impl DynManifestLibrary for MockLibrary {
    fn open(&mut self) -> Result<(), DynManifestError> {
        self.calls.log("open");
        Ok(())
    }

    fn get_data(&mut self, plugin_uri: &str) -> Result<String, DynManifestError> {
        self.calls.log(format!("get_data {}", plugin_uri));
        if self.get_data_code != 0 {
            return Err(DynManifestError::CallFailed {
                symbol: GET_DATA_SYMBOL,
                code: self.get_data_code,
            });
        }
        match self.data {
            Some(data) => Ok(format!("{}{}", common::PREFIXES, data)),
            None => Err(DynManifestError::MissingEntryPoint(GET_DATA_SYMBOL)),
        }
    }

    fn close(&mut self) -> Result<(), DynManifestError> {
        self.calls.log("close");
        Ok(())
    }
}

fn synth_world(
    loader: MockLoader,
    settings: Option<Settings>,
) -> (TempDir, World, Arc<MemorySink>, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let dir = write_bundle(tmp.path(), "synth", MANIFEST, &[]);
    let (mut world, sink) = match settings {
        Some(settings) => {
            let sink = Arc::new(MemorySink::new());
            (World::with_sink(settings, sink.clone()), sink)
        }
        None => world_in(tmp.path()),
    };
    world.set_dyn_manifest_loader(Arc::new(loader));
    let uri = lv2kit::Node::uri(lv2kit_config::bundle_dir_uri(&dir));
    assert_eq!(world.load_bundle(&uri).unwrap(), 1);
    (tmp, world, sink, dir)
}

#[test]
fn test_dyn_manifest_data_is_loaded() {
    let calls = Arc::new(Calls::default());
    let loader = MockLoader {
        calls: Arc::clone(&calls),
        data: Some(r#"<http://example.org/synth> doap:name "Synth" ; lv2:binary <synth.so> ."#),
        fail_open: false,
        get_data_code: 0,
    };
    let (_tmp, world, sink, dir) = synth_world(loader, None);
    let plugin = world.plugin_by_uri(SYNTH).unwrap();
    assert!(plugin.dyn_manifest_uri().is_some());
    assert!(calls.list().is_empty());

    assert_eq!(plugin.name().unwrap().as_str(), Some("Synth"));
    let binary = plugin.binary_uri().unwrap();
    assert!(binary.as_uri().unwrap().ends_with("/synth.lv2/synth.so"));
    assert_eq!(
        calls.list(),
        [
            format!("load {}", dir.join("synth-gen.so").display()),
            "open".to_string(),
            format!("get_data {}", SYNTH),
            "close".to_string(),
        ]
    );
    assert!(sink.diagnostics().is_empty());

    // Probed once only
    plugin.ensure_loaded();
    assert_eq!(calls.list().len(), 4);
}

#[test]
fn test_missing_entry_point_is_skipped() {
    let calls = Arc::new(Calls::default());
    let loader = MockLoader {
        calls: Arc::clone(&calls),
        data: None,
        fail_open: false,
        get_data_code: 0,
    };
    let (_tmp, world, sink, _dir) = synth_world(loader, None);
    let plugin = world.plugin_by_uri(SYNTH).unwrap();

    plugin.ensure_loaded();
    assert!(plugin.is_loaded());
    assert!(calls.list().contains(&"close".to_string()));
    assert_eq!(sink.count(Level::Warning), 0);
}

#[test]
fn test_failed_get_data_is_discarded() {
    let calls = Arc::new(Calls::default());
    let loader = MockLoader {
        calls: Arc::clone(&calls),
        data: Some(r#"<http://example.org/synth> doap:name "Synth" ."#),
        fail_open: false,
        get_data_code: 3,
    };
    let (_tmp, world, sink, _dir) = synth_world(loader, None);
    let plugin = world.plugin_by_uri(SYNTH).unwrap();
    let statements = world.num_statements();

    plugin.ensure_loaded();
    assert!(plugin.is_loaded());
    assert_eq!(world.num_statements(), statements);
    assert_eq!(calls.list().last().map(String::as_str), Some("close"));
    assert_eq!(sink.count(Level::Warning), 1);
    assert!(sink.contains("`lv2_dyn_manifest_get_data' returned 3"));

    assert!(plugin.name().is_none());
}

#[test]
fn test_unopenable_library_is_a_warning() {
    let calls = Arc::new(Calls::default());
    let loader = MockLoader {
        calls: Arc::clone(&calls),
        data: Some(""),
        fail_open: true,
        get_data_code: 0,
    };
    let (_tmp, world, sink, _dir) = synth_world(loader, None);
    let plugin = world.plugin_by_uri(SYNTH).unwrap();

    plugin.ensure_loaded();
    assert!(plugin.is_loaded());
    assert_eq!(calls.list().len(), 1);
    assert!(sink.contains("Unable to open dynamic manifest"));
    assert!(plugin.name().is_none());
}

#[test]
fn test_disabled_in_settings() {
    let calls = Arc::new(Calls::default());
    let loader = MockLoader {
        calls: Arc::clone(&calls),
        data: Some(r#"<http://example.org/synth> doap:name "Synth" ."#),
        fail_open: false,
        get_data_code: 0,
    };
    let settings = Settings {
        dyn_manifest: Some(false),
        ..Settings::default()
    };
    let (_tmp, world, _sink, _dir) = synth_world(loader, Some(settings));
    let plugin = world.plugin_by_uri(SYNTH).unwrap();

    assert!(plugin.dyn_manifest_uri().is_none());
    plugin.ensure_loaded();
    assert!(calls.list().is_empty());
}
