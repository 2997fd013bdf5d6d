use lv2kit::{Settings, World};
use lv2kit_logger::MemorySink;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const PREFIXES: &str = r#"
@prefix doap: <http://usefulinc.com/ns/doap#> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix lv2:  <http://lv2plug.in/ns/lv2core#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ui:   <http://lv2plug.in/ns/extensions/ui#> .
@prefix dman: <http://lv2plug.in/ns/ext/dynmanifest#> .
@prefix dcterms: <http://purl.org/dc/terms/> .
"#;

/// Write `<name>.lv2/` under `root` with a manifest and extra data files
pub fn write_bundle(root: &Path, name: &str, manifest: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = root.join(format!("{}.lv2", name));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("manifest.ttl"), format!("{}{}", PREFIXES, manifest)).unwrap();
    for (file, body) in files {
        fs::write(dir.join(file), format!("{}{}", PREFIXES, body)).unwrap();
    }
    dir
}

/// Manifest declaring `uri` with its description in `<file>`
pub fn manifest_for(uri: &str, file: &str) -> String {
    format!(
        "<{}> a lv2:Plugin ; lv2:binary <{}.so> ; rdfs:seeAlso <{}> .\n",
        uri,
        file.trim_end_matches(".ttl"),
        file
    )
}

/// World searching only `root`, with diagnostics captured
pub fn world_in(root: &Path) -> (World, Arc<MemorySink>) {
    let settings = Settings {
        lv2_path: Some(root.to_string_lossy().into_owned()),
        ..Settings::default()
    };
    let sink = Arc::new(MemorySink::new());
    let world = World::with_sink(settings, sink.clone());
    (world, sink)
}

/// Single-plugin bundle in a fresh directory, already discovered
pub fn single_plugin(uri: &str, description: &str) -> (TempDir, World, Arc<MemorySink>) {
    let tmp = TempDir::new().unwrap();
    write_bundle(
        tmp.path(),
        "plugin",
        &manifest_for(uri, "plugin.ttl"),
        &[("plugin.ttl", description)],
    );
    let (mut world, sink) = world_in(tmp.path());
    assert_eq!(world.load_all(), 1);
    (tmp, world, sink)
}
