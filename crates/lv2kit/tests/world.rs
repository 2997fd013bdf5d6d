mod common;

use common::{manifest_for, world_in, write_bundle};
use lv2kit::{Level, Lv2Error, Node, Settings, World};
use lv2kit_config::bundle_dir_uri;
use tempfile::TempDir;

#[test]
fn test_load_all_discovers_bundles() {
    let tmp = TempDir::new().unwrap();
    write_bundle(
        tmp.path(),
        "amp",
        &manifest_for("http://example.org/amp", "amp.ttl"),
        &[("amp.ttl", r#"<http://example.org/amp> doap:name "Amp" ."#)],
    );
    write_bundle(
        tmp.path(),
        "delay",
        &format!(
            "{}{}",
            manifest_for("http://example.org/delay", "delay.ttl"),
            manifest_for("http://example.org/delay#stereo", "delay.ttl")
        ),
        &[("delay.ttl", "")],
    );
    // Not a bundle: wrong suffix
    std::fs::create_dir(tmp.path().join("notes")).unwrap();

    let (mut world, sink) = world_in(tmp.path());
    assert_eq!(world.load_all(), 3);
    assert_eq!(world.plugins().len(), 3);
    assert!(sink.diagnostics().is_empty());

    let amp = world.plugin_by_uri("http://example.org/amp").unwrap();
    assert!(amp.bundle_uri().as_uri().unwrap().ends_with("/amp.lv2/"));
    assert_eq!(amp.data_uris().len(), 2);
    assert!(amp.data_uris().first().unwrap().to_string().ends_with("manifest.ttl"));
    assert_eq!(amp.name().unwrap().as_str(), Some("Amp"));

    // Loading again finds nothing new
    assert_eq!(world.load_all(), 0);
    assert_eq!(world.plugins().len(), 3);
}

#[test]
fn test_duplicate_plugin_is_ignored() {
    let tmp = TempDir::new().unwrap();
    let manifest = manifest_for("http://example.org/amp", "amp.ttl");
    write_bundle(tmp.path(), "a", &manifest, &[("amp.ttl", "")]);
    write_bundle(tmp.path(), "b", &manifest, &[("amp.ttl", "")]);

    let (mut world, sink) = world_in(tmp.path());
    assert_eq!(world.load_all(), 1);
    assert!(sink.contains("Duplicate plugin"));

    let amp = world.plugin_by_uri("http://example.org/amp").unwrap();
    assert!(amp.bundle_uri().as_uri().unwrap().ends_with("/a.lv2/"));
}

#[test]
fn test_load_bundle_errors() {
    let tmp = TempDir::new().unwrap();
    let (mut world, sink) = world_in(tmp.path());

    let missing = Node::uri(bundle_dir_uri(&tmp.path().join("gone.lv2")));
    assert!(matches!(
        world.load_bundle(&missing),
        Err(Lv2Error::InvalidBundle { .. })
    ));
    assert!(matches!(
        world.load_bundle(&Node::Int(1)),
        Err(Lv2Error::NotAUri(_))
    ));

    // load_all reports bad bundles and keeps going
    std::fs::create_dir(tmp.path().join("empty.lv2")).unwrap();
    write_bundle(
        tmp.path(),
        "good",
        &manifest_for("http://example.org/good", "good.ttl"),
        &[("good.ttl", "")],
    );
    assert_eq!(world.load_all(), 1);
    assert_eq!(sink.count(Level::Warning), 1);
    assert!(sink.contains("no manifest.ttl"));
}

#[test]
fn test_bundle_uri_without_trailing_slash() {
    let tmp = TempDir::new().unwrap();
    let dir = write_bundle(
        tmp.path(),
        "amp",
        &manifest_for("http://example.org/amp", "amp.ttl"),
        &[("amp.ttl", "")],
    );
    let mut world = World::with_settings(Settings::default());
    let uri = bundle_dir_uri(&dir);
    let uri = Node::uri(uri.trim_end_matches('/'));
    assert_eq!(world.load_bundle(&uri).unwrap(), 1);

    let amp = world.plugin_by_uri("http://example.org/amp").unwrap();
    assert!(amp.bundle_uri().as_uri().unwrap().ends_with('/'));
}

#[test]
fn test_syntax_error_keeps_earlier_statements() {
    let tmp = TempDir::new().unwrap();
    write_bundle(
        tmp.path(),
        "half",
        &format!(
            "{}<http://example.org/oops> a ?? .\n",
            manifest_for("http://example.org/half", "half.ttl")
        ),
        &[("half.ttl", "")],
    );
    let (mut world, sink) = world_in(tmp.path());
    assert_eq!(world.load_all(), 1);
    assert!(sink.count(Level::Error) >= 1);
}

#[test]
fn test_replaced_plugins() {
    let tmp = TempDir::new().unwrap();
    write_bundle(
        tmp.path(),
        "old",
        &manifest_for("http://example.org/amp-1", "amp.ttl"),
        &[("amp.ttl", "")],
    );
    write_bundle(
        tmp.path(),
        "new",
        &format!(
            "{}<http://example.org/amp-2> dcterms:replaces <http://example.org/amp-1> .\n",
            manifest_for("http://example.org/amp-2", "amp.ttl")
        ),
        &[("amp.ttl", "")],
    );

    let (mut world, _sink) = world_in(tmp.path());
    world.load_all();
    assert!(world.plugin_by_uri("http://example.org/amp-1").unwrap().is_replaced());
    assert!(!world.plugin_by_uri("http://example.org/amp-2").unwrap().is_replaced());

    let current = world.plugins().filter(|p| !p.is_replaced());
    assert_eq!(current.len(), 1);
    assert!(current.by_uri("http://example.org/amp-2").is_some());
}

#[test]
fn test_plugins_collection() {
    let tmp = TempDir::new().unwrap();
    for name in ["a", "b", "c"] {
        let uri = format!("http://example.org/{}", name);
        write_bundle(
            tmp.path(),
            name,
            &manifest_for(&uri, "p.ttl"),
            &[("p.ttl", "")],
        );
    }
    let (mut world, _sink) = world_in(tmp.path());
    world.load_all();

    let plugins = world.plugins();
    let uris: Vec<_> = plugins.iter().map(|p| p.uri().to_string()).collect();
    assert_eq!(
        uris,
        ["http://example.org/a", "http://example.org/b", "http://example.org/c"]
    );
    assert_eq!(
        plugins.get(1).unwrap().uri(),
        &Node::uri("http://example.org/b")
    );
    assert!(plugins.get(3).is_none());
    assert!(world.plugin(&Node::uri("http://example.org/c")).is_some());
    assert!(world.plugin(&Node::string("http://example.org/c")).is_none());
}

#[test]
fn test_load_specifications_extends_taxonomy() {
    let tmp = TempDir::new().unwrap();
    write_bundle(
        tmp.path(),
        "custom",
        &format!(
            "{}<http://example.org/CombPlugin> rdfs:subClassOf lv2:FilterPlugin ; rdfs:label \"Comb\" .\n",
            manifest_for("http://example.org/comb", "comb.ttl")
        ),
        &[(
            "comb.ttl",
            "<http://example.org/comb> a <http://example.org/CombPlugin> .",
        )],
    );
    let (mut world, _sink) = world_in(tmp.path());
    let before = world.plugin_classes().len();
    world.load_all();
    world.load_specifications();

    let classes = world.plugin_classes();
    assert_eq!(classes.len(), before + 1);
    let comb = classes.by_uri("http://example.org/CombPlugin").unwrap();
    assert_eq!(
        comb.parent_uri().and_then(Node::as_uri),
        Some("http://lv2plug.in/ns/lv2core#FilterPlugin")
    );

    let plugin = world.plugin_by_uri("http://example.org/comb").unwrap();
    assert_eq!(plugin.class().label().as_str(), Some("Comb"));
}

#[test]
fn test_value_constructors() {
    let world = World::new();
    assert!(world.new_uri("http://example.org/").is_uri());
    assert_eq!(world.new_string("x").as_str(), Some("x"));
    assert_eq!(world.new_int(4).as_int(), Some(4));
    assert_eq!(world.new_float(0.5).as_float(), Some(0.5));
    assert_eq!(world.new_bool(true).as_bool(), Some(true));
}
