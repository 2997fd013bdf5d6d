//! Plugin class taxonomy
//!
//! Classes are read from `rdfs:subClassOf` statements; only classes that
//! reach `lv2:Plugin` through their parents belong to the taxonomy.

use crate::node::Node;
use crate::ns::{LV2_PLUGIN, RDFS};
use ahash::{AHashMap, AHashSet};
use lv2kit_store::{Model, Term};
use std::collections::VecDeque;
use std::sync::Arc;

/// A node in the plugin class tree
#[derive(Debug, Clone, PartialEq)]
pub struct PluginClass {
    uri: Node,
    parent_uri: Option<Node>,
    label: Node,
}

impl PluginClass {
    pub(crate) fn new(uri: &str, parent_uri: Option<&str>, label: &str) -> Self {
        PluginClass {
            uri: Node::uri(uri),
            parent_uri: parent_uri.map(Node::uri),
            label: Node::string(label),
        }
    }

    pub fn uri(&self) -> &Node {
        &self.uri
    }

    /// `None` for the root class
    pub fn parent_uri(&self) -> Option<&Node> {
        self.parent_uri.as_ref()
    }

    pub fn label(&self) -> &Node {
        &self.label
    }
}

/// Set of plugin classes indexed by URI
#[derive(Debug, Clone, Default)]
pub struct PluginClasses {
    classes: Vec<Arc<PluginClass>>,
    index: AHashMap<Arc<str>, usize>,
}

impl PluginClasses {
    fn from_vec(mut classes: Vec<Arc<PluginClass>>) -> Self {
        classes.sort_by(|a, b| a.uri.as_uri().cmp(&b.uri.as_uri()));
        let index = classes
            .iter()
            .enumerate()
            .filter_map(|(i, class)| class.uri.as_uri().map(|uri| (Arc::from(uri), i)))
            .collect();
        PluginClasses { classes, index }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PluginClass>> {
        self.classes.iter()
    }

    pub fn get_by_uri(&self, uri: &Node) -> Option<&Arc<PluginClass>> {
        uri.as_uri().and_then(|uri| self.by_uri(uri))
    }

    pub fn by_uri(&self, uri: &str) -> Option<&Arc<PluginClass>> {
        self.index.get(uri).map(|&i| &self.classes[i])
    }

    /// Direct subclasses of `parent`
    pub fn children(&self, parent: &Node) -> PluginClasses {
        Self::from_vec(
            self.classes
                .iter()
                .filter(|class| class.parent_uri.as_ref() == Some(parent))
                .cloned()
                .collect(),
        )
    }

    /// Build the taxonomy rooted at `lv2:Plugin` from the model
    pub(crate) fn from_model(model: &Model) -> Self {
        let sub_class_of = Term::iri(format!("{}subClassOf", RDFS));
        let label = Term::iri(format!("{}label", RDFS));

        let mut children: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for triple in model.find(None, Some(&sub_class_of), None) {
            if let (Some(child), Some(parent)) = (triple.subject.as_iri(), triple.object.as_iri()) {
                children.entry(parent).or_default().push(child);
            }
        }

        let label_of = |uri: &str| -> String {
            let subject = Term::iri(uri);
            let found = model
                .objects(&subject, &label)
                .filter_map(|o| o.as_literal())
                .find(|lit| lit.language.as_deref().map_or(true, |lang| lang.starts_with("en")))
                .map(|lit| lit.value.to_string())
                .unwrap_or_else(|| {
                    let local = uri.rsplit(|c| c == '#' || c == '/').next().unwrap_or(uri);
                    local
                        .strip_suffix("Plugin")
                        .filter(|name| !name.is_empty())
                        .unwrap_or(local)
                        .to_string()
                });
            found
        };

        let mut classes = vec![Arc::new(PluginClass::new(
            LV2_PLUGIN,
            None,
            &label_of(LV2_PLUGIN),
        ))];
        let mut seen: AHashSet<&str> = AHashSet::new();
        seen.insert(LV2_PLUGIN);

        // Breadth first, so a class with several parents hangs off the
        // shallowest one
        let mut queue: VecDeque<&str> = VecDeque::from([LV2_PLUGIN]);
        while let Some(parent) = queue.pop_front() {
            let Some(kids) = children.get(parent) else {
                continue;
            };
            for &child in kids {
                if seen.insert(child) {
                    classes.push(Arc::new(PluginClass::new(
                        child,
                        Some(parent),
                        &label_of(child),
                    )));
                    queue.push_back(child);
                }
            }
        }

        Self::from_vec(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ns::LV2;

    fn taxonomy() -> PluginClasses {
        let mut model = Model::new();
        model
            .read_str(
                r#"
                @prefix lv2:  <http://lv2plug.in/ns/lv2core#> .
                @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
                lv2:FilterPlugin rdfs:subClassOf lv2:Plugin ; rdfs:label "Filter" .
                lv2:EQPlugin rdfs:subClassOf lv2:FilterPlugin ; rdfs:label "Equaliser"@en .
                lv2:CombPlugin rdfs:subClassOf lv2:FilterPlugin .
                <http://example.org/Unrelated> rdfs:subClassOf <http://example.org/Thing> .
                "#,
                "",
                "b1_",
            )
            .unwrap();
        PluginClasses::from_model(&model)
    }

    #[test]
    fn test_taxonomy_rooted_at_plugin() {
        let classes = taxonomy();
        assert_eq!(classes.len(), 4);
        assert!(classes.by_uri("http://example.org/Unrelated").is_none());

        let root = classes.by_uri(LV2_PLUGIN).unwrap();
        assert!(root.parent_uri().is_none());
        assert_eq!(root.label().as_str(), Some("Plugin"));

        let eq = classes.by_uri(&format!("{}EQPlugin", LV2)).unwrap();
        assert_eq!(eq.parent_uri(), Some(&Node::uri(format!("{}FilterPlugin", LV2))));
        assert_eq!(eq.label().as_str(), Some("Equaliser"));
    }

    #[test]
    fn test_label_fallback_and_children() {
        let classes = taxonomy();
        let comb = classes.by_uri(&format!("{}CombPlugin", LV2)).unwrap();
        assert_eq!(comb.label().as_str(), Some("Comb"));

        let filter = Node::uri(format!("{}FilterPlugin", LV2));
        let children = classes.children(&filter);
        assert_eq!(children.len(), 2);
        assert!(children.get_by_uri(&Node::uri(format!("{}EQPlugin", LV2))).is_some());
    }
}
