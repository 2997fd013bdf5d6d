use crate::node::Node;
use crate::plugin::Plugin;
use ahash::AHashMap;
use std::sync::Arc;

/// Discovered plugins in registration order, indexed by URI
#[derive(Debug, Clone, Default)]
pub struct Plugins {
    list: Vec<Arc<Plugin>>,
    index: AHashMap<Arc<str>, usize>,
}

impl Plugins {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Plugin>> {
        self.list.iter()
    }

    pub fn get(&self, position: usize) -> Option<&Arc<Plugin>> {
        self.list.get(position)
    }

    pub fn get_by_uri(&self, uri: &Node) -> Option<&Arc<Plugin>> {
        uri.as_uri().and_then(|uri| self.by_uri(uri))
    }

    pub fn by_uri(&self, uri: &str) -> Option<&Arc<Plugin>> {
        self.index.get(uri).map(|&i| &self.list[i])
    }

    /// Plugins for which `include` returns true
    pub fn filter(&self, mut include: impl FnMut(&Plugin) -> bool) -> Plugins {
        let mut out = Plugins::default();
        for plugin in &self.list {
            if include(plugin) {
                out.insert(Arc::clone(plugin));
            }
        }
        out
    }

    /// Register `plugin`; false if its URI is already present
    pub(crate) fn insert(&mut self, plugin: Arc<Plugin>) -> bool {
        let Some(uri) = plugin.uri().as_uri() else {
            return false;
        };
        if self.index.contains_key(uri) {
            return false;
        }
        self.index.insert(Arc::from(uri), self.list.len());
        self.list.push(plugin);
        true
    }
}

impl<'a> IntoIterator for &'a Plugins {
    type Item = &'a Arc<Plugin>;
    type IntoIter = std::slice::Iter<'a, Arc<Plugin>>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
