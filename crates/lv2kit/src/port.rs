use crate::node::{Node, Nodes};

/// One connection point of a plugin
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub(crate) node: Node,
    pub(crate) index: u32,
    pub(crate) symbol: Node,
    pub(crate) classes: Nodes,
}

impl Port {
    pub(crate) fn new(node: Node, index: u32, symbol: Node) -> Self {
        Port {
            node,
            index,
            symbol,
            classes: Nodes::new(),
        }
    }

    /// Subject the port is described by (usually a blank node)
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn symbol(&self) -> &Node {
        &self.symbol
    }

    /// Declared `rdf:type` values, in declaration order
    pub fn classes(&self) -> &Nodes {
        &self.classes
    }

    pub fn is_a(&self, class: &Node) -> bool {
        self.classes.contains(class)
    }
}
