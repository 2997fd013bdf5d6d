use crate::node::Node;

/// A plugin user interface descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Ui {
    pub(crate) uri: Node,
    pub(crate) class: Node,
    pub(crate) binary: Node,
}

impl Ui {
    pub fn uri(&self) -> &Node {
        &self.uri
    }

    /// UI type, e.g. `ui:GtkUI`
    pub fn class(&self) -> &Node {
        &self.class
    }

    /// Library implementing the UI
    pub fn binary(&self) -> &Node {
        &self.binary
    }

    pub fn is_a(&self, class: &Node) -> bool {
        self.class == *class
    }
}
