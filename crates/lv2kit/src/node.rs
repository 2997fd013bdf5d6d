//! Typed values handed to hosts
//!
//! A [`Node`] is the host-facing view of a store term: literals are
//! classified by datatype so callers can ask for an integer or a float
//! without knowing the XSD vocabulary.

use crate::ns::XSD;
use lv2kit_store::{Literal, Term};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Uri(Arc<str>),
    Blank(Arc<str>),
    String(Arc<str>),
    Int(i64),
    Float(f64),
    Bool(bool),
}

fn literal_to_node(lit: &Literal) -> Node {
    let value = lit.value.trim();
    let parsed = if lit.has_xsd_type("integer") || lit.has_xsd_type("int") || lit.has_xsd_type("long")
    {
        value.parse().ok().map(Node::Int)
    } else if lit.has_xsd_type("decimal") || lit.has_xsd_type("double") || lit.has_xsd_type("float")
    {
        value.parse().ok().map(Node::Float)
    } else if lit.has_xsd_type("boolean") {
        match value {
            "true" | "1" => Some(Node::Bool(true)),
            "false" | "0" => Some(Node::Bool(false)),
            _ => None,
        }
    } else {
        None
    };
    parsed.unwrap_or_else(|| Node::String(Arc::clone(&lit.value)))
}

impl Node {
    pub fn uri(value: impl Into<Arc<str>>) -> Self {
        Node::Uri(value.into())
    }

    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Node::String(value.into())
    }

    pub fn is_uri(&self) -> bool {
        matches!(self, Node::Uri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Node::String(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Node::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Node::Float(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Node::Bool(_))
    }

    pub fn is_literal(&self) -> bool {
        !self.is_uri() && !self.is_blank()
    }

    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Node::Uri(uri) => Some(uri),
            _ => None,
        }
    }

    pub fn as_blank(&self) -> Option<&str> {
        match self {
            Node::Blank(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Node::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Numeric value; integers are widened
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Node::Float(f) => Some(f),
            Node::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Node::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Value as it would be written in a Turtle document
    pub fn turtle_token(&self) -> String {
        match self {
            Node::Uri(uri) => format!("<{}>", uri),
            Node::Blank(label) => format!("_:{}", label),
            Node::String(s) => format!("\"{}\"", s.escape_default()),
            Node::Int(i) => i.to_string(),
            Node::Float(f) => format!("{:?}", f),
            Node::Bool(b) => b.to_string(),
        }
    }

    /// Store term for this value, used as a query pattern
    pub fn to_term(&self) -> Term {
        match self {
            Node::Uri(uri) => Term::Iri(Arc::clone(uri)),
            Node::Blank(label) => Term::Blank(Arc::clone(label)),
            Node::String(s) => Term::Literal(Literal {
                value: Arc::clone(s),
                datatype: None,
                language: None,
            }),
            Node::Int(i) => Term::typed(i.to_string(), format!("{}integer", XSD)),
            Node::Float(f) => Term::typed(format!("{:?}", f), format!("{}decimal", XSD)),
            Node::Bool(b) => Term::typed(b.to_string(), format!("{}boolean", XSD)),
        }
    }
}

impl From<&Term> for Node {
    fn from(term: &Term) -> Self {
        match term {
            Term::Iri(iri) => Node::Uri(Arc::clone(iri)),
            Term::Blank(label) => Node::Blank(Arc::clone(label)),
            Term::Literal(lit) => literal_to_node(lit),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Uri(s) | Node::Blank(s) | Node::String(s) => f.write_str(s),
            Node::Int(i) => write!(f, "{}", i),
            Node::Float(v) => write!(f, "{}", v),
            Node::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Small ordered collection of values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nodes(SmallVec<[Node; 4]>);

impl Nodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Node> {
        self.0.first()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.0.contains(node)
    }

    pub fn push(&mut self, node: Node) {
        self.0.push(node);
    }
}

impl FromIterator<Node> for Nodes {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Nodes(iter.into_iter().collect())
    }
}

impl IntoIterator for Nodes {
    type Item = Node;
    type IntoIter = smallvec::IntoIter<[Node; 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Nodes {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
