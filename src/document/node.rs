//! Dynamically-typed tree nodes.
//!
//! A document is a tree of `Node`s where every node is either a keyed
//! mapping, an ordered sequence, or a scalar leaf. This is the shape produced
//! by decoding schema-less formats such as JSON or YAML, and it is what the
//! traversal engine in [`crate::traverse`] walks.
//!
//! # Example
//!
//! ```
//! use deepquill::document::node::{Kind, Node};
//!
//! let node = Node::mapping([
//!     ("name", Node::from("deepquill")),
//!     ("tags", Node::sequence([Node::from("json"), Node::from("yaml")])),
//! ]);
//!
//! assert_eq!(node.kind(), Kind::Mapping);
//! assert!(node.get("tags").unwrap().is_sequence());
//! ```

use indexmap::IndexMap;
use std::fmt;

/// The four-way classification used to decide how a node is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A keyed mapping
    Mapping,
    /// An ordered sequence
    Sequence,
    /// A string scalar
    String,
    /// Any other scalar (number, boolean, null)
    Other,
}

/// A leaf value with no further structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl Scalar {
    /// Short human-readable name of the scalar's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Integer(_) | Scalar::Unsigned(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Boolean(_) => "boolean",
            Scalar::Null => "null",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Unsigned(u) => write!(f, "{}", u),
            Scalar::Float(fl) => write!(f, "{}", fl),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Null => write!(f, "null"),
        }
    }
}

/// A node of a dynamically-typed tree.
///
/// Mappings are backed by an `IndexMap`, which happens to remember insertion
/// order. Nothing in this crate promises an order for mapping keys though, so
/// callers should treat sibling keys as unordered.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Unique string keys to child nodes
    Mapping(IndexMap<String, Node>),
    /// Ordered, possibly heterogeneous children
    Sequence(Vec<Node>),
    /// A leaf
    Scalar(Scalar),
}

impl Node {
    /// Builds a mapping node from `(key, value)` pairs.
    ///
    /// Later duplicates overwrite earlier ones, so keys stay unique.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a sequence node.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        Node::Sequence(items.into_iter().collect())
    }

    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Classifies this node.
    ///
    /// # Example
    ///
    /// ```
    /// use deepquill::document::node::{Kind, Node};
    ///
    /// assert_eq!(Node::from("x").kind(), Kind::String);
    /// assert_eq!(Node::from(1).kind(), Kind::Other);
    /// assert_eq!(Node::sequence([]).kind(), Kind::Sequence);
    /// ```
    pub fn kind(&self) -> Kind {
        match self {
            Node::Mapping(_) => Kind::Mapping,
            Node::Sequence(_) => Kind::Sequence,
            Node::Scalar(Scalar::String(_)) => Kind::String,
            Node::Scalar(_) => Kind::Other,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    /// Returns true for the node kinds the traversal engine descends into.
    pub fn is_mapping_or_sequence(&self) -> bool {
        self.is_mapping() || self.is_sequence()
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::String(_)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Looks up a direct child of a mapping. Returns `None` for any other kind.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Short human-readable name of the node's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(s) => s.type_name(),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::null()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(s) => write!(f, "{}", s),
            other => match serde_json::to_string(other) {
                Ok(text) => write!(f, "{}", text),
                Err(_) => write!(f, "{:?}", other),
            },
        }
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<IndexMap<String, Node>> for Node {
    fn from(map: IndexMap<String, Node>) -> Self {
        Node::Mapping(map)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Boolean(b))
    }
}

macro_rules! node_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Node {
            fn from(v: $t) -> Self {
                Node::Scalar(Scalar::Integer(v as i64))
            }
        })*
    };
}

// Unsigned values that fit in i64 are stored as `Integer`, matching what the
// JSON and YAML decoders produce for the same numeral.
macro_rules! node_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Node {
            fn from(v: $t) -> Self {
                let v = v as u64;
                match i64::try_from(v) {
                    Ok(i) => Node::Scalar(Scalar::Integer(i)),
                    Err(_) => Node::Scalar(Scalar::Unsigned(v)),
                }
            }
        })*
    };
}

node_from_signed!(i8, i16, i32, i64, isize);
node_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Node {
    fn from(v: f32) -> Self {
        Node::Scalar(Scalar::Float(v as f64))
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Node::Scalar(Scalar::Float(v))
    }
}
