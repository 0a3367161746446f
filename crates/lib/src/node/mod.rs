//! The untyped node tree that sits between typed values and wire formats.
//!
//! Every conversion in this crate passes through [`Node`], a small tagged
//! union with exactly four shapes: null, scalar, ordered sequence, and
//! insertion-ordered key-unique mapping. A codec renders a `Node` tree as a
//! concrete syntax (YAML, JSON, ...) and parses one back; the conversion
//! engine never sees the wire format.
//!
//! # Core Types
//!
//! - [`Node`] - the tree value itself
//! - [`Mapping`] - insertion-ordered, key-unique `(String, Node)` entries
//! - [`Path`] / [`PathBuf`] - dotted addresses of leaves in nested mappings
//!
//! # Invariants
//!
//! Nodes are built once from a source value and never mutated by conversion;
//! conversion only constructs new trees. A [`Mapping`] never holds two entries
//! with the same key, enforced at insertion time. Trees are finite and acyclic
//! by construction because they are produced by terminating traversals of
//! finite declared types.

use std::fmt;

pub mod errors;
mod mapping;
pub mod path;

pub use errors::NodeError;
pub use mapping::Mapping;
pub use path::{Path, PathBuf};

/// The universal intermediate tree value.
///
/// Scalars always carry the canonical *text* form of a primitive value;
/// typed converters interpret that text as an integer, float, boolean,
/// timestamp, UUID and so on. Sequence order and mapping entry order are
/// significant and preserved exactly through a round trip.
///
/// # Examples
///
/// ```
/// use treeform::node::{Mapping, Node, PathBuf};
///
/// let mut mapping = Mapping::new();
/// mapping.insert("a", Node::scalar("5")).unwrap();
/// mapping.insert("b", Node::Sequence(vec![Node::scalar("1"), Node::scalar("2")])).unwrap();
///
/// let tree = Node::Mapping(mapping);
/// let path: PathBuf = "a".parse().unwrap();
/// assert_eq!(tree.at_path(&path), Some(&Node::scalar("5")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Node {
    /// Absence of a value.
    Null,
    /// A single primitive value in its canonical text form.
    Scalar(String),
    /// An ordered list of nodes; order is significant.
    Sequence(Vec<Node>),
    /// Insertion-ordered, key-unique entries; corresponds to maps and sections.
    Mapping(Mapping),
}

impl Node {
    /// Builds a scalar node from anything with a text form.
    pub fn scalar(text: impl Into<String>) -> Self {
        Node::Scalar(text.into())
    }

    /// Returns true if this is the null node.
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Returns the shape name as a string, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Scalar(_) => "scalar",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    /// Attempts to view this node as scalar text.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to view this node as a sequence.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to view this node as a mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Scalar view, failing with [`NodeError::TypeMismatch`] on any other shape.
    pub fn try_scalar(&self) -> Result<&str, NodeError> {
        self.as_scalar().ok_or_else(|| NodeError::TypeMismatch {
            expected: "scalar".to_string(),
            actual: self.type_name().to_string(),
        })
    }

    /// Sequence view, failing with [`NodeError::TypeMismatch`] on any other shape.
    pub fn try_sequence(&self) -> Result<&[Node], NodeError> {
        self.as_sequence().ok_or_else(|| NodeError::TypeMismatch {
            expected: "sequence".to_string(),
            actual: self.type_name().to_string(),
        })
    }

    /// Mapping view, failing with [`NodeError::TypeMismatch`] on any other shape.
    pub fn try_mapping(&self) -> Result<&Mapping, NodeError> {
        self.as_mapping().ok_or_else(|| NodeError::TypeMismatch {
            expected: "mapping".to_string(),
            actual: self.type_name().to_string(),
        })
    }

    /// Resolves a dotted path through nested mappings.
    ///
    /// Returns `None` when any component is missing or when a non-mapping
    /// node is reached before the path is exhausted. The empty path resolves
    /// to `self`.
    pub fn at_path(&self, path: impl AsRef<Path>) -> Option<&Node> {
        let mut current = self;
        for component in path.as_ref().components() {
            current = current.as_mapping()?.get(component)?;
        }
        Some(current)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => write!(f, "null"),
            Node::Scalar(s) => write!(f, "{s}"),
            Node::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Node::Mapping(mapping) => write!(f, "{mapping}"),
        }
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(value.to_string())
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Sequence(value)
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Node::Mapping(value)
    }
}
