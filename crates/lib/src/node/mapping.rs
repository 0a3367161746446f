//! Insertion-ordered, key-unique mapping entries.

use std::fmt;

use super::{Node, NodeError};

/// An ordered list of `(key, value)` entries with unique keys.
///
/// Entry order is insertion order and is significant: two mappings with the
/// same entries in a different order are not equal. Key uniqueness is
/// enforced at insertion time; a duplicate key is rejected with
/// [`NodeError::DuplicateKey`] rather than silently overwritten, so callers
/// that must not produce duplicates (the mapper) surface their defect
/// immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, rejecting duplicate keys.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Result<(), NodeError> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(NodeError::DuplicateKey { key });
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns true if an entry with `key` exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Node);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, Node)>,
        fn(&'a (String, Node)) -> (&'a String, &'a Node),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}
