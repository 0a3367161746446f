//! Error types for node tree operations.

use thiserror::Error;

/// Structured error types for the node model.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeError {
    /// A typed accessor was used on a node of another shape
    #[error("node type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// An entry with this key already exists in the mapping
    #[error("duplicate mapping key: {key}")]
    DuplicateKey { key: String },
}

impl NodeError {
    /// Check if this error is a shape mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, NodeError::TypeMismatch { .. })
    }

    /// Check if this error is a duplicate-key rejection.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, NodeError::DuplicateKey { .. })
    }
}

// Conversion from NodeError to the main Error type
impl From<NodeError> for crate::Error {
    fn from(err: NodeError) -> Self {
        crate::Error::Node(err)
    }
}
