//! Error types for conversion operations.
//!
//! All conversion failures are deterministic for a given input and are
//! reported once, never masked. A lookup that fails locally but succeeds
//! against a parent registry is not an error; the fallback is transparent.

use thiserror::Error;

use crate::node::NodeError;

/// Structured error types for converters and the registry.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No converter is registered for the requested type, locally or in any
    /// parent registry, and the type is not structural
    #[error("no converter registered for type {type_name}")]
    ConverterNotFound { type_name: String },

    /// The node shape or value does not match the requested target type.
    /// `context` names the converter that rejected the input; `reason`
    /// carries a wrapped parse failure when there is one
    #[error("type mismatch in {context}: expected {expected}, found {actual}{reason}")]
    TypeMismatch {
        context: String,
        expected: String,
        actual: String,
        reason: String,
    },

    /// A type shape the resolver has no strategy for; a caller-programming
    /// error, e.g. a map key type that is not scalar-representable
    #[error("unsupported type shape: {reason}")]
    UnsupportedType { reason: String },

    /// Structured node errors surfacing through conversion
    #[error(transparent)]
    Node(#[from] NodeError),
}

impl ConvertError {
    /// Builds a shape/type mismatch without parse context.
    pub fn mismatch(
        context: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        ConvertError::TypeMismatch {
            context: context.into(),
            expected: expected.into(),
            actual: actual.into(),
            reason: String::new(),
        }
    }

    /// Wraps a scalar parse failure into a type mismatch, keeping the
    /// original failure text as context.
    pub fn parse_failure(
        context: impl Into<String>,
        expected: impl Into<String>,
        text: &str,
        cause: impl std::fmt::Display,
    ) -> Self {
        ConvertError::TypeMismatch {
            context: context.into(),
            expected: expected.into(),
            actual: format!("{text:?}"),
            reason: format!(": {cause}"),
        }
    }

    /// Check if this error means no converter was found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConvertError::ConverterNotFound { .. })
    }

    /// Check if this error is a type or shape mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            ConvertError::TypeMismatch { .. }
                | ConvertError::Node(NodeError::TypeMismatch { .. })
        )
    }

    /// Check if this error flags an unsupported type shape.
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, ConvertError::UnsupportedType { .. })
    }
}

// Conversion from ConvertError to the main Error type
impl From<ConvertError> for crate::Error {
    fn from(err: ConvertError) -> Self {
        crate::Error::Convert(err)
    }
}
