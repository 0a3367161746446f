//! Error types for the reflective mapper.

use thiserror::Error;

use crate::convert::ConvertError;

/// Structured error types for mapping declared sections to trees and back.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MapperError {
    /// Two distinct field declarations resolve to the same path. Both
    /// offending declarations are named. Raised before any conversion work,
    /// so a partially-built tree is never observed
    #[error("duplicated path '{path}': declared by both {first} and {second}")]
    DuplicatedPath {
        path: String,
        first: String,
        second: String,
    },

    /// A declared field name is not a valid single path component: it is
    /// empty or contains a dot, so the validated path set and the produced
    /// tree would disagree about its meaning
    #[error("invalid field name '{name}' declared by {declaration}: a name is one non-empty path component and cannot contain dots")]
    InvalidFieldName { name: String, declaration: String },

    /// A section was loaded from a node that is not a mapping
    #[error("expected a mapping node for a section, found {actual}")]
    NotASection { actual: String },

    /// Conversion failures surfacing through mapping
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl MapperError {
    /// Check if this error is a path collision.
    pub fn is_duplicated_path(&self) -> bool {
        matches!(self, MapperError::DuplicatedPath { .. })
    }

    /// Check if this error is a rejected field name.
    pub fn is_invalid_field_name(&self) -> bool {
        matches!(self, MapperError::InvalidFieldName { .. })
    }

    /// Check if this error came from a section/mapping shape mismatch.
    pub fn is_not_a_section(&self) -> bool {
        matches!(self, MapperError::NotASection { .. })
    }

    /// Check if this error wraps a conversion failure.
    pub fn is_convert_error(&self) -> bool {
        matches!(self, MapperError::Convert(_))
    }
}

// Conversion from MapperError to the main Error type
impl From<MapperError> for crate::Error {
    fn from(err: MapperError) -> Self {
        crate::Error::Mapper(err)
    }
}
