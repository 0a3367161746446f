//!
//! Treeform: bidirectional conversion between typed Rust values and an
//! ordered, format-agnostic node tree, built for persisting and restoring
//! structured configuration data.
//!
//! ## Core Concepts
//!
//! * **Nodes (`node::Node`)**: The untyped intermediate tree value - null,
//!   scalar text, ordered sequence, or insertion-ordered key-unique mapping.
//! * **Converters (`convert::ScalarConverter`)**: Pure bidirectional mappings
//!   between one concrete type and a node. Independent, stateless, unaware of
//!   each other.
//! * **Registry (`convert::Registry`)**: Owns type-to-converter bindings,
//!   resolves arrays/collections/maps through built-in structural converters,
//!   and chains to an optional parent registry for types not bound locally.
//! * **Sections (`mapper::Section`)**: Declared configuration structs walked
//!   field-by-field into a path-addressed tree and back, with duplicate-path
//!   and shadowing conflicts detected before any conversion runs.
//! * **Codecs (`codec::Codec`)**: The out-of-core boundary that renders a
//!   node tree as a concrete wire syntax and parses one back.
//!
//! ## Saving and loading a config
//!
//! ```
//! use treeform::convert::Registry;
//! use treeform::{mapper, section};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Nested {
//!     b: String,
//!     c: Vec<i64>,
//! }
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Config {
//!     a: i64,
//!     section: Nested,
//! }
//!
//! section!(Nested { b: value, c: value });
//! section!(Config { a: value, section: nested });
//!
//! let registry = Registry::with_defaults();
//! let config = Config {
//!     a: 5,
//!     section: Nested { b: "x".into(), c: vec![1, 2, 3] },
//! };
//!
//! let tree = mapper::to_tree(&config, &registry).unwrap();
//! let restored: Config = mapper::from_tree(&tree, &registry).unwrap();
//! assert_eq!(restored, config);
//! ```

pub mod codec;
pub mod convert;
pub mod mapper;
pub mod node;

/// Re-export the `Node` tree value for easier access.
pub use node::Node;

/// Result type used throughout the treeform library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the treeform library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured node tree errors from the node module
    #[error(transparent)]
    Node(node::NodeError),

    /// Structured conversion errors from the convert module
    #[error(transparent)]
    Convert(convert::ConvertError),

    /// Structured mapping errors from the mapper module
    #[error(transparent)]
    Mapper(mapper::MapperError),

    /// Failures raised by a codec implementation at the parse/render boundary
    #[error("codec error: {reason}")]
    Codec { reason: String },
}

impl Error {
    /// Builds a codec-boundary error from any displayable cause.
    pub fn codec(reason: impl std::fmt::Display) -> Self {
        Error::Codec {
            reason: reason.to_string(),
        }
    }

    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Node(_) => "node",
            Error::Convert(_) => "convert",
            Error::Mapper(_) => "mapper",
            Error::Codec { .. } => "codec",
        }
    }

    /// Check if this error means no converter was registered for a type.
    pub fn is_converter_not_found(&self) -> bool {
        match self {
            Error::Convert(err) => err.is_not_found(),
            Error::Mapper(mapper::MapperError::Convert(err)) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a type or shape mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            Error::Node(err) => err.is_type_mismatch(),
            Error::Convert(err) => err.is_type_mismatch(),
            Error::Mapper(mapper::MapperError::Convert(err)) => err.is_type_mismatch(),
            Error::Mapper(err) => err.is_not_a_section(),
            _ => false,
        }
    }

    /// Check if this error is a duplicated-path conflict.
    pub fn is_duplicated_path(&self) -> bool {
        match self {
            Error::Mapper(err) => err.is_duplicated_path(),
            _ => false,
        }
    }
}
