//! The conversion engine: converters, type tags, and the registry.
//!
//! This module turns typed values into [`Node`](crate::node::Node) trees and
//! back. Leaf types go through registered [`ScalarConverter`]s; arrays,
//! collections and maps are decomposed structurally and recursed into via
//! the [`Registry`], driven by [`TypeTag`] descriptors built at
//! registration time rather than by runtime type inspection.
//!
//! # Core Types
//!
//! - [`Registry`] - type-to-converter bindings, fallback rules, parent chaining
//! - [`ScalarConverter`] / [`Converter`] - typed and type-erased converter traits
//! - [`Convertible`] - derives tags and moves values through [`DynValue`]
//! - [`TypeTag`] / [`ValueTag`] - runtime type descriptors
//!
//! # Extending
//!
//! Applications add domain-specific scalar types by implementing
//! [`ScalarConverter`], registering it, and declaring the type with
//! [`leaf_convertible!`](crate::leaf_convertible):
//!
//! ```
//! use treeform::convert::{ConvertError, Registry, ScalarConverter};
//! use treeform::leaf_convertible;
//! use treeform::node::Node;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Port(u16);
//!
//! #[derive(Default)]
//! struct PortConverter;
//!
//! impl ScalarConverter for PortConverter {
//!     type Target = Port;
//!
//!     fn to_node(&self, value: &Port) -> Result<Node, ConvertError> {
//!         Ok(Node::scalar(value.0.to_string()))
//!     }
//!
//!     fn from_node(&self, node: &Node) -> Result<Port, ConvertError> {
//!         let text = node.try_scalar().map_err(ConvertError::from)?;
//!         text.parse()
//!             .map(Port)
//!             .map_err(|e| ConvertError::parse_failure("PortConverter", "Port", text, e))
//!     }
//! }
//!
//! leaf_convertible!(Port);
//!
//! let registry = Registry::with_defaults();
//! registry.register(PortConverter);
//! let node = registry.to_node_for(&Port(8080)).unwrap();
//! assert_eq!(registry.from_node_for::<Port>(&node).unwrap(), Port(8080));
//! ```

mod converter;
mod convertible;
pub mod errors;
mod registry;
pub mod scalars;
pub(crate) mod structural;
mod tag;
mod value;

pub use converter::{Converter, ScalarConverter};
pub use convertible::Convertible;
pub use errors::ConvertError;
pub use registry::{FallbackRule, Registry};
pub use tag::{TypeTag, ValueTag};
pub use value::DynValue;
