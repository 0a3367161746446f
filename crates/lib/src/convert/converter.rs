//! The converter traits and the typed-to-erased adapter.

use std::any::{TypeId, type_name};

use crate::node::Node;

use super::{ConvertError, DynValue, Registry, ValueTag};

/// A type-erased bidirectional converter between one leaf type and [`Node`].
///
/// The registry stores converters behind this trait. Implementations are
/// stateless and side-effect free; a converter never holds a reference to the
/// registry that owns it. The registry is passed in explicitly for the rare
/// converter that must recurse (the structural converters do this; leaf
/// converters ignore it).
pub trait Converter: Send + Sync {
    /// The `TypeId` of the converter implementation itself.
    ///
    /// [`Registry::remove`] accepts either a target type or a converter type;
    /// this is how the latter is matched.
    fn converter_id(&self) -> TypeId;

    /// The leaf type this converter produces and consumes.
    fn target(&self) -> ValueTag;

    /// Converts a leaf value into a node.
    fn to_node(&self, registry: &Registry, value: &DynValue) -> Result<Node, ConvertError>;

    /// Converts a node back into a leaf value.
    fn from_node(&self, registry: &Registry, node: &Node) -> Result<DynValue, ConvertError>;
}

/// A typed bidirectional converter between `Target` and [`Node`].
///
/// This is the trait applications implement for domain-specific scalar types
/// (identifiers, locale tags, ...). It is registered through
/// [`Registry::register`], which wraps it in the downcasting adapter.
///
/// Scalar converters interpret and produce the canonical text form of their
/// target; parse failures must be wrapped with
/// [`ConvertError::parse_failure`], never surfaced raw.
pub trait ScalarConverter: Send + Sync + 'static {
    type Target: Send + Sync + 'static;

    /// Converts a value into its node form.
    fn to_node(&self, value: &Self::Target) -> Result<Node, ConvertError>;

    /// Converts a node back into a value.
    fn from_node(&self, node: &Node) -> Result<Self::Target, ConvertError>;
}

/// Adapter erasing a [`ScalarConverter`] into a [`Converter`].
pub(crate) struct Erased<C>(pub C);

impl<C: ScalarConverter> Converter for Erased<C> {
    fn converter_id(&self) -> TypeId {
        TypeId::of::<C>()
    }

    fn target(&self) -> ValueTag {
        ValueTag::of::<C::Target>()
    }

    fn to_node(&self, _registry: &Registry, value: &DynValue) -> Result<Node, ConvertError> {
        let value = value.downcast_ref::<C::Target>().ok_or_else(|| {
            ConvertError::mismatch(type_name::<C>(), self.target().name, value.shape())
        })?;
        self.0.to_node(value)
    }

    fn from_node(&self, _registry: &Registry, node: &Node) -> Result<DynValue, ConvertError> {
        Ok(DynValue::of(self.0.from_node(node)?))
    }
}
