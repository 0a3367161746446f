//! The type-erased value passed between field accessors and the registry.

use std::any::{Any, type_name};
use std::fmt;

use super::ConvertError;

/// A type-erased value on its way into or out of the node tree.
///
/// Leaf values travel as a boxed `Any`; arrays, collections and maps are
/// decomposed into `Seq`/`Map` shells by [`Convertible`](super::Convertible)
/// implementations so the registry's structural converters can recurse into
/// their elements without knowing the concrete container type.
pub enum DynValue {
    /// Absent value; converts to and from the null node.
    None,
    /// A leaf value, converted by a registered converter.
    Value(Box<dyn Any + Send + Sync>),
    /// Ordered elements of an array or collection.
    Seq(Vec<DynValue>),
    /// Ordered `(key, value)` entries of a map.
    Map(Vec<(DynValue, DynValue)>),
}

impl DynValue {
    /// Boxes a concrete leaf value.
    pub fn of<T: Send + Sync + 'static>(value: T) -> Self {
        DynValue::Value(Box::new(value))
    }

    /// Returns true if this is the absent value.
    pub fn is_none(&self) -> bool {
        matches!(self, DynValue::None)
    }

    /// Returns the shape name as a string, for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            DynValue::None => "none",
            DynValue::Value(_) => "value",
            DynValue::Seq(_) => "seq",
            DynValue::Map(_) => "map",
        }
    }

    /// Borrows the leaf value as `T`, if this is a leaf of that type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            DynValue::Value(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Unwraps the leaf value as `T`, failing with a type mismatch otherwise.
    pub fn downcast<T: 'static>(self) -> Result<T, ConvertError> {
        match self {
            DynValue::Value(any) => any.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
                ConvertError::mismatch("value downcast", type_name::<T>(), "a different leaf type")
            }),
            other => Err(ConvertError::mismatch(
                "value downcast",
                type_name::<T>(),
                other.shape(),
            )),
        }
    }
}

impl fmt::Debug for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynValue::None => write!(f, "DynValue::None"),
            DynValue::Value(_) => write!(f, "DynValue::Value(..)"),
            DynValue::Seq(items) => write!(f, "DynValue::Seq(len={})", items.len()),
            DynValue::Map(entries) => write!(f, "DynValue::Map(len={})", entries.len()),
        }
    }
}
