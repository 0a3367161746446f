//! Runtime type descriptors for conversion dispatch.
//!
//! [`TypeTag`] is a closed, recursive description of a convertible type:
//! either a leaf value type resolved through the registry, or one of the
//! three structural shapes (fixed-size array, ordered list, map) handled by
//! the registry's built-in structural converters. It is the registration-time
//! replacement for open-ended runtime type inspection.

use std::{
    any::{TypeId, type_name},
    fmt,
};

/// Identity of a leaf value type: its `TypeId` plus a stable display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueTag {
    pub id: TypeId,
    pub name: &'static str,
}

impl ValueTag {
    /// The tag for a concrete leaf type.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A recursive runtime type descriptor.
///
/// `Value` tags resolve to a registered converter; the structural variants
/// delegate to the registry's array/sequence/map converters with their
/// element, key and value tags threaded through for recursive conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    /// A leaf type converted by a registered converter.
    Value(ValueTag),
    /// A fixed-size array of `len` elements.
    Array { elem: Box<TypeTag>, len: usize },
    /// An ordered, growable collection.
    List(Box<TypeTag>),
    /// An ordered map; keys must be scalar-representable.
    Map {
        key: Box<TypeTag>,
        value: Box<TypeTag>,
    },
}

impl TypeTag {
    /// Leaf tag for a concrete type.
    pub fn value<T: 'static>() -> Self {
        TypeTag::Value(ValueTag::of::<T>())
    }

    /// Fixed-size array tag.
    pub fn array(elem: TypeTag, len: usize) -> Self {
        TypeTag::Array {
            elem: Box::new(elem),
            len,
        }
    }

    /// Ordered collection tag.
    pub fn list(elem: TypeTag) -> Self {
        TypeTag::List(Box::new(elem))
    }

    /// Map tag.
    pub fn map(key: TypeTag, value: TypeTag) -> Self {
        TypeTag::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Value(tag) => write!(f, "{tag}"),
            TypeTag::Array { elem, len } => write!(f, "[{elem}; {len}]"),
            TypeTag::List(elem) => write!(f, "list<{elem}>"),
            TypeTag::Map { key, value } => write!(f, "map<{key}, {value}>"),
        }
    }
}
