//! The bridge between concrete Rust types and type-erased conversion.
//!
//! [`Convertible`] supplies a type's [`TypeTag`] and moves values in and out
//! of [`DynValue`]. Leaf types box themselves; containers decompose into
//! `Seq`/`Map` shells so the registry's structural converters can recurse
//! into elements without knowing the container.
//!
//! Implementations are provided for every type with a built-in converter,
//! plus `Vec<T>`, `[T; N]`, `Option<T>`, `BTreeMap<K, V>` and
//! `HashMap<K, V>` over convertible element types. Applications declare
//! additional leaf types with [`leaf_convertible!`](crate::leaf_convertible),
//! pairing it with a registered [`ScalarConverter`](super::ScalarConverter).

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::{ConvertError, DynValue, TypeTag};

/// A type that can travel through the conversion engine.
pub trait Convertible: Send + Sync + 'static {
    /// The runtime type descriptor driving registry dispatch.
    fn type_tag() -> TypeTag;

    /// Decomposes the value into its type-erased form.
    fn to_dyn(&self) -> DynValue;

    /// Reassembles the value from its type-erased form.
    fn from_dyn(value: DynValue) -> Result<Self, ConvertError>
    where
        Self: Sized;
}

/// Implements [`Convertible`] for leaf types.
///
/// The type must be `Clone + Send + Sync + 'static`. Pair this with a
/// registered converter for the same type, or conversion will fail with
/// `ConverterNotFound` at runtime.
#[macro_export]
macro_rules! leaf_convertible {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::convert::Convertible for $ty {
                fn type_tag() -> $crate::convert::TypeTag {
                    $crate::convert::TypeTag::value::<$ty>()
                }

                fn to_dyn(&self) -> $crate::convert::DynValue {
                    $crate::convert::DynValue::of(::std::clone::Clone::clone(self))
                }

                fn from_dyn(
                    value: $crate::convert::DynValue,
                ) -> ::std::result::Result<Self, $crate::convert::ConvertError> {
                    value.downcast::<$ty>()
                }
            }
        )+
    };
}

leaf_convertible!(
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    char,
    String,
    uuid::Uuid,
    chrono::NaiveDate,
    chrono::DateTime<chrono::Utc>,
);

impl<T: Convertible> Convertible for Vec<T> {
    fn type_tag() -> TypeTag {
        TypeTag::list(T::type_tag())
    }

    fn to_dyn(&self) -> DynValue {
        DynValue::Seq(self.iter().map(T::to_dyn).collect())
    }

    fn from_dyn(value: DynValue) -> Result<Self, ConvertError> {
        match value {
            DynValue::Seq(items) => items.into_iter().map(T::from_dyn).collect(),
            other => Err(ConvertError::mismatch("Vec", "seq", other.shape())),
        }
    }
}

impl<T: Convertible, const N: usize> Convertible for [T; N] {
    fn type_tag() -> TypeTag {
        TypeTag::array(T::type_tag(), N)
    }

    fn to_dyn(&self) -> DynValue {
        DynValue::Seq(self.iter().map(T::to_dyn).collect())
    }

    fn from_dyn(value: DynValue) -> Result<Self, ConvertError> {
        let items = match value {
            DynValue::Seq(items) => items,
            other => return Err(ConvertError::mismatch("array", "seq", other.shape())),
        };
        let found = items.len();
        let elements: Vec<T> = items
            .into_iter()
            .map(T::from_dyn)
            .collect::<Result<_, _>>()?;
        elements.try_into().map_err(|_| {
            ConvertError::mismatch(
                "array",
                format!("{N} elements"),
                format!("{found} elements"),
            )
        })
    }
}

/// `Option` shares its inner type's tag: `None` is the absent value, and an
/// absent or null entry loads back as `None`.
impl<T: Convertible> Convertible for Option<T> {
    fn type_tag() -> TypeTag {
        T::type_tag()
    }

    fn to_dyn(&self) -> DynValue {
        match self {
            Some(value) => value.to_dyn(),
            None => DynValue::None,
        }
    }

    fn from_dyn(value: DynValue) -> Result<Self, ConvertError> {
        match value {
            DynValue::None => Ok(None),
            other => T::from_dyn(other).map(Some),
        }
    }
}

impl<K, V> Convertible for BTreeMap<K, V>
where
    K: Convertible + Ord,
    V: Convertible,
{
    fn type_tag() -> TypeTag {
        TypeTag::map(K::type_tag(), V::type_tag())
    }

    fn to_dyn(&self) -> DynValue {
        DynValue::Map(self.iter().map(|(k, v)| (k.to_dyn(), v.to_dyn())).collect())
    }

    fn from_dyn(value: DynValue) -> Result<Self, ConvertError> {
        let entries = match value {
            DynValue::Map(entries) => entries,
            other => return Err(ConvertError::mismatch("BTreeMap", "map", other.shape())),
        };
        let mut map = BTreeMap::new();
        for (key, entry_value) in entries {
            map.insert(K::from_dyn(key)?, V::from_dyn(entry_value)?);
        }
        Ok(map)
    }
}

impl<K, V> Convertible for HashMap<K, V>
where
    K: Convertible + Eq + Hash,
    V: Convertible,
{
    fn type_tag() -> TypeTag {
        TypeTag::map(K::type_tag(), V::type_tag())
    }

    fn to_dyn(&self) -> DynValue {
        DynValue::Map(self.iter().map(|(k, v)| (k.to_dyn(), v.to_dyn())).collect())
    }

    fn from_dyn(value: DynValue) -> Result<Self, ConvertError> {
        let entries = match value {
            DynValue::Map(entries) => entries,
            other => return Err(ConvertError::mismatch("HashMap", "map", other.shape())),
        };
        let mut map = HashMap::with_capacity(entries.len());
        for (key, entry_value) in entries {
            map.insert(K::from_dyn(key)?, V::from_dyn(entry_value)?);
        }
        Ok(map)
    }
}
