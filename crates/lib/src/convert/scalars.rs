//! Built-in converters for primitive and common scalar types.
//!
//! Every scalar travels through the tree as its canonical text form:
//! `true`/`false` for booleans, decimal digits for integers, the shortest
//! round-trip decimal for floats, RFC 3339 for timestamps, the hyphenated
//! form for UUIDs. Parse failures are wrapped into a type mismatch carrying
//! the original failure text; raw parse errors never escape.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::node::Node;

use super::{ConvertError, Registry, ScalarConverter};

/// Declares a converter for a type whose node form is `Display` out and
/// `FromStr` back.
macro_rules! text_scalar_converter {
    ($($name:ident => $ty:ty),+ $(,)?) => {
        $(
            #[derive(Debug, Default, Clone, Copy)]
            pub struct $name;

            impl ScalarConverter for $name {
                type Target = $ty;

                fn to_node(&self, value: &$ty) -> Result<Node, ConvertError> {
                    Ok(Node::scalar(value.to_string()))
                }

                fn from_node(&self, node: &Node) -> Result<$ty, ConvertError> {
                    let text = scalar_text(node, stringify!($ty))?;
                    text.parse::<$ty>().map_err(|err| {
                        ConvertError::parse_failure(stringify!($name), stringify!($ty), text, err)
                    })
                }
            }
        )+
    };
}

fn scalar_text<'a>(node: &'a Node, expected: &str) -> Result<&'a str, ConvertError> {
    node.as_scalar()
        .ok_or_else(|| ConvertError::mismatch(expected, "scalar", node.type_name()))
}

text_scalar_converter! {
    BoolConverter => bool,
    I8Converter => i8,
    I16Converter => i16,
    I32Converter => i32,
    I64Converter => i64,
    IsizeConverter => isize,
    U8Converter => u8,
    U16Converter => u16,
    U32Converter => u32,
    U64Converter => u64,
    UsizeConverter => usize,
    F32Converter => f32,
    F64Converter => f64,
    CharConverter => char,
    UuidConverter => Uuid,
    NaiveDateConverter => NaiveDate,
}

/// Strings pass through unchanged; any scalar text is a valid string.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringConverter;

impl ScalarConverter for StringConverter {
    type Target = String;

    fn to_node(&self, value: &String) -> Result<Node, ConvertError> {
        Ok(Node::scalar(value.clone()))
    }

    fn from_node(&self, node: &Node) -> Result<String, ConvertError> {
        Ok(scalar_text(node, "String")?.to_string())
    }
}

/// UTC timestamps in RFC 3339 text form.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeConverter;

impl ScalarConverter for DateTimeConverter {
    type Target = DateTime<Utc>;

    fn to_node(&self, value: &DateTime<Utc>) -> Result<Node, ConvertError> {
        Ok(Node::scalar(value.to_rfc3339()))
    }

    fn from_node(&self, node: &Node) -> Result<DateTime<Utc>, ConvertError> {
        let text = scalar_text(node, "DateTime<Utc>")?;
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| {
                ConvertError::parse_failure("DateTimeConverter", "DateTime<Utc>", text, err)
            })
    }
}

/// Registers every built-in converter into `registry`.
pub(crate) fn register_defaults(registry: &Registry) {
    registry.register(BoolConverter);
    registry.register(I8Converter);
    registry.register(I16Converter);
    registry.register(I32Converter);
    registry.register(I64Converter);
    registry.register(IsizeConverter);
    registry.register(U8Converter);
    registry.register(U16Converter);
    registry.register(U32Converter);
    registry.register(U64Converter);
    registry.register(UsizeConverter);
    registry.register(F32Converter);
    registry.register(F64Converter);
    registry.register(CharConverter);
    registry.register(StringConverter);
    registry.register(UuidConverter);
    registry.register(DateTimeConverter);
    registry.register(NaiveDateConverter);
}
