//! The three built-in structural converters: array, sequence, map.
//!
//! Structural converters recurse into the registry for element, key and
//! value conversion instead of converting a fixed leaf type. They are owned
//! directly by the registry and invoked with the relevant tags threaded
//! through, not registered in the converter map.

use crate::node::{Mapping, Node};

use super::{ConvertError, DynValue, Registry, TypeTag};

fn expect_seq<'a>(value: &'a DynValue, context: &str) -> Result<&'a [DynValue], ConvertError> {
    match value {
        DynValue::Seq(items) => Ok(items),
        other => Err(ConvertError::mismatch(context, "seq", other.shape())),
    }
}

fn expect_sequence_node<'a>(node: &'a Node, context: &str) -> Result<&'a [Node], ConvertError> {
    node.as_sequence()
        .ok_or_else(|| ConvertError::mismatch(context, "sequence", node.type_name()))
}

/// Fixed-size arrays: exactly `len` elements, converted positionally.
#[derive(Debug, Default)]
pub(crate) struct ArrayConverter;

impl ArrayConverter {
    pub fn to_node(
        &self,
        registry: &Registry,
        value: &DynValue,
        elem: &TypeTag,
        len: usize,
    ) -> Result<Node, ConvertError> {
        let items = expect_seq(value, "array converter")?;
        if items.len() != len {
            return Err(ConvertError::mismatch(
                "array converter",
                format!("{len} elements"),
                format!("{} elements", items.len()),
            ));
        }
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(registry.to_node(item, elem)?);
        }
        Ok(Node::Sequence(out))
    }

    pub fn from_node(
        &self,
        registry: &Registry,
        node: &Node,
        elem: &TypeTag,
        len: usize,
    ) -> Result<DynValue, ConvertError> {
        let items = expect_sequence_node(node, "array converter")?;
        if items.len() != len {
            return Err(ConvertError::mismatch(
                "array converter",
                format!("sequence of {len}"),
                format!("sequence of {}", items.len()),
            ));
        }
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(registry.from_node(item, elem)?);
        }
        Ok(DynValue::Seq(out))
    }
}

/// Ordered collections: element order preserved both ways.
///
/// An unconvertible element type inside a collection is a hard failure,
/// never skipped.
#[derive(Debug, Default)]
pub(crate) struct SequenceConverter;

impl SequenceConverter {
    pub fn to_node(
        &self,
        registry: &Registry,
        value: &DynValue,
        elem: &TypeTag,
    ) -> Result<Node, ConvertError> {
        let items = expect_seq(value, "sequence converter")?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(registry.to_node(item, elem)?);
        }
        Ok(Node::Sequence(out))
    }

    pub fn from_node(
        &self,
        registry: &Registry,
        node: &Node,
        elem: &TypeTag,
    ) -> Result<DynValue, ConvertError> {
        let items = expect_sequence_node(node, "sequence converter")?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(registry.from_node(item, elem)?);
        }
        Ok(DynValue::Seq(out))
    }
}

/// Maps: entry order preserved; keys travel as the entry name in their
/// scalar text form.
#[derive(Debug, Default)]
pub(crate) struct MapConverter;

impl MapConverter {
    fn check_key_tag(key: &TypeTag) -> Result<(), ConvertError> {
        match key {
            TypeTag::Value(_) => Ok(()),
            other => Err(ConvertError::UnsupportedType {
                reason: format!("map key type {other} is not scalar-representable"),
            }),
        }
    }

    pub fn to_node(
        &self,
        registry: &Registry,
        value: &DynValue,
        key_tag: &TypeTag,
        value_tag: &TypeTag,
    ) -> Result<Node, ConvertError> {
        Self::check_key_tag(key_tag)?;
        let entries = match value {
            DynValue::Map(entries) => entries,
            other => {
                return Err(ConvertError::mismatch("map converter", "map", other.shape()));
            }
        };

        let mut mapping = Mapping::new();
        for (key, entry_value) in entries {
            let key_node = registry.to_node(key, key_tag)?;
            let key_text = key_node.as_scalar().ok_or_else(|| {
                ConvertError::UnsupportedType {
                    reason: format!(
                        "map key of type {key_tag} converted to a {} node, not a scalar",
                        key_node.type_name()
                    ),
                }
            })?;
            let value_node = registry.to_node(entry_value, value_tag)?;
            // Source map keys are unique, so this insert cannot collide.
            mapping.insert(key_text, value_node)?;
        }
        Ok(Node::Mapping(mapping))
    }

    pub fn from_node(
        &self,
        registry: &Registry,
        node: &Node,
        key_tag: &TypeTag,
        value_tag: &TypeTag,
    ) -> Result<DynValue, ConvertError> {
        Self::check_key_tag(key_tag)?;
        let mapping = node
            .as_mapping()
            .ok_or_else(|| ConvertError::mismatch("map converter", "mapping", node.type_name()))?;

        let mut entries = Vec::with_capacity(mapping.len());
        for (name, entry_node) in mapping.iter() {
            let key = registry.from_node(&Node::scalar(name), key_tag)?;
            let value = registry.from_node(entry_node, value_tag)?;
            entries.push((key, value));
        }
        Ok(DynValue::Map(entries))
    }
}
