//! The converter registry: type bindings, fallback rules, parent chaining.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::node::Node;

use super::{
    ConvertError, Convertible, Converter, DynValue, ScalarConverter, TypeTag, ValueTag,
    converter::Erased,
    structural::{ArrayConverter, MapConverter, SequenceConverter},
};

/// An ordered "is-a" fallback rule.
///
/// When an exact lookup misses, rules are checked in registration order; the
/// first whose predicate accepts the requested tag supplies the converter,
/// which is then memoized under the requested type for future exact hits.
pub struct FallbackRule {
    name: &'static str,
    matches: Box<dyn Fn(&ValueTag) -> bool + Send + Sync>,
    converter: Arc<dyn Converter>,
}

impl FallbackRule {
    /// Builds a rule from a predicate over the requested tag.
    pub fn new(
        name: &'static str,
        matches: impl Fn(&ValueTag) -> bool + Send + Sync + 'static,
        converter: impl Converter + 'static,
    ) -> Self {
        Self {
            name,
            matches: Box::new(matches),
            converter: Arc::new(converter),
        }
    }

    /// The rule's diagnostic name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Owner of type-to-converter bindings and the resolver for structural types.
///
/// A registry holds an exact-match converter map, an ordered list of
/// [`FallbackRule`]s, the three built-in structural converters, and an
/// optional parent registry consulted when a conversion fails locally with
/// [`ConvertError::ConverterNotFound`].
///
/// # Lifecycle
///
/// Build one root registry with [`Registry::with_defaults`] at startup, then
/// one child per independent mapping session via [`Registry::child`].
/// Children register and override converters without affecting the parent or
/// sibling children.
///
/// # Concurrency
///
/// The maps are guarded by read/write locks: conversions take read locks,
/// registration takes write locks, and the memoizing cache fill in
/// [`Registry::resolve`] is the only write on a read path. Racing cache
/// fills insert the same converter and are harmless.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use treeform::convert::Registry;
///
/// let root = Arc::new(Registry::with_defaults());
/// let child = root.child();
///
/// // The child has no local converters but falls back to the root.
/// let node = child.to_node_for(&42i64).unwrap();
/// assert_eq!(child.from_node_for::<i64>(&node).unwrap(), 42);
/// ```
pub struct Registry {
    converters: RwLock<HashMap<TypeId, Arc<dyn Converter>>>,
    fallbacks: RwLock<Vec<FallbackRule>>,
    arrays: ArrayConverter,
    sequences: SequenceConverter,
    maps: MapConverter,
    parent: Option<Arc<Registry>>,
}

impl Registry {
    fn with_parent(parent: Option<Arc<Registry>>) -> Self {
        Self {
            converters: RwLock::new(HashMap::new()),
            fallbacks: RwLock::new(Vec::new()),
            arrays: ArrayConverter,
            sequences: SequenceConverter,
            maps: MapConverter,
            parent,
        }
    }

    /// A registry with no converters and no parent.
    pub fn empty() -> Self {
        Self::with_parent(None)
    }

    /// The root registry with all built-in converters pre-registered.
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        super::scalars::register_defaults(&registry);
        registry
    }

    /// A new empty registry chained to `self` as its parent.
    pub fn child(self: &Arc<Self>) -> Registry {
        Self::with_parent(Some(Arc::clone(self)))
    }

    /// Binds a typed converter under its target type.
    ///
    /// Replaces any existing binding for that exact type; registering the
    /// same converter twice is idempotent.
    pub fn register<C: ScalarConverter>(&self, converter: C) {
        let tag = ValueTag::of::<C::Target>();
        tracing::debug!(type_name = tag.name, "registering converter");
        self.bind(tag.id, Arc::new(Erased(converter)));
    }

    /// Binds an already-erased converter under an explicit target tag.
    pub fn register_dyn(&self, target: ValueTag, converter: Arc<dyn Converter>) {
        tracing::debug!(type_name = target.name, "registering erased converter");
        self.bind(target.id, converter);
    }

    fn bind(&self, id: TypeId, converter: Arc<dyn Converter>) {
        self.converters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, converter);
    }

    /// Appends an ordered fallback rule.
    pub fn add_fallback(&self, rule: FallbackRule) {
        tracing::debug!(rule = rule.name, "registering fallback rule");
        self.fallbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(rule);
    }

    /// Removes local bindings whose target type *or* converter type is `T`.
    ///
    /// Both removal modes matter: a converter may have been registered under
    /// its target type, or memoized under some other type by a fallback rule.
    /// The parent registry is untouched.
    pub fn remove<T: 'static>(&self) {
        let id = TypeId::of::<T>();
        self.converters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|key, converter| *key != id && converter.converter_id() != id);
    }

    /// Clears all local bindings and fallback rules; the parent is untouched.
    pub fn remove_all(&self) {
        self.converters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.fallbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Resolves a leaf tag to a converter.
    ///
    /// Exact-match lookup first; on a miss, fallback rules are scanned in
    /// registration order and a hit is memoized under the requested type.
    /// This memoization is the only registry mutation on a read path; a
    /// racing fill inserts the same converter and is harmless.
    pub fn resolve(&self, tag: &ValueTag) -> Result<Arc<dyn Converter>, ConvertError> {
        if let Some(converter) = self
            .converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tag.id)
        {
            return Ok(Arc::clone(converter));
        }

        let hit = self
            .fallbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|rule| (rule.matches)(tag))
            .map(|rule| (rule.name, Arc::clone(&rule.converter)));

        if let Some((rule_name, converter)) = hit {
            tracing::debug!(type_name = tag.name, rule = rule_name, "memoizing fallback hit");
            self.bind(tag.id, Arc::clone(&converter));
            return Ok(converter);
        }

        Err(ConvertError::ConverterNotFound {
            type_name: tag.name.to_string(),
        })
    }

    /// Converts a type-erased value into a node.
    ///
    /// Absent values become [`Node::Null`]; structural tags delegate to the
    /// built-in structural converters; leaf tags resolve and invoke a
    /// registered converter. If the conversion fails with
    /// [`ConvertError::ConverterNotFound`] and this registry has a parent,
    /// the whole conversion is retried against the parent; any other failure
    /// propagates as-is.
    pub fn to_node(&self, value: &DynValue, tag: &TypeTag) -> Result<Node, ConvertError> {
        match self.to_node_local(value, tag) {
            Err(err) if err.is_not_found() => match &self.parent {
                Some(parent) => parent.to_node(value, tag),
                None => Err(err),
            },
            other => other,
        }
    }

    fn to_node_local(&self, value: &DynValue, tag: &TypeTag) -> Result<Node, ConvertError> {
        if value.is_none() {
            return Ok(Node::Null);
        }
        match tag {
            TypeTag::Array { elem, len } => self.arrays.to_node(self, value, elem, *len),
            TypeTag::List(elem) => self.sequences.to_node(self, value, elem),
            TypeTag::Map { key, value: val } => self.maps.to_node(self, value, key, val),
            TypeTag::Value(value_tag) => self.resolve(value_tag)?.to_node(self, value),
        }
    }

    /// Converts a node back into a type-erased value.
    ///
    /// [`Node::Null`] becomes [`DynValue::None`] for any tag. Structural
    /// tags require the correspondingly-shaped node (sequence for arrays and
    /// lists, mapping for maps) and fail with a type mismatch otherwise.
    /// Parent fallback mirrors the save direction.
    pub fn from_node(&self, node: &Node, tag: &TypeTag) -> Result<DynValue, ConvertError> {
        match self.from_node_local(node, tag) {
            Err(err) if err.is_not_found() => match &self.parent {
                Some(parent) => parent.from_node(node, tag),
                None => Err(err),
            },
            other => other,
        }
    }

    fn from_node_local(&self, node: &Node, tag: &TypeTag) -> Result<DynValue, ConvertError> {
        if node.is_null() {
            return Ok(DynValue::None);
        }
        match tag {
            TypeTag::Array { elem, len } => self.arrays.from_node(self, node, elem, *len),
            TypeTag::List(elem) => self.sequences.from_node(self, node, elem),
            TypeTag::Map { key, value } => self.maps.from_node(self, node, key, value),
            TypeTag::Value(value_tag) => self.resolve(value_tag)?.from_node(self, node),
        }
    }

    /// Typed convenience: converts any [`Convertible`] value into a node.
    pub fn to_node_for<T: Convertible>(&self, value: &T) -> Result<Node, ConvertError> {
        self.to_node(&value.to_dyn(), &T::type_tag())
    }

    /// Typed convenience: converts a node back into any [`Convertible`] type.
    pub fn from_node_for<T: Convertible>(&self, node: &Node) -> Result<T, ConvertError> {
        T::from_dyn(self.from_node(node, &T::type_tag())?)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let converters = self
            .converters
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Registry")
            .field("converters", &converters.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
