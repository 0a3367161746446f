//! The reflective mapper: declared sections to path-addressed trees and back.
//!
//! A *section* is a struct with a registration-time description of its field
//! set ([`Section::fields`]): each field is either a leaf (a convertible
//! value) or a nested section, recursively walked. The dot-joined enclosing
//! section names plus the field name form the field's unique path.
//!
//! Both mapping directions validate the complete path set of the declared
//! type *before* any conversion work, so a structural conflict (two
//! declarations resolving to the same path, including a leaf shadowing a
//! same-named section) fails with [`MapperError::DuplicatedPath`] and no
//! partially-built tree is ever observed.
//!
//! # Examples
//!
//! ```
//! use treeform::convert::Registry;
//! use treeform::{mapper, section};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Server {
//!     host: String,
//!     ports: Vec<u16>,
//! }
//!
//! section!(Server {
//!     host: value,
//!     ports: value,
//! });
//!
//! let registry = Registry::with_defaults();
//! let server = Server { host: "localhost".into(), ports: vec![80, 443] };
//!
//! let tree = mapper::to_tree(&server, &registry).unwrap();
//! let restored: Server = mapper::from_tree(&tree, &registry).unwrap();
//! assert_eq!(restored, server);
//! ```

use std::collections::HashMap;

use crate::convert::Registry;
use crate::node::{Mapping, Node, PathBuf};

pub mod errors;
mod field;

pub use errors::MapperError;
pub use field::Field;

use field::FieldKind;

/// A structurally-declared configuration object.
///
/// Implementations list their fields once; the mapper derives paths, the
/// output tree shape, and conflict detection from that list. The
/// [`section!`](crate::section) macro writes the implementation from a field
/// list. `Default` supplies the values of absent or null entries on load.
pub trait Section: Default + Send + Sync + 'static {
    /// The declared field set, in output order.
    fn fields() -> Vec<Field<Self>>
    where
        Self: Sized;
}

/// The set of claimed paths during a declaration walk.
///
/// Tracks which declaration claimed each path so a collision can name both
/// offenders.
pub struct PathSet {
    seen: HashMap<PathBuf, String>,
}

impl PathSet {
    fn new() -> Self {
        Self {
            seen: HashMap::new(),
        }
    }

    fn claim(&mut self, path: PathBuf, declaration: String) -> Result<(), MapperError> {
        match self.seen.entry(path) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                Err(MapperError::DuplicatedPath {
                    path: entry.key().to_string(),
                    first: entry.get().clone(),
                    second: declaration,
                })
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(declaration);
                Ok(())
            }
        }
    }
}

fn short_type_name<S: 'static>() -> &'static str {
    let name = std::any::type_name::<S>();
    name.rsplit("::").next().unwrap_or(name)
}

/// Walks `S`'s declaration, claiming every leaf and section path.
///
/// Every field name is checked to be a single path component first. A name
/// with a dot would be claimed as a nested path but stored as one flat
/// mapping key, so the validated path set and the produced tree would
/// disagree; such a declaration is rejected outright.
pub(crate) fn collect_paths<S: Section>(
    prefix: &PathBuf,
    set: &mut PathSet,
) -> Result<(), MapperError> {
    for field in S::fields() {
        let name = field.name();
        if name.is_empty() || name.contains('.') {
            return Err(MapperError::InvalidFieldName {
                name: name.to_string(),
                declaration: format!("{}::{}", short_type_name::<S>(), field.declaration()),
            });
        }
        let path = prefix.join(name);
        let declaration = format!("{}::{}", short_type_name::<S>(), field.declaration());
        set.claim(path.clone(), declaration)?;
        if let FieldKind::Nested { describe, .. } = &field.kind {
            describe(&path, set)?;
        }
    }
    Ok(())
}

/// Validates the full path set of `S` without converting anything.
///
/// Run automatically by [`to_tree`] and [`from_tree`]; exposed so callers
/// can check a declaration eagerly, e.g. at startup.
pub fn validate<S: Section>() -> Result<(), MapperError> {
    let mut set = PathSet::new();
    collect_paths::<S>(&PathBuf::new(), &mut set)
}

/// Saves a section into a fresh mapping tree.
///
/// Validates paths first, then converts each leaf through the registry and
/// recurses into nested sections, materializing nested mappings. Null leaf
/// values are stored as explicit null entries.
pub fn to_tree<S: Section>(section: &S, registry: &Registry) -> Result<Node, MapperError> {
    validate::<S>()?;
    tracing::debug!(section = short_type_name::<S>(), "mapping section to tree");
    save_section(section, registry)
}

pub(crate) fn save_section<S: Section>(
    section: &S,
    registry: &Registry,
) -> Result<Node, MapperError> {
    let mut mapping = Mapping::new();
    for field in S::fields() {
        let node = match &field.kind {
            FieldKind::Leaf { tag, get, .. } => registry.to_node(&get(section), tag)?,
            FieldKind::Nested { save, .. } => save(section, registry)?,
        };
        // Path validation ran up front, so this insert cannot collide.
        mapping
            .insert(field.name(), node)
            .map_err(crate::convert::ConvertError::from)?;
    }
    Ok(Node::Mapping(mapping))
}

/// Loads a freshly constructed section from a mapping tree.
///
/// Validates paths first and requires a mapping root. Starting from
/// `S::default()`, each leaf entry is converted back through the registry;
/// absent or null entries leave the default in place; nested sections
/// recurse along the same structure.
pub fn from_tree<S: Section>(node: &Node, registry: &Registry) -> Result<S, MapperError> {
    validate::<S>()?;
    tracing::debug!(section = short_type_name::<S>(), "loading section from tree");
    let mut section = S::default();
    load_into(&mut section, node, registry)?;
    Ok(section)
}

pub(crate) fn load_into<S: Section>(
    section: &mut S,
    node: &Node,
    registry: &Registry,
) -> Result<(), MapperError> {
    let mapping = node.as_mapping().ok_or_else(|| MapperError::NotASection {
        actual: node.type_name().to_string(),
    })?;

    for field in S::fields() {
        let Some(entry) = mapping.get(field.name()) else {
            continue;
        };
        if entry.is_null() {
            continue;
        }
        match &field.kind {
            FieldKind::Leaf { tag, set, .. } => {
                let value = registry.from_node(entry, tag)?;
                set(section, value)?;
            }
            FieldKind::Nested { load, .. } => load(section, entry, registry)?,
        }
    }
    Ok(())
}

/// Implements [`Section`] for a struct from a field list.
///
/// Each entry is `field: value` for a leaf or `field: nested` for a nested
/// section; `field as "name": ...` stores the field under a different path
/// component. The name is exactly one component: a rename that is empty or
/// contains a dot fails validation.
///
/// ```
/// use treeform::section;
///
/// #[derive(Debug, Default)]
/// struct Limits {
///     max_connections: u32,
/// }
///
/// #[derive(Debug, Default)]
/// struct Config {
///     name: String,
///     limits: Limits,
/// }
///
/// section!(Limits { max_connections as "max-connections": value });
/// section!(Config {
///     name: value,
///     limits: nested,
/// });
/// ```
#[macro_export]
macro_rules! section {
    ($ty:ty { $($body:tt)* }) => {
        impl $crate::mapper::Section for $ty {
            fn fields() -> ::std::vec::Vec<$crate::mapper::Field<Self>> {
                let mut fields = ::std::vec::Vec::new();
                $crate::section!(@munch fields, $ty; $($body)*);
                fields
            }
        }
    };
    (@munch $out:ident, $ty:ty; ) => {};
    (@munch $out:ident, $ty:ty; $field:ident : value $(, $($rest:tt)*)?) => {
        $out.push($crate::mapper::Field::leaf(
            stringify!($field),
            |s: &$ty| &s.$field,
            |s: &mut $ty, v| s.$field = v,
        ));
        $( $crate::section!(@munch $out, $ty; $($rest)*); )?
    };
    (@munch $out:ident, $ty:ty; $field:ident as $name:literal : value $(, $($rest:tt)*)?) => {
        $out.push($crate::mapper::Field::leaf(
            $name,
            |s: &$ty| &s.$field,
            |s: &mut $ty, v| s.$field = v,
        ).declared_as(stringify!($field)));
        $( $crate::section!(@munch $out, $ty; $($rest)*); )?
    };
    (@munch $out:ident, $ty:ty; $field:ident : nested $(, $($rest:tt)*)?) => {
        $out.push($crate::mapper::Field::nested(
            stringify!($field),
            |s: &$ty| &s.$field,
            |s: &mut $ty| &mut s.$field,
        ));
        $( $crate::section!(@munch $out, $ty; $($rest)*); )?
    };
    (@munch $out:ident, $ty:ty; $field:ident as $name:literal : nested $(, $($rest:tt)*)?) => {
        $out.push($crate::mapper::Field::nested(
            $name,
            |s: &$ty| &s.$field,
            |s: &mut $ty| &mut s.$field,
        ).declared_as(stringify!($field)));
        $( $crate::section!(@munch $out, $ty; $($rest)*); )?
    };
}
