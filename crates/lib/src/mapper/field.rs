//! Field descriptors for declared sections.
//!
//! A [`Field`] describes one structurally-declared field of a section:
//! either a leaf (a convertible value) or a nested section, recursively
//! walked. Field types are erased behind boxed accessors so a section's
//! descriptor list is homogeneous; the erased closures are instantiated by
//! [`Field::leaf`] and [`Field::nested`], usually through the
//! [`section!`](crate::section) macro.

use crate::convert::{ConvertError, Convertible, DynValue, Registry, TypeTag};
use crate::node::{Node, PathBuf};

use super::{MapperError, PathSet, Section, collect_paths, load_into, save_section};

type Getter<S> = Box<dyn Fn(&S) -> DynValue + Send + Sync>;
type Setter<S> = Box<dyn Fn(&mut S, DynValue) -> Result<(), ConvertError> + Send + Sync>;
type SaveFn<S> = Box<dyn Fn(&S, &Registry) -> Result<Node, MapperError> + Send + Sync>;
type LoadFn<S> = Box<dyn Fn(&mut S, &Node, &Registry) -> Result<(), MapperError> + Send + Sync>;
type DescribeFn = fn(&PathBuf, &mut PathSet) -> Result<(), MapperError>;

/// A single declared field of section type `S`.
pub struct Field<S> {
    name: &'static str,
    decl: &'static str,
    pub(super) kind: FieldKind<S>,
}

pub(super) enum FieldKind<S> {
    Leaf {
        tag: TypeTag,
        get: Getter<S>,
        set: Setter<S>,
    },
    Nested {
        describe: DescribeFn,
        save: SaveFn<S>,
        load: LoadFn<S>,
    },
}

impl<S: Section> Field<S> {
    /// Describes a leaf field holding a convertible value.
    ///
    /// `name` becomes the field's path component; `get` and `set` are plain
    /// projections onto the owning struct.
    pub fn leaf<T: Convertible>(
        name: &'static str,
        get: fn(&S) -> &T,
        set: fn(&mut S, T),
    ) -> Self {
        Field {
            name,
            decl: name,
            kind: FieldKind::Leaf {
                tag: T::type_tag(),
                get: Box::new(move |section| get(section).to_dyn()),
                set: Box::new(move |section, value| {
                    set(section, T::from_dyn(value)?);
                    Ok(())
                }),
            },
        }
    }

    /// Describes a nested section field, recursively walked.
    pub fn nested<Sub: Section>(
        name: &'static str,
        get: fn(&S) -> &Sub,
        get_mut: fn(&mut S) -> &mut Sub,
    ) -> Self {
        Field {
            name,
            decl: name,
            kind: FieldKind::Nested {
                describe: collect_paths::<Sub>,
                save: Box::new(move |section, registry| save_section(get(section), registry)),
                load: Box::new(move |section, node, registry| {
                    load_into(get_mut(section), node, registry)
                }),
            },
        }
    }

    /// Records the original struct field name when it differs from the path
    /// component, so conflict reports can name the actual declaration.
    pub fn declared_as(mut self, decl: &'static str) -> Self {
        self.decl = decl;
        self
    }

    /// The field's path component.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declaring struct field name.
    pub fn declaration(&self) -> &'static str {
        self.decl
    }

    /// Returns true if this field is a nested section.
    pub fn is_nested(&self) -> bool {
        matches!(self.kind, FieldKind::Nested { .. })
    }
}

impl<S> std::fmt::Debug for Field<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            FieldKind::Leaf { tag, .. } => format!("leaf({tag})"),
            FieldKind::Nested { .. } => "nested".to_string(),
        };
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}
