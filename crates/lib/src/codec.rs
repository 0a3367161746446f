//! The boundary contract for wire-format codecs.
//!
//! The conversion engine produces and consumes [`Node`] trees; a codec owns
//! everything format-specific - concrete syntax, comments, formatting, and
//! any file I/O built on top. The core treats codecs as opaque.

use crate::convert::Registry;
use crate::mapper::{self, Section};
use crate::node::Node;

/// Renders node trees as a concrete wire syntax and parses them back.
pub trait Codec {
    /// Parses raw text into a node tree.
    fn parse(&self, input: &str) -> crate::Result<Node>;

    /// Renders a node tree as raw text.
    fn render(&self, node: &Node) -> crate::Result<String>;
}

/// Saves a section through a codec: section → tree → text.
pub fn save<S: Section>(
    section: &S,
    registry: &Registry,
    codec: &impl Codec,
) -> crate::Result<String> {
    let tree = mapper::to_tree(section, registry)?;
    codec.render(&tree)
}

/// Loads a section through a codec: text → tree → section.
pub fn load<S: Section>(
    input: &str,
    registry: &Registry,
    codec: &impl Codec,
) -> crate::Result<S> {
    let tree = codec.parse(input)?;
    Ok(mapper::from_tree(&tree, registry)?)
}
