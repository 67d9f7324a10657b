//! Structs defined here mirror those in [`crate::map`].
//! The main difference is that they're mostly a 1:1 mapping of the tmx / tsx file format
//! and are not validated or linked to their dependencies.
mod map;
mod tileset;

pub use map::*;
pub use tileset::*;

use roxmltree::Node;
use crate::map::ParseError;

/// Value of an attribute that must be present.
pub(crate) fn required_attribute<'a>(node: Node<'a, '_>, attribute: &str) -> Result<&'a str, ParseError> {
    node.attribute(attribute)
        .ok_or_else(|| ParseError::missing_attribute(node.tag_name().name(), attribute))
}
