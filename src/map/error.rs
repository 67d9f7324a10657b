use std::num::ParseIntError;
use std::str::Utf8Error;
use derive_more::*;

/// Structurally invalid .tsx or .tmx contents.
#[derive(Error, Display, From, Debug)]
pub enum ParseError {
    XmlError(roxmltree::Error),
    #[display(fmt="{_0}")]
    Utf8Error(Utf8Error),
    #[display(fmt="{_0}")]
    ParseIntError(ParseIntError),
    #[display(fmt="Expected root tag '{tag_name}'")]
    #[from(ignore)]
    MissingRootError { tag_name: String },
    #[display(fmt="Tag '{tag_name}' missing child '{child}'")]
    #[from(ignore)]
    MissingTagError { tag_name: String, child: String },
    #[display(fmt="Tag '{tag_name}' missing attribute '{attribute}'")]
    #[from(ignore)]
    MissingAttributeError { tag_name: String, attribute: String },
    #[display(fmt="Unexpected value {value}")]
    #[from(ignore)]
    InvalidAttributeValue { value: String },
    #[display(fmt="Tile id {id} appears more than once")]
    #[from(ignore)]
    DuplicateTileId { id: u32 },
    #[display(fmt="Tile ids are not contiguous: missing id {missing}")]
    #[from(ignore)]
    NonContiguousTileId { missing: u32 },
    #[display(fmt="Tile {id} is {width}x{height}, expected {expected_width}x{expected_height}")]
    #[from(ignore)]
    TileSizeMismatch { id: u32, width: u32, height: u32, expected_width: u32, expected_height: u32 },
    #[display(fmt="Tileset declares {declared} tiles but defines {found}")]
    #[from(ignore)]
    TileCountMismatch { declared: u32, found: u32 },
    #[display(fmt="Layer '{layer}' has {found} tiles, expected {expected}")]
    #[from(ignore)]
    LayerSizeMismatch { layer: String, expected: usize, found: usize },
    #[display(fmt="Global tile id {gid} does not belong to any tileset")]
    #[from(ignore)]
    UnknownGid { gid: u32 },
}

impl ParseError {
    pub(crate) fn missing_attribute(tag_name: &str, attribute: &str) -> Self {
        Self::MissingAttributeError {
            tag_name: String::from(tag_name),
            attribute: String::from(attribute),
        }
    }

    pub(crate) fn missing_tag(tag_name: &str, child: &str) -> Self {
        Self::MissingTagError {
            tag_name: String::from(tag_name),
            child: String::from(child),
        }
    }
}
