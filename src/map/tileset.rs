use derive_more::*;
use roxmltree::Document;
use serde::Serialize;
use tracing::instrument;
use crate::map::{parse, Orientation, ParseError, Passability};
use crate::util::join_path;
use crate::{AssetLoader, AssetPath, AssetResult};

/// Loader for a .tsx file.
/// Outputs a [`Tileset`].
pub struct TsxLoader;
impl AssetLoader for TsxLoader {
    type AssetType = Tileset;

    fn load(&self, bytes: &[u8], path: &AssetPath) -> AssetResult<Tileset> {
        let xml_source = std::str::from_utf8(bytes)?;
        let xml_doc = Document::parse(xml_source)?;
        let parsed_tileset = parse::Tileset::parse_doc(&xml_doc)?;
        let tileset = Tileset::from_parsed(parsed_tileset, path.parent())?;
        Ok(tileset.into())
    }

    fn extensions(&self) -> &[&str] {
        &["tsx"]
    }
}

/// A validated version of [`parse::Tileset`], indexed by tile id.
/// Ids are dense: the entry for id `n` is always at index `n`.
#[derive(Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct Tileset {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    /// Directory the tileset was loaded from, relative to the asset root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    entries: Vec<TilesetEntry>,
}

impl Tileset {

    /// Validates a parsed tileset.
    /// Every tile needs an image with a source and dimensions equal to the tileset's tile size.
    /// Ids must cover 0..n exactly once, and n must match "tilecount" when present.
    #[instrument(skip_all, fields(name = %parsed_tileset.name))]
    pub fn from_parsed(parsed_tileset: parse::Tileset, parent: Option<String>) -> Result<Self, ParseError> {
        let tile_width = parsed_tileset.tile_width;
        let tile_height = parsed_tileset.tile_height;

        let mut entries = Vec::with_capacity(parsed_tileset.tiles.len());
        for tile in parsed_tileset.tiles {
            let image = tile.image.ok_or_else(|| ParseError::missing_tag("tile", "image"))?;
            if image.source.is_empty() {
                return Err(ParseError::missing_attribute("image", "source"));
            }
            let width = image.width.ok_or_else(|| ParseError::missing_attribute("image", "width"))?;
            let height = image.height.ok_or_else(|| ParseError::missing_attribute("image", "height"))?;
            if width != tile_width || height != tile_height {
                return Err(ParseError::TileSizeMismatch {
                    id: tile.id,
                    width,
                    height,
                    expected_width: tile_width,
                    expected_height: tile_height,
                });
            }
            entries.push(TilesetEntry {
                id: tile.id,
                width,
                height,
                image_path: image.source,
            });
        }

        // Orders by id, then checks that ids are exactly 0..n.
        entries.sort_by_key(|entry| entry.id);
        for pair in entries.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(ParseError::DuplicateTileId { id: pair[1].id });
            }
        }
        for (idx, entry) in entries.iter().enumerate() {
            if entry.id as usize != idx {
                return Err(ParseError::NonContiguousTileId { missing: idx as u32 });
            }
        }
        let found = entries.len() as u32;
        if let Some(declared) = parsed_tileset.tile_count {
            if declared != found {
                return Err(ParseError::TileCountMismatch { declared, found });
            }
        }

        log::debug!("Parsed tileset '{}' with {found} tiles", parsed_tileset.name);
        Ok(Self {
            name: parsed_tileset.name,
            tile_width,
            tile_height,
            columns: parsed_tileset.columns,
            grid: parsed_tileset.grid,
            parent,
            entries,
        })
    }

    /// Number of tiles. Valid ids are 0..tile_count.
    pub fn tile_count(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn get(&self, id: u32) -> Option<&TilesetEntry> {
        self.entries.get(id as usize)
    }

    /// Like [`Self::get`], but reports which id was out of range.
    pub fn entry(&self, id: u32) -> Result<&TilesetEntry, TileOutOfRange> {
        self.get(id).ok_or(TileOutOfRange { id, tile_count: self.tile_count() })
    }

    /// All entries, ordered by id.
    pub fn entries(&self) -> &[TilesetEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TilesetEntry> {
        self.entries.iter()
    }

    /// Image path of a tile joined with the directory of the tileset, suitable for loading the sprite.
    pub fn image_asset_path(&self, id: u32) -> Result<String, TileOutOfRange> {
        let entry = self.entry(id)?;
        Ok(join_path(self.parent.as_deref(), &entry.image_path))
    }
}

impl<'a> IntoIterator for &'a Tileset {
    type Item = &'a TilesetEntry;
    type IntoIter = std::slice::Iter<'a, TilesetEntry>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A single tile image of a [`Tileset`].
#[derive(Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct TilesetEntry {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    /// Image path exactly as written in the tileset.
    pub image_path: String,
}

impl TilesetEntry {
    pub fn passability(&self) -> Passability {
        Passability::of_image(&self.image_path)
    }
}

#[derive(Error, Display, Copy, Clone, Eq, PartialEq, Debug)]
#[display(fmt="Tile id {id} out of range for tileset with {tile_count} tiles")]
pub struct TileOutOfRange {
    pub id: u32,
    pub tile_count: u32,
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct Grid {
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
}
