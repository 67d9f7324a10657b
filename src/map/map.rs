use std::sync::Arc;
use roxmltree::Document;
use serde::Serialize;
use crate::map::{parse, Gid, ParseError, TileLayer, Tileset, TilesetEntry};
use crate::util::join_path;
use crate::{AssetLoader, AssetManager, AssetPath, AssetResult, AssetValue, LoadError};

/// Loader for a .tmx file.
/// External tilesets are loaded through the [`AssetManager`], relative to the map's directory.
pub struct TmxLoader;
impl AssetLoader for TmxLoader {

    type AssetType = TiledMap;

    fn load(&self, bytes: &[u8], path: &AssetPath) -> AssetResult<TiledMap> {
        let source = std::str::from_utf8(bytes)?;
        let doc = Document::parse(source)?;
        let parsed_map = parse::TiledMap::parse_doc(&doc)?;

        // Finishes map once dependent tilesets can be loaded
        let map_path = path.to_string();
        let parent = path.parent();
        let protocol = path.protocol.clone();
        Ok(AssetValue::from_fn(move |manager| {
            TiledMap::from_parsed(parsed_map, &map_path, &protocol, parent.as_deref(), manager)
        }))
    }

    fn extensions(&self) -> &[&str] {
        &["tmx"]
    }
}

/// A tileset used by a map, along with the first global id mapped to it.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct MapTileset {
    pub first_gid: u32,
    pub tileset: Arc<Tileset>,
}

/// A processed version of [`parse::TiledMap`] whose tilesets are loaded and whose gids are known to resolve.
#[derive(Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct TiledMap {
    pub version: String,
    pub orientation: Orientation,
    pub render_order: RenderOrder,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub infinite: bool,
    /// Sorted by first gid.
    pub tilesets: Vec<MapTileset>,
    pub layers: Vec<TileLayer>,
}

impl TiledMap {

    pub fn from_parsed(
        parsed_map: parse::TiledMap,
        map_path: &str,
        protocol: &str,
        parent: Option<&str>,
        manager: &mut AssetManager,
    ) -> Result<Self, LoadError> {
        let parse_error = |source: ParseError| LoadError::Parse { path: String::from(map_path), source };

        let mut tilesets = Vec::with_capacity(parsed_map.tilesets.len());
        for entry in parsed_map.tilesets {
            let map_tileset = match entry {
                parse::TilesetEntry::Internal { first_gid, tileset } => {
                    let tileset = Tileset::from_parsed(tileset, parent.map(String::from)).map_err(parse_error)?;
                    MapTileset { first_gid, tileset: Arc::new(tileset) }
                },
                parse::TilesetEntry::External { first_gid, source } => {
                    let tileset_path = format!("{protocol}://{}", join_path(parent, &source));
                    let tileset = manager.load::<Tileset, _>(tileset_path)?;
                    MapTileset { first_gid, tileset }
                },
            };
            tilesets.push(map_tileset);
        }
        tilesets.sort_by_key(|map_tileset| map_tileset.first_gid);

        let map = Self {
            version: parsed_map.version,
            orientation: parsed_map.orientation,
            render_order: parsed_map.render_order,
            width: parsed_map.width,
            height: parsed_map.height,
            tile_width: parsed_map.tile_width,
            tile_height: parsed_map.tile_height,
            infinite: parsed_map.infinite,
            tilesets,
            layers: parsed_map.layers.into_iter().map(TileLayer::from_parsed).collect(),
        };

        // Every placed tile must point at a real tileset entry.
        for layer in &map.layers {
            for (_, _, gid) in layer.iter() {
                if map.tile_entry(gid).is_none() {
                    return Err(parse_error(ParseError::UnknownGid { gid: gid.0 }));
                }
            }
        }
        Ok(map)
    }

    /// Resolves a global tile id to its tileset and entry.
    /// Flip flags are ignored. None for empty cells and ids outside of every tileset.
    pub fn tile_entry(&self, gid: Gid) -> Option<(&Tileset, &TilesetEntry)> {
        if gid.is_empty() {
            return None;
        }
        let tile_id = gid.tile_id();
        let map_tileset = self
            .tilesets
            .iter()
            .rev()
            .find(|map_tileset| map_tileset.first_gid <= tile_id)?;
        let tileset = map_tileset.tileset.as_ref();
        let entry = tileset.get(tile_id - map_tileset.first_gid)?;
        Some((tileset, entry))
    }

    /// Tile entries stacked at a coordinate, bottom layer first.
    pub fn tiles_at(&self, x: u32, y: u32) -> impl Iterator<Item = &TilesetEntry> + '_ {
        self.layers
            .iter()
            .filter_map(move |layer| layer.gid_at(x, y))
            .filter_map(move |gid| self.tile_entry(gid).map(|(_, entry)| entry))
    }

    /// True if no layer has a blocking tile at the coordinate.
    /// Coordinates outside of the map are never passable.
    pub fn is_passable(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.tiles_at(x, y).all(|entry| entry.passability().is_passable())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    #[default]
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

impl Orientation {
    pub fn parse(str: &str) -> Result<Self, ParseError> {
        match str {
            "orthogonal" => Ok(Self::Orthogonal),
            "isometric" => Ok(Self::Isometric),
            "staggered" => Ok(Self::Staggered),
            "hexagonal" => Ok(Self::Hexagonal),
            _ => Err(ParseError::InvalidAttributeValue { value: String::from(str) })
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderOrder {
    #[default]
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

impl RenderOrder {
    pub fn parse(str: &str) -> Result<Self, ParseError> {
        match str {
            "right-down" => Ok(Self::RightDown),
            "right-up" => Ok(Self::RightUp),
            "left-down" => Ok(Self::LeftDown),
            "left-up" => Ok(Self::LeftUp),
            _ => Err(ParseError::InvalidAttributeValue { value: String::from(str) })
        }
    }
}
