use roxmltree::{Document, Node};
use crate::map::{Orientation, ParseError, RenderOrder};
use crate::map::parse;
use super::required_attribute;

/// A mostly 1:1 mapping of the TMX <map> element, with dependent tilesets left unloaded.
#[derive(Clone, Eq, PartialEq, Default, Debug)]
pub struct TiledMap {
    pub version: String,
    pub orientation: Orientation,
    pub render_order: RenderOrder,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub infinite: bool,
    pub tilesets: Vec<TilesetEntry>,
    pub layers: Vec<TileLayer>,
}

impl TiledMap {

    pub fn parse_doc(map_doc: &Document) -> Result<Self, ParseError> {
        let root = map_doc.root_element();
        match root.tag_name().name() {
            "map" => Self::parse(root),
            _ => Err(ParseError::MissingRootError { tag_name: String::from("map") }),
        }
    }

    fn parse(map_node: Node) -> Result<Self, ParseError> {
        let mut map = Self {
            width: required_attribute(map_node, "width")?.parse()?,
            height: required_attribute(map_node, "height")?.parse()?,
            ..Default::default()
        };

        // Parses map attributes
        for attribute in map_node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "version" => map.version = String::from(value),
                "orientation" => map.orientation = Orientation::parse(value)?,
                "renderorder" => map.render_order = RenderOrder::parse(value)?,
                "tilewidth" => map.tile_width = value.parse()?,
                "tileheight" => map.tile_height = value.parse()?,
                "infinite" => map.infinite = match value {
                    "0" => false,
                    "1" => true,
                    _ => return Err(ParseError::InvalidAttributeValue { value: String::from(value) }),
                },
                _ => {}
            }
        }

        // Traverses children
        for node in map_node.children() {
            let tag_name = node.tag_name().name();
            match tag_name {
                "tileset" => map.tilesets.push(TilesetEntry::parse(node)?),
                "layer" => map.layers.push(TileLayer::parse(node)?),
                _ => {},
            }
        }

        Ok(map)
    }
}

/// A single tileset stored in a [`TiledMap`].
/// Either stores the tileset, or references it in another file.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum TilesetEntry {
    Internal {
        first_gid: u32,
        tileset: parse::Tileset,
    },
    External {
        first_gid: u32,
        source: String,
    }
}

impl TilesetEntry {
    fn parse(entry_node: Node) -> Result<Self, ParseError> {
        let first_gid: u32 = required_attribute(entry_node, "firstgid")?.parse()?;
        match entry_node.attribute("source") {
            Some(source) => Ok(TilesetEntry::External { first_gid, source: String::from(source) }),
            None => {
                let tileset = parse::Tileset::parse(entry_node)?;
                Ok(TilesetEntry::Internal { first_gid, tileset })
            },
        }
    }

    pub fn first_gid(&self) -> u32 {
        match self {
            Self::Internal { first_gid, .. } => *first_gid,
            Self::External { first_gid, .. } => *first_gid,
        }
    }
}

/// A <layer> with its CSV data decoded into raw global tile ids.
#[derive(Clone, Eq, PartialEq, Default, Debug)]
pub struct TileLayer {
    pub id: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub data: Vec<u32>,
}

impl TileLayer {
    fn parse(layer_node: Node) -> Result<Self, ParseError> {
        let mut layer = Self {
            width: required_attribute(layer_node, "width")?.parse()?,
            height: required_attribute(layer_node, "height")?.parse()?,
            visible: true,
            ..Default::default()
        };
        for attribute in layer_node.attributes() {
            let value = attribute.value();
            match attribute.name() {
                "id" => layer.id = value.parse()?,
                "name" => layer.name = String::from(value),
                "visible" => layer.visible = value != "0",
                _ => {}
            }
        }

        let data_node = layer_node
            .children()
            .find(|child| child.tag_name().name() == "data")
            .ok_or_else(|| ParseError::missing_tag("layer", "data"))?;
        match data_node.attribute("encoding") {
            Some("csv") => {},
            Some(other) => return Err(ParseError::InvalidAttributeValue { value: String::from(other) }),
            None => return Err(ParseError::missing_attribute("data", "encoding")),
        }
        layer.data = parse_csv(data_node.text().unwrap_or_default())?;

        let expected = layer.width as usize * layer.height as usize;
        if layer.data.len() != expected {
            return Err(ParseError::LayerSizeMismatch {
                layer: layer.name,
                expected,
                found: layer.data.len(),
            });
        }
        Ok(layer)
    }
}

fn parse_csv(text: &str) -> Result<Vec<u32>, ParseError> {
    let mut gids = Vec::new();
    for value in text.split(',') {
        let value = value.trim();
        if !value.is_empty() {
            gids.push(value.parse()?);
        }
    }
    Ok(gids)
}

#[cfg(test)]
mod test {
    use roxmltree::Document;
    use crate::map::{Orientation, ParseError, RenderOrder};
    use super::{TiledMap, TilesetEntry};

    const MAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.4" orientation="orthogonal" renderorder="right-down" width="3" height="2" tilewidth="32" tileheight="32" infinite="0">
 <tileset firstgid="1" source="anthea_tileset.tsx"/>
 <tileset firstgid="52" name="Extra" tilewidth="32" tileheight="32">
  <tile id="0"><image width="32" height="32" source="extra.png"/></tile>
 </tileset>
 <layer id="1" name="Floor" width="3" height="2">
  <data encoding="csv">
1,2,3,
0,52,2147483649
</data>
 </layer>
</map>"#;

    #[test]
    fn parses_map() {
        let doc = Document::parse(MAP).unwrap();
        let map = TiledMap::parse_doc(&doc).unwrap();
        assert_eq!("1.4", map.version);
        assert_eq!(Orientation::Orthogonal, map.orientation);
        assert_eq!(RenderOrder::RightDown, map.render_order);
        assert_eq!((3, 2), (map.width, map.height));
        assert!(!map.infinite);

        assert_eq!(2, map.tilesets.len());
        assert_eq!(
            TilesetEntry::External { first_gid: 1, source: String::from("anthea_tileset.tsx") },
            map.tilesets[0]
        );
        match &map.tilesets[1] {
            TilesetEntry::Internal { first_gid, tileset } => {
                assert_eq!(52, *first_gid);
                assert_eq!("Extra", tileset.name);
                assert_eq!(1, tileset.tiles.len());
            },
            other => panic!("Expected internal tileset, got {other:?}"),
        }

        let layer = &map.layers[0];
        assert_eq!("Floor", layer.name);
        assert!(layer.visible);
        assert_eq!(vec![1, 2, 3, 0, 52, 2147483649], layer.data);
    }

    #[test]
    fn layer_size_mismatch() {
        let xml = r#"<map width="2" height="2"><layer name="L" width="2" height="2"><data encoding="csv">1,2,3</data></layer></map>"#;
        let doc = Document::parse(xml).unwrap();
        let err = TiledMap::parse_doc(&doc).unwrap_err();
        assert!(matches!(err, ParseError::LayerSizeMismatch { expected: 4, found: 3, .. }));
    }

    #[test]
    fn unsupported_encoding() {
        let xml = r#"<map width="1" height="1"><layer width="1" height="1"><data encoding="base64">AQAAAA==</data></layer></map>"#;
        let doc = Document::parse(xml).unwrap();
        let err = TiledMap::parse_doc(&doc).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAttributeValue { ref value } if value == "base64"));
    }

    #[test]
    fn missing_layer_data() {
        let xml = r#"<map width="1" height="1"><layer width="1" height="1"/></map>"#;
        let doc = Document::parse(xml).unwrap();
        let err = TiledMap::parse_doc(&doc).unwrap_err();
        assert!(matches!(err, ParseError::MissingTagError { ref child, .. } if child == "data"));
    }

    #[test]
    fn missing_map_width() {
        let doc = Document::parse(r#"<map height="1"/>"#).unwrap();
        assert!(matches!(
            TiledMap::parse_doc(&doc),
            Err(ParseError::MissingAttributeError { .. })
        ));
    }
}
