use roxmltree::{Document, Node};
use crate::map::{Grid, Orientation, ParseError};
use super::required_attribute;


#[derive(Clone, Eq, PartialEq, Default, Debug)]
pub struct Tileset {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_count: Option<u32>,
    pub columns: u32,
    pub grid: Option<Grid>,
    pub tiles: Vec<Tile>,
}

impl Tileset {

    pub fn parse_doc(doc: &Document) -> Result<Self, ParseError> {
        let root = doc.root_element();
        match root.tag_name().name() {
            "tileset" => Self::parse(root),
            _ => Err(ParseError::MissingRootError { tag_name: String::from("tileset") }),
        }
    }

    pub fn parse(tileset_node: Node) -> Result<Self, ParseError> {
        let mut tileset = Tileset {
            tile_width: required_attribute(tileset_node, "tilewidth")?.parse()?,
            tile_height: required_attribute(tileset_node, "tileheight")?.parse()?,
            ..Default::default()
        };

        // Parses optional attributes
        for attribute in tileset_node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "name" => tileset.name = String::from(value),
                "tilecount" => tileset.tile_count = Some(value.parse()?),
                "columns" => tileset.columns = value.parse()?,
                _ => {}
            }
        }

        // Parses children
        for child in tileset_node.children() {
            match child.tag_name().name() {
                "grid" => tileset.grid = Some(parse_grid(child)?),
                "tile" => tileset.tiles.push(Tile::parse(child)?),
                _ => {}
            }
        }
        Ok(tileset)
    }
}

fn parse_grid(grid_node: Node) -> Result<Grid, ParseError> {
    let mut grid = Grid::default();
    for attribute in grid_node.attributes() {
        let value = attribute.value();
        match attribute.name() {
            "orientation" => grid.orientation = Orientation::parse(value)?,
            "width" => grid.width = value.parse()?,
            "height" => grid.height = value.parse()?,
            _ => {}
        }
    }
    Ok(grid)
}

/// A single <tile> of an image collection tileset.
#[derive(Clone, Eq, PartialEq, Default, Debug)]
pub struct Tile {
    pub id: u32,
    pub image: Option<Image>,
}

impl Tile {
    pub fn parse(tile_node: Node) -> Result<Self, ParseError> {
        let id = required_attribute(tile_node, "id")?.parse()?;
        let image = tile_node
            .children()
            .find(|child| child.tag_name().name() == "image")
            .map(Image::parse)
            .transpose()?;
        Ok(Self { id, image })
    }
}

#[derive(Clone, Eq, PartialEq, Default, Debug)]
pub struct Image {
    pub format: String,
    pub source: String,
    pub trans: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Image {
    pub fn parse(image_node: Node) -> Result<Image, ParseError> {
        let mut image = Image::default();
        for attribute in image_node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "format" => image.format = String::from(value),
                "source" => image.source = String::from(value),
                "trans" => image.trans = Some(String::from(value)),
                "width" => image.width = Some(value.parse()?),
                "height" => image.height = Some(value.parse()?),
                _ => {}
            }
        }
        Ok(image)
    }
}
