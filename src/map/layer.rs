use serde::Serialize;
use crate::map::{parse, Gid};

/// Finite tile layer. Tiles are stored row by row.
#[derive(Clone, Eq, PartialEq, Default, Debug, Serialize)]
pub struct TileLayer {
    pub id: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub tiles: Vec<Gid>,
}

impl TileLayer {
    pub fn from_parsed(parsed_layer: parse::TileLayer) -> Self {
        Self {
            id: parsed_layer.id,
            name: parsed_layer.name,
            width: parsed_layer.width,
            height: parsed_layer.height,
            visible: parsed_layer.visible,
            tiles: parsed_layer.data.into_iter().map(Gid).collect(),
        }
    }

    /// Gid at a tile coordinate, or None if outside of the layer.
    pub fn gid_at(&self, x: u32, y: u32) -> Option<Gid> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.tiles.get(idx).copied()
    }

    /// Non-empty cells as (x, y, gid).
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Gid)> + '_ {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, gid)| !gid.is_empty())
            .map(move |(idx, gid)| {
                let idx = idx as u32;
                (idx % width, idx / width, *gid)
            })
    }
}

#[cfg(test)]
mod test {
    use crate::map::{parse, Gid};
    use super::TileLayer;

    fn layer() -> TileLayer {
        TileLayer::from_parsed(parse::TileLayer {
            id: 1,
            name: String::from("Floor"),
            width: 3,
            height: 2,
            visible: true,
            data: vec![1, 0, 3, 0, 5, 0],
        })
    }

    #[test]
    fn gid_at() {
        let layer = layer();
        assert_eq!(Some(Gid(1)), layer.gid_at(0, 0));
        assert_eq!(Some(Gid(3)), layer.gid_at(2, 0));
        assert_eq!(Some(Gid(5)), layer.gid_at(1, 1));
        assert_eq!(None, layer.gid_at(3, 0));
        assert_eq!(None, layer.gid_at(0, 2));
    }

    #[test]
    fn iter_skips_empty() {
        let cells: Vec<_> = layer().iter().collect();
        assert_eq!(vec![(0, 0, Gid(1)), (2, 0, Gid(3)), (1, 1, Gid(5))], cells);
    }
}
