use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Flip flags stored in the high bits of a global tile id.
    #[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Hash)]
    pub struct FlipFlags: u32 {
        const HORIZONTAL    = 0x8000_0000;
        const VERTICAL      = 0x4000_0000;
        const DIAGONAL      = 0x2000_0000;
        const ROTATED_HEX   = 0x1000_0000;
    }
}

/// Global tile id, as stored in map layers.
/// 0 is an empty cell.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Hash, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Gid(pub u32);

impl Gid {
    pub const EMPTY: Gid = Gid(0);

    /// Id with flip flags removed.
    pub fn tile_id(self) -> u32 {
        self.0 & !FlipFlags::all().bits()
    }

    pub fn flip_flags(self) -> FlipFlags {
        FlipFlags::from_bits_truncate(self.0)
    }

    pub fn is_empty(self) -> bool {
        self.tile_id() == 0
    }
}

impl From<u32> for Gid {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Whether characters may walk over a tile.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Passability {
    Passable,
    Blocking,
}

impl Passability {

    /// Classifies a tile by its image file name.
    /// Walls, bricks, gates, columns and fountains block, unless the name says the tile is open.
    pub fn of_image(image_path: &str) -> Self {
        let file_name = image_path.rsplit('/').next().unwrap_or(image_path);
        if file_name.contains("wall") || file_name.contains("brick") {
            return Self::Blocking;
        }
        if file_name.contains("open") {
            return Self::Passable;
        }
        if ["gate", "column", "fountain"].iter().any(|word| file_name.contains(word)) {
            return Self::Blocking;
        }
        Self::Passable
    }

    pub fn is_passable(self) -> bool {
        self == Self::Passable
    }
}

#[cfg(test)]
mod test {
    use super::{FlipFlags, Gid, Passability};

    #[test]
    fn gid_flags() {
        let gid = Gid(0x8000_0000 | 0x2000_0000 | 7);
        assert_eq!(7, gid.tile_id());
        assert_eq!(FlipFlags::HORIZONTAL | FlipFlags::DIAGONAL, gid.flip_flags());
        assert!(!gid.is_empty());
        assert!(Gid::EMPTY.is_empty());
        assert!(Gid(FlipFlags::VERTICAL.bits()).is_empty());
    }

    #[test]
    fn passability() {
        assert_eq!(Passability::Blocking, Passability::of_image("sprites/tiles/marble_wall2.png"));
        assert_eq!(Passability::Blocking, Passability::of_image("sprites/tiles/brick_gray0.png"));
        assert_eq!(Passability::Blocking, Passability::of_image("sprites/tiles/gate_runed_left.png"));
        assert_eq!(Passability::Blocking, Passability::of_image("sprites/tiles/crumbled_column_1.png"));
        assert_eq!(Passability::Blocking, Passability::of_image("sprites/tiles/blue_fountain.png"));
        assert_eq!(Passability::Passable, Passability::of_image("sprites/tiles/gate_open_left.png"));
        assert_eq!(Passability::Passable, Passability::of_image("sprites/tiles/open_door.png"));
        assert_eq!(Passability::Passable, Passability::of_image("sprites/tiles/sand1.png"));
        assert_eq!(Passability::Passable, Passability::of_image("exit_pandemonium.png"));
    }

    #[test]
    fn only_file_name_counts() {
        assert_eq!(Passability::Passable, Passability::of_image("walls/sand1.png"));
        assert_eq!(Passability::Blocking, Passability::of_image("open/brick_gray1.png"));
    }
}
