mod error;
mod map;
mod tile;
mod tileset;
mod layer;
pub mod parse;

pub use error::*;
pub use map::*;
pub use tile::*;
pub use tileset::*;
pub use layer::*;

use crate::{AssetManager, FileProtocol};

impl AssetManager {
    /// Manager that reads Tiled files from disk, relative to `path_prefix`.
    pub fn tiled(path_prefix: impl Into<String>) -> Self {
        AssetManager::builder()
            .default_protocol(FileProtocol)
            .path_prefix(path_prefix)
            .loader(TsxLoader)
            .loader(TmxLoader)
            .build()
    }
}
