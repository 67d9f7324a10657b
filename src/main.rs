use std::path::Path;
use anyhow::Context;
use anthea_tiles::map::{TiledMap, Tileset};
use anthea_tiles::AssetManager;

const DEFAULT_PATH: &str = "assets/anthea_tileset.tsx";

/// Loads a .tsx or .tmx file and prints it as YAML.
fn main() -> anyhow::Result<()> {
    env_logger::init();
    #[cfg(feature = "profile")]
    let _guard = start_profiling();

    let path = std::env::args().nth(1).unwrap_or_else(|| String::from(DEFAULT_PATH));
    let mut manager = AssetManager::tiled("");
    let extension = Path::new(&path).extension().and_then(|ext| ext.to_str());
    let yaml = match extension {
        Some("tmx") => {
            let map = manager
                .load::<TiledMap, _>(&path)
                .with_context(|| format!("Failed to load map '{path}'"))?;
            log::info!("Loaded {}x{} map with {} layers", map.width, map.height, map.layers.len());
            serde_yaml::to_string(map.as_ref())?
        },
        _ => {
            let tileset = manager
                .load::<Tileset, _>(&path)
                .with_context(|| format!("Failed to load tileset '{path}'"))?;
            log::info!("Loaded tileset '{}' with {} tiles", tileset.name, tileset.tile_count());
            serde_yaml::to_string(tileset.as_ref())?
        },
    };
    print!("{yaml}");
    Ok(())
}

#[cfg(feature = "profile")]
fn start_profiling() -> tracing_chrome::FlushGuard {
    use tracing_subscriber::prelude::*;
    let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new().build();
    tracing_subscriber::registry().with(chrome_layer).init();
    guard
}
