use std::any::{Any, TypeId};
use std::io;
use std::sync::Arc;
use derive_more::*;
use tracing::instrument;
use crate::map::ParseError;
use crate::{Asset, AssetLoader, AssetPath, DynAssetValue, DynLoader, HashMap, PathHash, Protocol};

/// Responsible for loading assets and caching them by path.
/// Every asset is loaded at most once; later loads of the same path share the cached [`Arc`].
pub struct AssetManager {
    path_prefix: Option<String>,
    protocols: HashMap<String, Arc<dyn Protocol>>,
    default_protocol: Option<String>,
    loaders: Vec<Arc<dyn DynLoader>>,
    extension_to_loader: HashMap<String, usize>,
    path_to_asset: HashMap<PathHash, CachedAsset>,
}

impl AssetManager {

    pub fn new() -> Self {
        Self {
            path_prefix: None,
            protocols: HashMap::default(),
            default_protocol: None,
            loaders: Vec::default(),
            extension_to_loader: HashMap::default(),
            path_to_asset: HashMap::default(),
        }
    }

    pub fn builder() -> AssetManagerBuilder {
        AssetManagerBuilder { manager: Self::new() }
    }

    /// Directory every path is resolved against. An empty prefix is the same as none.
    pub fn set_path_prefix<S: Into<String>>(&mut self, prefix: Option<S>) {
        self.path_prefix = prefix
            .map(|s| s.into())
            .filter(|prefix| !prefix.is_empty());
    }

    /// Adds a protocol for use in loading bytes for asset loaders.
    pub fn add_protocol(&mut self, protocol: impl Protocol, is_default: bool) {
        let name = String::from(protocol.name());
        self.protocols.insert(name.clone(), Arc::new(protocol));
        if is_default {
            self.default_protocol = Some(name);
        }
    }

    /// Adds a loader, which is selected by the extension of the path being loaded.
    pub fn add_loader(&mut self, loader: impl AssetLoader) {
        self.try_add_loader(loader).unwrap()
    }

    pub fn try_add_loader(&mut self, loader: impl AssetLoader) -> Result<(), LoadError> {
        for extension in loader.extensions() {
            if self.extension_to_loader.contains_key(*extension) {
                return Err(LoadError::ExtensionOverlaps { extension: String::from(*extension) });
            }
        }
        let loader_index = self.loaders.len();
        for extension in loader.extensions() {
            self.extension_to_loader.insert(String::from(*extension), loader_index);
        }
        self.loaders.push(Arc::new(loader));
        Ok(())
    }

    /// True if an asset at this path has already been loaded.
    pub fn contains(&self, path: impl AsRef<str>) -> bool {
        match self.resolve(path.as_ref()) {
            Ok(asset_path) => self.path_to_asset.contains_key(&PathHash::of(&asset_path.to_string())),
            Err(_) => false,
        }
    }

    /// Number of cached assets.
    pub fn len(&self) -> usize {
        self.path_to_asset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_to_asset.is_empty()
    }

    /// Loads an asset synchronously, or returns the cached one if this path was loaded before.
    /// Paths are cached by their fully qualified form, so "a.tsx" and "file://a.tsx" share an entry
    /// when "file" is the default protocol.
    /// A failed load caches nothing.
    pub fn load<A, P>(&mut self, path: P) -> Result<Arc<A>, LoadError>
    where
        A: Asset,
        P: AsRef<str>,
    {
        let asset_path = self.resolve(path.as_ref())?;
        self.load_path(asset_path)
    }

    #[instrument(skip_all, fields(path = %asset_path))]
    fn load_path<A: Asset>(&mut self, asset_path: AssetPath) -> Result<Arc<A>, LoadError> {

        // Returns cloned asset if already stored.
        let asset_type = TypeId::of::<A>();
        let path_string = asset_path.to_string();
        let path_hash = PathHash::of(&path_string);
        if let Some(cached) = self.path_to_asset.get(&path_hash) {
            log::debug!("Reusing cached asset '{path_string}'");
            return cached.downcast(&path_string);
        }

        // Uses path to fetch protocol and loader.
        let protocol = match self.protocols.get(&asset_path.protocol) {
            Some(protocol) => protocol.clone(),
            None => return Err(LoadError::NoSuchProtocol { protocol: asset_path.protocol }),
        };
        let loader = match self.extension_to_loader.get(&asset_path.extension) {
            Some(loader_idx) => self.loaders[*loader_idx].clone(),
            None => return Err(LoadError::NoSuchLoader { extension: asset_path.extension }),
        };
        if loader.asset_type() != asset_type {
            return Err(LoadError::IncorrectAssetType { path: path_string });
        }

        // Reads, parses, then lets the loader pull in dependencies.
        let bytes = protocol.read(&asset_path).map_err(|source| LoadError::NotFound {
            path: path_string.clone(),
            source,
        })?;
        let dyn_asset_value = loader.dyn_load(&bytes, &asset_path).map_err(|source| LoadError::Parse {
            path: path_string.clone(),
            source,
        })?;
        let dyn_asset = dyn_asset_value.dyn_produce(self)?;
        let asset: Arc<dyn Any + Send + Sync> = Arc::from(dyn_asset);
        let cached = CachedAsset { asset_type, asset };
        let result = cached.downcast(&path_string);
        self.path_to_asset.insert(path_hash, cached);
        log::debug!("Loaded asset '{path_string}'");
        result
    }

    /// Parses a path, filling in the default protocol and the path prefix.
    fn resolve(&self, path: &str) -> Result<AssetPath, LoadError> {
        let mut asset_path = AssetPath::parse(path, self.default_protocol.as_deref())?;
        asset_path.prefix = self.path_prefix.clone();
        Ok(asset_path)
    }
}

impl Default for AssetManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Configures an [`AssetManager`].
pub struct AssetManagerBuilder {
    manager: AssetManager,
}

impl AssetManagerBuilder {

    /// Protocol used when a path has no "protocol://" part.
    pub fn default_protocol(mut self, protocol: impl Protocol) -> Self {
        self.manager.add_protocol(protocol, true);
        self
    }

    pub fn protocol(mut self, protocol: impl Protocol) -> Self {
        self.manager.add_protocol(protocol, false);
        self
    }

    /// Directory every path is resolved against.
    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.manager.set_path_prefix(Some(prefix));
        self
    }

    pub fn loader(mut self, loader: impl AssetLoader) -> Self {
        self.manager.add_loader(loader);
        self
    }

    pub fn build(self) -> AssetManager {
        self.manager
    }
}

struct CachedAsset {
    asset_type: TypeId,
    asset: Arc<dyn Any + Send + Sync>,
}

impl CachedAsset {
    fn downcast<A: Asset>(&self, path: &str) -> Result<Arc<A>, LoadError> {
        if self.asset_type != TypeId::of::<A>() {
            return Err(LoadError::IncorrectAssetType { path: String::from(path) });
        }
        self.asset
            .clone()
            .downcast::<A>()
            .map_err(|_| LoadError::IncorrectAssetType { path: String::from(path) })
    }
}

#[derive(Error, Debug, Display)]
pub enum LoadError {
    #[display(fmt="Asset '{path}' not found: {source}")]
    NotFound { path: String, source: io::Error },
    #[display(fmt="Failed to parse '{path}': {source}")]
    Parse { path: String, source: ParseError },
    #[display(fmt="Incorrect asset type for '{path}'")]
    IncorrectAssetType { path: String },
    #[display(fmt="No default protocol")]
    NoDefaultProtocol,
    #[display(fmt="No such protocol '{protocol}'")]
    NoSuchProtocol { protocol: String },
    #[display(fmt="No loader matching extension '{extension}'")]
    NoSuchLoader { extension: String },
    #[display(fmt="Path '{path}' missing extension")]
    PathMissingExtension { path: String },
    #[display(fmt="Supported extension '{extension}' of one loader overlaps with another")]
    ExtensionOverlaps { extension: String },
}

impl LoadError {
    /// True for errors caused by a missing or unreadable file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for errors caused by malformed file contents.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use crate::map::{ParseError, TiledMap, Tileset, TsxLoader};
    use crate::{AssetManager, FileProtocol, LoadError, MemoryProtocol, RawProtocol};

    const SMALL_TSX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset name="Small" tilewidth="16" tileheight="16" tilecount="1" columns="0">
 <tile id="0">
  <image width="16" height="16" source="sprites/a.png"/>
 </tile>
</tileset>"#;

    #[test]
    fn loads_are_cached() {
        let mut manager = AssetManager::tiled("assets");
        assert!(manager.is_empty());
        let first = manager.load::<Tileset, _>("anthea_tileset.tsx").unwrap();
        let second = manager.load::<Tileset, _>("anthea_tileset.tsx").unwrap();
        let qualified = manager.load::<Tileset, _>("file://anthea_tileset.tsx").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &qualified));
        assert!(manager.contains("anthea_tileset.tsx"));
        assert_eq!(1, manager.len());
    }

    #[test]
    fn separate_managers_load_equal_tables() {
        let first = AssetManager::tiled("assets").load::<Tileset, _>("anthea_tileset.tsx").unwrap();
        let second = AssetManager::tiled("assets").load::<Tileset, _>("anthea_tileset.tsx").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn missing_file() {
        let mut manager = AssetManager::tiled("assets");
        let err = manager.load::<Tileset, _>("does_not_exist.tsx").unwrap_err();
        assert!(err.is_not_found(), "{err}");
        assert!(!manager.contains("does_not_exist.tsx"));
    }

    #[test]
    fn raw_protocol() {
        let mut manager = AssetManager::builder()
            .default_protocol(FileProtocol)
            .protocol(RawProtocol::from(SMALL_TSX))
            .loader(TsxLoader)
            .build();
        let tileset = manager.load::<Tileset, _>("raw://small.tsx").unwrap();
        assert_eq!("Small", tileset.name);
        assert_eq!("sprites/a.png", tileset.entry(0).unwrap().image_path);
    }

    #[test]
    fn malformed_file() {
        let mut manager = AssetManager::builder()
            .default_protocol(MemoryProtocol::new().with("broken.tsx", "<tileset tilewidth=\"16\""))
            .loader(TsxLoader)
            .build();
        let err = manager.load::<Tileset, _>("broken.tsx").unwrap_err();
        assert!(err.is_parse(), "{err}");
        assert!(matches!(err, LoadError::Parse { source: ParseError::XmlError(_), .. }));
    }

    #[test]
    fn configuration_errors() {
        let mut manager = AssetManager::tiled("assets");
        assert!(matches!(
            manager.load::<Tileset, _>("anthea_tileset.png"),
            Err(LoadError::NoSuchLoader { .. })
        ));
        assert!(matches!(
            manager.load::<Tileset, _>("http://anthea_tileset.tsx"),
            Err(LoadError::NoSuchProtocol { .. })
        ));
        assert!(matches!(
            manager.load::<TiledMap, _>("anthea_tileset.tsx"),
            Err(LoadError::IncorrectAssetType { .. })
        ));
        assert!(matches!(
            manager.try_add_loader(TsxLoader),
            Err(LoadError::ExtensionOverlaps { .. })
        ));
    }

    #[test]
    fn cached_asset_wrong_type() {
        let mut manager = AssetManager::tiled("assets");
        manager.load::<Tileset, _>("anthea_tileset.tsx").unwrap();
        assert!(matches!(
            manager.load::<TiledMap, _>("anthea_tileset.tsx"),
            Err(LoadError::IncorrectAssetType { .. })
        ));
    }
}
