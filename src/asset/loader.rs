use std::any::{Any, TypeId};
use crate::map::ParseError;
use crate::{Asset, AssetManager, AssetPath, LoadError};


/// Takes the contents of a file, and converts them into an asset.
pub trait AssetLoader: Send + Sync + 'static {
    type AssetType: Asset;
    fn load(&self, bytes: &[u8], path: &AssetPath) -> Result<AssetValue<Self::AssetType>, ParseError>;
    fn extensions(&self) -> &[&str];
}

impl<L: AssetLoader> DynLoader for L {

    fn dyn_load(&self, bytes: &[u8], path: &AssetPath) -> Result<Box<dyn DynAssetValue>, ParseError> {
        let asset_value = self.load(bytes, path)?;
        Ok(Box::new(asset_value))
    }

    fn asset_type(&self) -> TypeId {
        TypeId::of::<L::AssetType>()
    }
}

type Producer<A> = Box<dyn FnOnce(&mut AssetManager) -> Result<A, LoadError> + Send + Sync + 'static>;

/// Value returned by an [`AssetLoader`].
/// Either a plain [`Asset`], or a producer of an [`Asset`].
/// Producer runs after parsing and has access to the [`AssetManager`] for loading dependent assets.
pub struct AssetValue<A>(AssetValueInner<A>);

impl<A: Asset> AssetValue<A> {
    pub fn from_fn<F>(function: F) -> Self
    where
        F: FnOnce(&mut AssetManager) -> Result<A, LoadError> + Send + Sync + 'static,
    {
        Self(AssetValueInner::Producer(Box::new(function)))
    }

    /// Runs the producer, if any, and returns the finished asset.
    pub fn produce(self, manager: &mut AssetManager) -> Result<A, LoadError> {
        match self.0 {
            AssetValueInner::Asset(asset) => Ok(asset),
            AssetValueInner::Producer(producer) => producer(manager),
        }
    }
}

impl<A: Asset> From<A> for AssetValue<A> {
    fn from(asset: A) -> Self {
        Self(AssetValueInner::Asset(asset))
    }
}

enum AssetValueInner<A> {
    Asset(A),
    Producer(Producer<A>),
}

/// Dynamic trait variant of [`AssetLoader`].
pub(crate) trait DynLoader: Send + Sync + 'static {
    fn dyn_load(&self, bytes: &[u8], path: &AssetPath) -> Result<Box<dyn DynAssetValue>, ParseError>;
    fn asset_type(&self) -> TypeId;
}

/// Dynamic trait variant of [`AssetValue`].
pub(crate) trait DynAssetValue {
    fn dyn_produce(self: Box<Self>, manager: &mut AssetManager) -> Result<Box<dyn Any + Send + Sync + 'static>, LoadError>;
}

impl<A: Asset> DynAssetValue for AssetValue<A> {
    fn dyn_produce(self: Box<Self>, manager: &mut AssetManager) -> Result<Box<dyn Any + Send + Sync + 'static>, LoadError> {
        let asset = (*self).produce(manager)?;
        Ok(Box::new(asset))
    }
}

pub type AssetResult<A> = Result<AssetValue<A>, ParseError>;
