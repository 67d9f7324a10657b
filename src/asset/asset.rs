use std::any::Any;

/**
 * Shareable, immutable resource like a tileset or a map.
 * Loaded assets are handed out behind an [`std::sync::Arc`], so they must be safe to share between threads.
 */
pub trait Asset: Any + Send + Sync + 'static {}
impl<A: Any + Send + Sync + 'static> Asset for A {}
