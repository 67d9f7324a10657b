mod asset;
mod util;
pub mod map;

pub use asset::*;
pub use util::*;
