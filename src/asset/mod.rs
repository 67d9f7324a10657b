mod asset;
mod manager;
mod loader;
mod protocol;
mod path_parts;

pub use asset::*;
pub use manager::*;
pub use loader::*;
pub use protocol::*;
pub use path_parts::*;
