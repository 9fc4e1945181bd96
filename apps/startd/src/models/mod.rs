pub mod tile;

pub use tile::{ImageRef, SizeClass, TileId, TileList, TileRecord};
