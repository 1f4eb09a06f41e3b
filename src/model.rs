pub mod frame_store;
pub mod grid;
pub mod tile;

pub use frame_store::{FrameStore, Motion, TileFrame};
pub use grid::GridModel;
pub use tile::{Tile, TileId};
