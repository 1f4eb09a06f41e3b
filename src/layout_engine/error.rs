use thiserror::Error;

use crate::model::TileId;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("Invalid grid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
    #[error("Tile not found: {0}")]
    UnknownTile(TileId),
    #[error("Tile {0} appears more than once")]
    DuplicateTile(TileId),
    #[error("Cannot drag {requested}: {active} is already being dragged")]
    DragInProgress { active: TileId, requested: TileId },
    #[error("Tile {0} is not being dragged")]
    NotDragging(TileId),
}
