use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::tile::{Tile, TileId};

/// How the renderer should reach the published position.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Track the value directly (the tile under the pointer).
    Follow,
    /// Interpolate toward the value over the given duration.
    Settle { duration_ms: u64 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TileFrame {
    pub id: TileId,
    pub x: f64,
    pub y: f64,
    pub row_height: f64,
    pub page: usize,
    pub dragging: bool,
    pub motion: Motion,
}

/// Thread-safe latest-frame cache read by the rendering side every frame.
#[derive(Clone, Default, Debug)]
pub struct FrameStore(Arc<DashMap<TileId, TileFrame>>);

impl FrameStore {
    pub fn new() -> Self { Self::default() }

    pub fn publish<'a>(
        &self,
        tiles: impl IntoIterator<Item = &'a Tile>,
        dragging: Option<TileId>,
        settle_duration_ms: u64,
    ) {
        for tile in tiles {
            let is_dragged = dragging == Some(tile.id);
            let motion = if is_dragged {
                Motion::Follow
            } else {
                Motion::Settle { duration_ms: settle_duration_ms }
            };
            self.0.insert(tile.id, TileFrame {
                id: tile.id,
                x: tile.x,
                y: tile.y,
                row_height: tile.row_height,
                page: tile.page,
                dragging: is_dragged,
                motion,
            });
        }
    }

    pub fn get(&self, id: TileId) -> Option<TileFrame> { self.0.get(&id).map(|entry| *entry) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// All frames ordered by tile id.
    pub fn snapshot(&self) -> Vec<TileFrame> {
        let mut frames: Vec<TileFrame> = self.0.iter().map(|entry| *entry.value()).collect();
        frames.sort_by_key(|frame| frame.id);
        frames
    }
}
