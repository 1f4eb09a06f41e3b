use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::geometry::{Point, Rect, Size};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "tile#{}", self.0) }
}

/// One reorderable grid item.
///
/// `order`/`page`/`x`/`y` are the provisional values that follow a drag;
/// the `original_*` fields hold the committed baseline and only move when a
/// drag is committed (or on the initial layout).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub order: usize,
    pub original_order: usize,
    pub page: usize,
    pub original_page: usize,
    pub width: f64,
    pub height: f64,
    pub row_height: f64,
    pub x: f64,
    pub y: f64,
    pub original_x: f64,
    pub original_y: f64,
    #[serde(default)]
    pub measured: bool,
}

impl Tile {
    pub fn new(id: TileId, index: usize, items_per_page: usize) -> Self {
        let page = index / items_per_page;
        Self {
            id,
            order: index,
            original_order: index,
            page,
            original_page: page,
            width: 0.0,
            height: 0.0,
            row_height: 0.0,
            x: 0.0,
            y: 0.0,
            original_x: 0.0,
            original_y: 0.0,
            measured: false,
        }
    }

    pub fn original_position(&self) -> Point { Point::new(self.original_x, self.original_y) }

    /// Committed bounds, used as the hit target for other tiles' drags.
    pub fn original_frame(&self) -> Rect {
        Rect::new(self.original_position(), Size::new(self.width, self.height))
    }
}
