//! Order mutator: provisional list-move while a drag is in flight.

use super::position::layout;
use crate::common::config::GridConfig;
use crate::model::Tile;

/// Where a tile with committed rank `rank` lands when the tile at `from` is
/// moved to `to`. Tiles between the two close the gap, everything else stays.
pub(crate) fn shifted_rank(rank: usize, from: usize, to: usize) -> usize {
    if to > from && rank > from && rank <= to {
        rank - 1
    } else if to < from && rank >= to && rank < from {
        rank + 1
    } else {
        rank
    }
}

/// Provisionally moves the tile committed at `old_order` to `new_order`.
///
/// Ranks are always derived from the committed baseline, so calling this
/// again with the same pair (or a different one) never accumulates drift.
/// Every tile except the dragged one is then repositioned.
pub fn move_tile(config: &GridConfig, old_order: usize, new_order: usize, tiles: &mut [Tile]) {
    for tile in tiles.iter_mut() {
        tile.order = if tile.original_order == old_order {
            new_order
        } else {
            shifted_rank(tile.original_order, old_order, new_order)
        };
    }

    layout(config, tiles, Some(old_order));
}
