//! Commit finalizer: promotes a finished drag to the new baseline.

use tracing::debug;

use super::position::layout;
use super::reorder::shifted_rank;
use crate::common::config::GridConfig;
use crate::model::Tile;

/// Promotes the provisional order of the drag owned by `dragged` (a slot
/// index into `tiles`) and snaps everyone, the dragged tile included, to
/// their settled positions.
///
/// Pages are re-derived from rank here for every other tile, which clears
/// any page/rank mismatch left behind by a cross-page drag. The dragged tile
/// keeps the page it was released on.
pub fn commit(config: &GridConfig, dragged: usize, tiles: &mut [Tile]) {
    let old_order = tiles[dragged].original_order;
    let new_order = tiles[dragged].order;

    for (slot, tile) in tiles.iter_mut().enumerate() {
        if slot == dragged {
            continue;
        }
        let rank = shifted_rank(tile.original_order, old_order, new_order);
        let page = config.page_of(rank);
        tile.order = rank;
        tile.original_order = rank;
        tile.page = page;
        tile.original_page = page;
    }

    let tile = &mut tiles[dragged];
    let derived_page = config.page_of(new_order);
    if tile.page != derived_page {
        debug!(
            tile = %tile.id,
            page = tile.page,
            derived_page,
            "dragged tile released off its rank's page"
        );
    }
    tile.original_page = tile.page;
    tile.original_order = new_order;

    layout(config, tiles, None);
}
