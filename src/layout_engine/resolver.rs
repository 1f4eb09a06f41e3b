//! Index resolver: which committed rank the dragged tile is hovering.

use tracing::trace;

use crate::common::config::GridConfig;
use crate::model::Tile;

// The dragged tile must reach a quarter of the way into a neighbour before
// it counts as hovering it.
const NEAR: f64 = 0.25;
const FAR: f64 = 0.75;

/// Resolves the rank the dragged tile currently targets.
///
/// Only committed (`original_*`) state of the other tiles is read, so the
/// answer does not depend on how far their settle animation has progressed.
/// The result is always a valid rank in `0..tiles.len()`.
pub fn resolve_index(config: &GridConfig, dragged: &Tile, tiles: &[Tile]) -> usize {
    let per_page = config.items_per_page() as isize;
    let old_page = config.page_of(dragged.order);
    let new_page = dragged.page;

    if old_page > new_page {
        // crossed backward: last slot of the previous page
        return clamp_rank(per_page * old_page as isize - 1, tiles.len());
    }
    if old_page < new_page {
        return clamp_rank(per_page * new_page as isize, tiles.len());
    }

    let mut candidates: Vec<&Tile> =
        tiles.iter().filter(|tile| tile.original_page == old_page).collect();
    candidates.sort_by_key(|tile| tile.original_order);

    let near_x = dragged.x + dragged.width * NEAR;
    let far_x = dragged.x + dragged.width * FAR;
    let near_y = dragged.y + dragged.row_height * NEAR;
    let far_y = dragged.y + dragged.row_height * FAR;

    let hit = candidates.iter().find(|candidate| {
        let bounds = candidate.original_frame();
        (bounds.spans_x(near_x) || bounds.spans_x(far_x))
            && (bounds.spans_y(near_y) || bounds.spans_y(far_y))
    });
    // TODO: decide whether an unmatched tile should fall back to the first
    // slot to its right in the hovered row before appending to the page end.
    if let Some(hit) = hit {
        trace!(rank = hit.original_order, over = %hit.id, "hit test matched");
        return hit.original_order;
    }

    let page_start = config.first_slot_of_page(new_page) as isize;
    if let Some(first) = candidates.first() {
        if before_page_origin(dragged, first) {
            return clamp_rank(page_start, tiles.len());
        }
    }

    clamp_rank(page_start + candidates.len() as isize - 1, tiles.len())
}

/// Above and to the left of the page's first committed slot.
fn before_page_origin(dragged: &Tile, first: &Tile) -> bool {
    dragged.x < first.original_x && dragged.y < first.original_y
}

fn clamp_rank(rank: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    rank.clamp(0, len as isize - 1) as usize
}
