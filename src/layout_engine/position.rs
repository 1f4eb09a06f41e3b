//! Position calculator: pixel positions and shared row heights from the
//! current ranks.

use crate::common::config::GridConfig;
use crate::model::Tile;

/// Maps each provisional rank to the slot holding it. Ranks nobody holds
/// (a transiently broken permutation) stay `None` and are skipped.
pub(crate) fn slots_by_order(tiles: &[Tile]) -> Vec<Option<usize>> {
    let mut by_order = vec![None; tiles.len()];
    for (slot, tile) in tiles.iter().enumerate() {
        if let Some(entry) = by_order.get_mut(tile.order) {
            *entry = Some(slot);
        }
    }
    by_order
}

/// Lays tiles out row by row in ascending `order`.
///
/// With `exclude` set (the dragged tile's committed rank) this is the
/// provisional pass run mid-drag: the excluded tile keeps the position the
/// drag gave it and no `original_*` field is touched. Without it every tile
/// is placed and its committed baseline is synchronized to the result.
pub fn layout(config: &GridConfig, tiles: &mut [Tile], exclude: Option<usize>) {
    let by_order = slots_by_order(tiles);
    let per_row = config.items_per_row();
    let rows_per_page = config.rows_per_page();

    let mut cursor = config.margin_top;
    for (row, members) in by_order.chunks(per_row).enumerate() {
        // y restarts at the top margin on every page
        if row % rows_per_page == 0 {
            cursor = config.margin_top;
        }

        // The dragged tile still counts toward its row's height.
        let row_height = members
            .iter()
            .flatten()
            .map(|&slot| tiles[slot].height)
            .fold(0.0, f64::max);

        for (column, slot) in members.iter().enumerate() {
            let Some(&slot) = slot.as_ref() else { continue };
            let tile = &mut tiles[slot];
            if exclude == Some(tile.original_order) {
                continue;
            }
            tile.row_height = row_height;
            tile.x = config.page_width * tile.page as f64
                + config.margin_left
                + tile.width * column as f64;
            tile.y = cursor;
            if exclude.is_some() {
                continue;
            }
            tile.original_x = tile.x;
            tile.original_y = tile.y;
            tile.original_order = tile.order;
        }

        cursor += row_height;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::config::GridSettings;
    use crate::model::TileId;

    fn config(items_per_row: usize, rows_per_page: usize) -> GridConfig {
        GridConfig::new(&GridSettings {
            items_per_row,
            rows_per_page,
            margin_left: 10.0,
            margin_top: 5.0,
            page_width: 200.0,
            spacing: 0.0,
        })
        .unwrap()
    }

    fn tiles(config: &GridConfig, heights: &[f64]) -> Vec<Tile> {
        heights
            .iter()
            .enumerate()
            .map(|(index, &height)| {
                let mut tile = Tile::new(TileId(index as u32), index, config.items_per_page());
                tile.width = 50.0;
                tile.height = height;
                tile
            })
            .collect()
    }

    fn positions(tiles: &[Tile]) -> Vec<(f64, f64, f64)> {
        tiles.iter().map(|t| (t.x, t.y, t.row_height)).collect()
    }

    #[test]
    fn rows_share_the_tallest_member_height() {
        let config = config(3, 4);
        let mut tiles = tiles(&config, &[10.0, 30.0, 20.0, 15.0, 15.0, 5.0]);
        layout(&config, &mut tiles, None);

        assert_eq!(positions(&tiles), vec![
            (10.0, 5.0, 30.0),
            (60.0, 5.0, 30.0),
            (110.0, 5.0, 30.0),
            (10.0, 35.0, 15.0),
            (60.0, 35.0, 15.0),
            (110.0, 35.0, 15.0),
        ]);
        for tile in &tiles {
            assert_eq!((tile.original_x, tile.original_y), (tile.x, tile.y));
            assert_eq!(tile.original_order, tile.order);
        }
    }

    #[test]
    fn short_last_row_uses_present_members_only() {
        let config = config(3, 4);
        let mut tiles = tiles(&config, &[10.0, 10.0, 10.0, 12.0, 40.0]);
        layout(&config, &mut tiles, None);

        assert_eq!(tiles[3].row_height, 40.0);
        assert_eq!(tiles[4].row_height, 40.0);
        assert_eq!(tiles[3].y, 15.0);
        assert_eq!(tiles[4].x, 60.0);
    }

    #[test]
    fn each_page_restarts_at_top_margin_and_shifts_by_page_width() {
        let config = config(2, 2);
        let mut tiles = tiles(&config, &[10.0, 10.0, 20.0, 20.0, 7.0, 9.0]);
        layout(&config, &mut tiles, None);

        // second page starts over at margin_top, one page width to the right
        assert_eq!((tiles[4].x, tiles[4].y), (210.0, 5.0));
        assert_eq!((tiles[5].x, tiles[5].y), (260.0, 5.0));
        assert_eq!(tiles[4].row_height, 9.0);
        assert_eq!(tiles[3].y, 15.0);
    }

    #[test]
    fn layout_is_idempotent() {
        let config = config(3, 2);
        let mut tiles = tiles(&config, &[3.0, 8.0, 1.0, 9.0, 4.0, 4.0, 2.0]);
        layout(&config, &mut tiles, None);
        let first = tiles.clone();
        layout(&config, &mut tiles, None);
        assert_eq!(tiles, first);
    }

    #[test]
    fn provisional_pass_leaves_dragged_tile_and_baseline_alone() {
        let config = config(3, 4);
        let mut tiles = tiles(&config, &[10.0; 6]);
        layout(&config, &mut tiles, None);
        let committed = tiles.clone();

        // tile 0 is being dragged and has been provisionally moved to rank 2
        tiles[0].order = 2;
        tiles[1].order = 0;
        tiles[2].order = 1;
        tiles[0].x = 999.0;
        tiles[0].y = 999.0;
        layout(&config, &mut tiles, Some(0));

        assert_eq!((tiles[0].x, tiles[0].y), (999.0, 999.0));
        assert_eq!(tiles[1].x, 10.0);
        assert_eq!(tiles[2].x, 60.0);
        for (tile, before) in tiles.iter().zip(&committed) {
            assert_eq!(tile.original_order, before.original_order);
            assert_eq!(tile.original_x, before.original_x);
            assert_eq!(tile.original_y, before.original_y);
        }
    }

    #[test]
    fn missing_ranks_are_skipped() {
        let config = config(3, 4);
        let mut tiles = tiles(&config, &[10.0, 10.0, 10.0]);
        tiles[1].order = 7;
        layout(&config, &mut tiles, Some(99));
        assert_eq!(tiles[0].x, 10.0);
        assert_eq!(tiles[2].x, 110.0);
        assert_eq!(tiles[1].x, 0.0);
    }
}
