use tracing::debug;

use super::tile::{Tile, TileId};
use crate::common::collections::HashMap;
use crate::common::config::GridConfig;
use crate::layout_engine::{GridError, position};

/// The authoritative tile set, addressable by slot (creation index).
///
/// Slots never move; reordering only rewrites the `order` fields. Lookups by
/// id go through `slots`.
#[derive(Debug, Clone)]
pub struct GridModel {
    config: GridConfig,
    tiles: Vec<Tile>,
    slots: HashMap<TileId, usize>,
}

impl GridModel {
    pub fn new(
        config: GridConfig,
        ids: impl IntoIterator<Item = TileId>,
    ) -> Result<Self, GridError> {
        let mut tiles = Vec::new();
        let mut slots = HashMap::default();
        for (index, id) in ids.into_iter().enumerate() {
            if slots.insert(id, index).is_some() {
                return Err(GridError::DuplicateTile(id));
            }
            tiles.push(Tile::new(id, index, config.items_per_page()));
        }
        Ok(Self { config, tiles, slots })
    }

    pub fn config(&self) -> &GridConfig { &self.config }

    pub fn page_count(&self) -> usize { self.config.page_count(self.tiles.len()) }

    pub fn tiles(&self) -> &[Tile] { &self.tiles }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] { &mut self.tiles }

    pub fn slot_of(&self, id: TileId) -> Result<usize, GridError> {
        self.slots.get(&id).copied().ok_or(GridError::UnknownTile(id))
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(&id).map(|&slot| &self.tiles[slot])
    }

    pub(crate) fn tile_at(&self, slot: usize) -> &Tile { &self.tiles[slot] }

    pub(crate) fn tile_at_mut(&mut self, slot: usize) -> &mut Tile { &mut self.tiles[slot] }

    /// Provisional ranks change every drag frame, so this one scans.
    pub fn slot_by_order(&self, order: usize) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.order == order)
    }

    pub fn all_measured(&self) -> bool { self.tiles.iter().all(|tile| tile.measured) }

    /// Stores a measured size (padded by the configured spacing). Returns
    /// `true` when this report completed the measurement of every tile.
    pub fn report_measured_size(
        &mut self,
        id: TileId,
        width: f64,
        height: f64,
    ) -> Result<bool, GridError> {
        let was_complete = self.all_measured();
        let slot = self.slot_of(id)?;
        let spacing = self.config.spacing;
        let tile = &mut self.tiles[slot];
        tile.width = width + spacing;
        tile.height = height + spacing;
        tile.measured = true;
        Ok(!was_complete && self.all_measured())
    }

    /// Commit-mode layout over every tile; refreshes the committed baseline.
    pub fn relayout(&mut self) {
        position::layout(&self.config, &mut self.tiles, None);
        debug!(tiles = self.tiles.len(), "committed layout");
    }

    /// Both `order` and `original_order` are permutations of `0..len`.
    pub fn orders_are_permutations(&self) -> bool {
        is_permutation(self.tiles.iter().map(|t| t.order), self.tiles.len())
            && is_permutation(self.tiles.iter().map(|t| t.original_order), self.tiles.len())
    }

    pub fn draw_tree(&self) -> String {
        let tree = self.get_ascii_tree();
        let mut out = String::new();
        // Writing into a String cannot fail.
        _ = ascii_tree::write_tree(&mut out, &tree);
        out
    }

    fn get_ascii_tree(&self) -> ascii_tree::Tree {
        let per_row = self.config.items_per_row();
        let per_page = self.config.items_per_page();
        let mut by_order: Vec<&Tile> = self.tiles.iter().collect();
        by_order.sort_by_key(|tile| tile.order);

        let pages = by_order
            .chunks(per_page)
            .enumerate()
            .map(|(page, members)| {
                let rows = members
                    .chunks(per_row)
                    .enumerate()
                    .map(|(row, members)| {
                        let leaves = members
                            .iter()
                            .map(|t| {
                                format!(
                                    "{} order={} page={} @ ({:.1}, {:.1})",
                                    t.id, t.order, t.page, t.x, t.y
                                )
                            })
                            .collect();
                        let height = members.first().map_or(0.0, |t| t.row_height);
                        ascii_tree::Tree::Node(
                            format!("row {row} h={height:.1}"),
                            vec![ascii_tree::Tree::Leaf(leaves)],
                        )
                    })
                    .collect();
                ascii_tree::Tree::Node(format!("page {page}"), rows)
            })
            .collect();
        ascii_tree::Tree::Node("grid".to_string(), pages)
    }
}

fn is_permutation(values: impl Iterator<Item = usize>, len: usize) -> bool {
    let mut seen = vec![false; len];
    for value in values {
        match seen.get_mut(value) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    seen.into_iter().all(|s| s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::GridSettings;

    fn config() -> GridConfig {
        GridConfig::new(&GridSettings {
            items_per_row: 3,
            rows_per_page: 2,
            spacing: 0.0,
            ..GridSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn new_tiles_start_at_their_index() {
        let model = GridModel::new(config(), (0..8).map(TileId)).unwrap();
        for (index, tile) in model.tiles().iter().enumerate() {
            assert_eq!(tile.order, index);
            assert_eq!(tile.original_order, index);
            assert_eq!(tile.page, index / 6);
            assert_eq!(tile.original_page, tile.page);
        }
        assert_eq!(model.page_count(), 2);
        assert!(model.orders_are_permutations());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = GridModel::new(config(), [TileId(1), TileId(2), TileId(1)]).unwrap_err();
        assert!(matches!(err, GridError::DuplicateTile(TileId(1))));
    }

    #[test]
    fn measuring_every_tile_is_reported_once() {
        let mut model = GridModel::new(config(), [TileId(7), TileId(9)]).unwrap();
        assert!(!model.report_measured_size(TileId(7), 10.0, 10.0).unwrap());
        assert!(model.report_measured_size(TileId(9), 10.0, 10.0).unwrap());
        assert!(!model.report_measured_size(TileId(9), 12.0, 10.0).unwrap());
        assert!(matches!(
            model.report_measured_size(TileId(3), 1.0, 1.0),
            Err(GridError::UnknownTile(TileId(3)))
        ));
    }

    #[test]
    fn measured_sizes_are_padded_by_spacing() {
        let config = GridConfig::new(&GridSettings {
            spacing: 5.0,
            ..GridSettings::default()
        })
        .unwrap();
        let mut model = GridModel::new(config, [TileId(1)]).unwrap();
        model.report_measured_size(TileId(1), 40.0, 20.0).unwrap();
        let tile = model.tile(TileId(1)).unwrap();
        assert_eq!((tile.width, tile.height), (45.0, 25.0));
    }

    #[test]
    fn tiles_stay_addressable_by_id_after_relayout() {
        let mut model = GridModel::new(config(), [TileId(4), TileId(2), TileId(9)]).unwrap();
        model.relayout();
        assert_eq!(model.slot_of(TileId(9)).unwrap(), 2);
        assert_eq!(model.tile(TileId(2)).unwrap().original_order, 1);
        assert_eq!(model.slot_by_order(0), Some(0));
        assert!(model.tile(TileId(3)).is_none());
    }

    #[test]
    fn permutation_check_catches_duplicates() {
        assert!(is_permutation([2, 0, 1].into_iter(), 3));
        assert!(!is_permutation([0, 0, 1].into_iter(), 3));
        assert!(!is_permutation([0, 1, 3].into_iter(), 3));
    }

    #[test]
    fn draw_tree_lists_pages_and_rows() {
        let mut model = GridModel::new(config(), (0..7).map(TileId)).unwrap();
        for id in 0..7 {
            model.report_measured_size(TileId(id), 10.0, 10.0).unwrap();
        }
        model.relayout();
        let tree = model.draw_tree();
        assert!(tree.contains("page 0"));
        assert!(tree.contains("page 1"));
        assert!(tree.contains("tile#6 order=6 page=1"));
    }
}
