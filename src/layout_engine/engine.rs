use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::commit::commit;
use super::reorder::move_tile;
use super::resolver::resolve_index;
use super::GridError;
use crate::actor::edge_flip::{EdgeFlipDetector, EdgeSide};
use crate::common::config::{Config, GridConfig};
use crate::common::geometry::Point;
use crate::model::{FrameStore, GridModel, TileId};

/// Outbound request for the presentation layer to scroll the pager.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PageScroll {
    pub page: usize,
    pub offset_x: f64,
}

#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResponse {
    pub page_scroll: Option<PageScroll>,
    /// Rank the dragged tile provisionally occupies after this update.
    pub target_order: Option<usize>,
    /// `(from, to)` committed ranks of a finished drag.
    pub committed: Option<(usize, usize)>,
    pub relaid_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    tile: TileId,
    slot: usize,
    start: Point,
}

/// Owns the grid and the single in-flight drag, and sequences the position
/// calculator, index resolver, order mutator and commit finalizer for each
/// collaborator event.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    grid: GridModel,
    drag: Option<DragSession>,
    edge: EdgeFlipDetector,
    settle_duration_ms: u64,
}

impl LayoutEngine {
    pub fn new(config: &Config, ids: impl IntoIterator<Item = TileId>) -> Result<Self, GridError> {
        let grid_config = GridConfig::new(&config.grid)?;
        let issues = config.edge_flip.validate();
        if !issues.is_empty() {
            return Err(GridError::InvalidConfig(issues));
        }
        Ok(Self {
            grid: GridModel::new(grid_config, ids)?,
            drag: None,
            edge: EdgeFlipDetector::new(config.edge_flip.clone()),
            settle_duration_ms: config.animation.settle_duration_ms,
        })
    }

    pub fn grid(&self) -> &GridModel { &self.grid }

    pub fn dragging(&self) -> Option<TileId> { self.drag.map(|session| session.tile) }

    pub fn is_dragging(&self) -> bool { self.drag.is_some() }

    pub fn publish(&self, frames: &FrameStore) {
        frames.publish(self.grid.tiles(), self.dragging(), self.settle_duration_ms);
    }

    pub fn report_measured_size(
        &mut self,
        id: TileId,
        width: f64,
        height: f64,
    ) -> Result<EventResponse, GridError> {
        let completed = self.grid.report_measured_size(id, width, height)?;
        trace!(tile = %id, width, height, completed, "measured");

        let mut response = EventResponse::default();
        // Late size changes while idle reflow right away; mid-drag they wait
        // for the commit.
        if self.grid.all_measured() && !self.is_dragging() {
            self.grid.relayout();
            response.relaid_out = true;
        }
        Ok(response)
    }

    /// Forces a commit-mode layout. Ignored while a drag owns the grid.
    pub fn relayout(&mut self) -> EventResponse {
        if let Some(session) = self.drag {
            warn!(dragging = %session.tile, "relayout requested mid-drag, ignoring");
            return EventResponse::default();
        }
        self.grid.relayout();
        EventResponse { relaid_out: true, ..Default::default() }
    }

    pub fn on_drag_start(&mut self, id: TileId) -> Result<EventResponse, GridError> {
        let slot = self.grid.slot_of(id)?;
        if let Some(session) = self.drag {
            if session.tile == id {
                return Ok(EventResponse::default());
            }
            return Err(GridError::DragInProgress {
                active: session.tile,
                requested: id,
            });
        }

        let tile = self.grid.tile_at(slot);
        let start = tile.original_position();
        debug!(tile = %id, order = tile.original_order, page = tile.page, "drag started");
        self.drag = Some(DragSession { tile: id, slot, start });
        self.edge.reset();
        Ok(EventResponse::default())
    }

    /// Applies one pointer update. `dx`/`dy` are the cumulative translation
    /// since the drag started; `scroll_x` is the pager's current offset.
    pub fn on_drag_update(
        &mut self,
        id: TileId,
        dx: f64,
        dy: f64,
        scroll_x: f64,
        now: Instant,
    ) -> Result<EventResponse, GridError> {
        let session = self.session_for(id)?;
        let config = *self.grid.config();
        let page_width = config.page_width;
        let slot = session.slot;

        let tile = self.grid.tile_at(slot);
        let (page, width) = (tile.page, tile.width);
        let page_offset = (page as f64 - tile.original_page as f64) * page_width;
        let mut x = session.start.x + dx + page_offset;
        let y = session.start.y + dy;

        let mut response = EventResponse::default();
        if let Some(side) = self.edge.on_drag_update(x, width, page, page_width, now) {
            if let Some(scroll) = self.flip_page(slot, side, scroll_x) {
                x += side.step() as f64 * page_width;
                response.page_scroll = Some(scroll);
            }
        }

        let tile = self.grid.tile_at_mut(slot);
        tile.x = x;
        tile.y = y;
        let dragged = tile.clone();

        let target = resolve_index(&config, &dragged, self.grid.tiles());
        trace!(tile = %id, x, y, target, "drag update");
        move_tile(&config, dragged.original_order, target, self.grid.tiles_mut());
        response.target_order = Some(target);
        Ok(response)
    }

    /// Releasing always commits whatever provisional order is current.
    pub fn on_drag_end(&mut self, id: TileId) -> Result<EventResponse, GridError> {
        let session = self.session_for(id)?;
        let config = *self.grid.config();
        let tile = self.grid.tile_at(session.slot);
        let (from, to) = (tile.original_order, tile.order);

        commit(&config, session.slot, self.grid.tiles_mut());
        self.drag = None;
        self.edge.reset();
        debug_assert!(self.grid.orders_are_permutations());

        info!(tile = %id, from, to, "drag committed");
        Ok(EventResponse {
            committed: Some((from, to)),
            relaid_out: true,
            ..Default::default()
        })
    }

    fn session_for(&self, id: TileId) -> Result<DragSession, GridError> {
        self.drag
            .filter(|session| session.tile == id)
            .ok_or(GridError::NotDragging(id))
    }

    /// Moves the dragged tile onto the neighbouring page and lends the
    /// boundary tile of that page to the page being left.
    fn flip_page(&mut self, slot: usize, side: EdgeSide, scroll_x: f64) -> Option<PageScroll> {
        let config = *self.grid.config();
        let visible = (scroll_x / config.page_width).round() as isize;
        let target = visible + side.step();
        if target < 0 || target as usize >= self.grid.page_count() {
            debug!(%side, target, "no page to flip to");
            return None;
        }
        let target = target as usize;
        if target == self.grid.tile_at(slot).page {
            return None;
        }

        self.grid.tile_at_mut(slot).page = target;
        let lend = match side {
            EdgeSide::Backward => Some((config.first_slot_of_page(target + 1) - 1, target + 1)),
            EdgeSide::Forward => target
                .checked_sub(1)
                .map(|previous| (config.first_slot_of_page(target), previous)),
        };
        if let Some((boundary, lent_to)) = lend {
            match self.grid.slot_by_order(boundary) {
                Some(neighbour) if neighbour != slot => {
                    self.grid.tile_at_mut(neighbour).page = lent_to;
                }
                _ => {}
            }
        }

        info!(%side, page = target, "page flip");
        Some(PageScroll {
            page: target,
            offset_x: target as f64 * config.page_width,
        })
    }
}
