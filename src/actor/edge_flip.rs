use std::time::Instant;

use strum::Display;

use crate::common::config::EdgeFlipSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EdgeSide {
    Backward,
    Forward,
}

impl EdgeSide {
    pub fn step(self) -> isize {
        match self {
            EdgeSide::Backward => -1,
            EdgeSide::Forward => 1,
        }
    }
}

/// Decides when a tile held against a page edge should flip the page.
///
/// The first frame past a threshold arms a timer; the flip fires once the
/// dwell has elapsed. After firing the side stays latched until the tile
/// leaves the edge zone, so one continuous hold flips exactly once.
#[derive(Debug, Clone)]
pub struct EdgeFlipDetector {
    armed: Option<(EdgeSide, Instant)>,
    latched: Option<EdgeSide>,
    config: EdgeFlipSettings,
}

impl Default for EdgeFlipDetector {
    fn default() -> Self { Self::new(EdgeFlipSettings::default()) }
}

impl EdgeFlipDetector {
    pub fn new(config: EdgeFlipSettings) -> Self {
        Self {
            armed: None,
            latched: None,
            config,
        }
    }

    /// Which edge zone, if any, a tile whose left edge is at `x` is in.
    pub fn zone(&self, x: f64, width: f64, page: usize, page_width: f64) -> Option<EdgeSide> {
        let page_left = page_width * page as f64;
        let page_right = page_width * (page + 1) as f64;
        if x < page_left - width * self.config.backward_fraction {
            Some(EdgeSide::Backward)
        } else if x > page_right - width * self.config.forward_fraction {
            Some(EdgeSide::Forward)
        } else {
            None
        }
    }

    pub fn on_drag_update(
        &mut self,
        x: f64,
        width: f64,
        page: usize,
        page_width: f64,
        now: Instant,
    ) -> Option<EdgeSide> {
        let Some(side) = self.zone(x, width, page, page_width) else {
            self.reset();
            return None;
        };

        if self.latched == Some(side) {
            return None;
        }
        self.latched = None;

        match self.armed {
            Some((armed_side, since)) if armed_side == side => {
                if now.saturating_duration_since(since) < self.config.dwell() {
                    return None;
                }
                self.armed = None;
                self.latched = Some(side);
                Some(side)
            }
            _ => {
                self.armed = Some((side, now));
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.armed = None;
        self.latched = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const PAGE_WIDTH: f64 = 300.0;
    const TILE_WIDTH: f64 = 80.0;

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    #[test]
    fn zones_use_a_quarter_of_the_tile_width() {
        let detector = EdgeFlipDetector::default();
        // forward threshold on page 0: 300 - 20
        assert_eq!(detector.zone(280.0, TILE_WIDTH, 0, PAGE_WIDTH), None);
        assert_eq!(
            detector.zone(280.5, TILE_WIDTH, 0, PAGE_WIDTH),
            Some(EdgeSide::Forward)
        );
        // backward threshold on page 1: 300 - 20
        assert_eq!(detector.zone(280.0, TILE_WIDTH, 1, PAGE_WIDTH), None);
        assert_eq!(
            detector.zone(279.5, TILE_WIDTH, 1, PAGE_WIDTH),
            Some(EdgeSide::Backward)
        );
    }

    #[test]
    fn flip_requires_full_dwell() {
        let mut detector = EdgeFlipDetector::default();
        let t0 = Instant::now();
        assert_eq!(detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0), None);
        assert_eq!(
            detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(499)),
            None
        );
        assert_eq!(
            detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(500)),
            Some(EdgeSide::Forward)
        );
    }

    #[test]
    fn continuous_dwell_flips_exactly_once() {
        let mut detector = EdgeFlipDetector::default();
        let t0 = Instant::now();
        let mut page = 0;
        let mut x = 290.0;
        let mut flips = 0;
        for frame in 0..=125 {
            let now = t0 + ms(frame * 16);
            if let Some(side) = detector.on_drag_update(x, TILE_WIDTH, page, PAGE_WIDTH, now) {
                flips += 1;
                page = (page as isize + side.step()) as usize;
                x += PAGE_WIDTH;
            }
        }
        assert_eq!(flips, 1);
        assert_eq!(page, 1);
    }

    #[test]
    fn stationary_hold_without_page_change_also_flips_once() {
        let mut detector = EdgeFlipDetector::default();
        let t0 = Instant::now();
        let fired = (0..=2000)
            .step_by(10)
            .filter_map(|t| detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(t)))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn leaving_the_zone_resets_the_timer() {
        let mut detector = EdgeFlipDetector::default();
        let t0 = Instant::now();
        detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0);
        detector.on_drag_update(100.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(300));
        assert_eq!(
            detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(600)),
            None
        );
        assert_eq!(
            detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(1100)),
            Some(EdgeSide::Forward)
        );
    }

    #[test]
    fn re_entering_after_a_flip_can_flip_again() {
        let mut detector = EdgeFlipDetector::default();
        let t0 = Instant::now();
        detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0);
        assert!(detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(500)).is_some());
        detector.on_drag_update(100.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(600));
        detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(700));
        assert!(detector.on_drag_update(290.0, TILE_WIDTH, 0, PAGE_WIDTH, t0 + ms(1200)).is_some());
    }

    #[test]
    fn switching_sides_rearms() {
        let mut detector = EdgeFlipDetector::default();
        let t0 = Instant::now();
        assert_eq!(
            detector.zone(250.0, TILE_WIDTH, 1, PAGE_WIDTH),
            Some(EdgeSide::Backward)
        );
        detector.on_drag_update(250.0, TILE_WIDTH, 1, PAGE_WIDTH, t0);
        assert_eq!(
            detector.on_drag_update(590.0, TILE_WIDTH, 1, PAGE_WIDTH, t0 + ms(500)),
            None
        );
        assert_eq!(
            detector.on_drag_update(590.0, TILE_WIDTH, 1, PAGE_WIDTH, t0 + ms(1000)),
            Some(EdgeSide::Forward)
        );
    }
}
