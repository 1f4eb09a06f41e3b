//! plain pixel geometry shared by the layout passes and the frame stream

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self { Self { width, height } }
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self { Self { origin, size } }

    pub fn min(&self) -> Point { self.origin }

    pub fn max(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height,
        )
    }

    /// Inclusive on both edges.
    pub fn spans_x(&self, x: f64) -> bool { between(x, self.min().x, self.max().x) }

    /// Inclusive on both edges.
    pub fn spans_y(&self, y: f64) -> bool { between(y, self.min().y, self.max().y) }
}

/// `lo <= value <= hi`
pub fn between(value: f64, lo: f64, hi: f64) -> bool { (lo..=hi).contains(&value) }
