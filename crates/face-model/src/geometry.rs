//! Points and display bounds.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// The display rectangle the cursor is confined to.
///
/// The origin is `(0, 0)`; valid cursor coordinates lie strictly inside
/// `(0, width)` and `(0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayBounds {
    pub width: f64,
    pub height: f64,
}

impl DisplayBounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Right edge.
    pub fn max_x(&self) -> f64 {
        self.width
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.height
    }

    /// Center of the display; the cursor starts here.
    pub fn center(&self) -> Point2D {
        Point2D::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether `x` lies strictly inside the horizontal extent.
    pub fn contains_x(&self, x: f64) -> bool {
        x > 0.0 && x < self.max_x()
    }

    /// Whether `y` lies strictly inside the vertical extent.
    pub fn contains_y(&self, y: f64) -> bool {
        y > 0.0 && y < self.max_y()
    }

    /// Whether a point lies strictly inside the display.
    pub fn contains(&self, point: Point2D) -> bool {
        self.contains_x(point.x) && self.contains_y(point.y)
    }
}

impl Default for DisplayBounds {
    fn default() -> Self {
        Self::new(640.0, 480.0)
    }
}
