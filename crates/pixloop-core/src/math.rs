use serde::{Deserialize, Serialize};

/// A 2D point in canvas space (pixel centers sit on integer coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An inclusive bounding box `[x0, y0, x1, y1]`, used by rectangle and
/// ellipse primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    /// Create a box from two corners. Corners are normalized so that
    /// `x0 <= x1` and `y0 <= y1`.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Box centered at `(cx, cy)` with half-extents `rx`, `ry`.
    pub fn centered(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self::new(cx - rx, cy - ry, cx + rx, cy + ry)
    }

    /// Square box around a circle of radius `r`.
    pub fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::centered(cx, cy, r, r)
    }

    pub fn center(&self) -> Point2D {
        Point2D::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    pub fn half_width(&self) -> f64 {
        (self.x1 - self.x0) / 2.0
    }

    pub fn half_height(&self) -> f64 {
        (self.y1 - self.y0) / 2.0
    }
}
