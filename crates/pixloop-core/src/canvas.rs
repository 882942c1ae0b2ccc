use crate::color::Rgb;
use crate::math::{BBox, Point2D};

/// Tolerance for inside-tests on exact shape boundaries.
const EDGE_EPSILON: f64 = 1e-9;

/// A fixed-size RGB8 raster, row-major, three bytes per pixel.
///
/// Every write is bounds-checked: coordinates outside `[0, width) x [0, height)`
/// are silently ignored. Entities routinely animate partly or fully
/// off-canvas, so this is the expected path, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create a new canvas filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * 3;
        Self {
            data: vec![0u8; size],
            width,
            height,
        }
    }

    /// Create a canvas filled with a solid color.
    pub fn solid(width: u32, height: u32, color: Rgb) -> Self {
        let mut canvas = Self::new(width, height);
        canvas.fill(color);
        canvas
    }

    /// Wrap an existing RGB8 buffer. Returns `None` when the length does not
    /// match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Total byte size of the pixel data.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Raw RGB8 bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the canvas and return its RGB8 bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 3
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgb) {
        for px in self.data.chunks_exact_mut(3) {
            px.copy_from_slice(&color.to_array());
        }
    }

    /// Read the pixel at `(x, y)`. Returns `None` if out of bounds.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let o = self.offset(x, y);
        Some(Rgb::new(self.data[o], self.data[o + 1], self.data[o + 2]))
    }

    /// Write the pixel at `(x, y)`. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if !self.in_bounds(x, y) {
            return;
        }
        let o = self.offset(x, y);
        self.data[o..o + 3].copy_from_slice(&color.to_array());
    }

    /// Write a pixel from floating-point coordinates, truncating toward zero.
    pub fn plot(&mut self, x: f64, y: f64, color: Rgb) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.set_pixel(x as i32, y as i32, color);
    }

    /// Additively blend `overlay * alpha` into the existing pixel.
    pub fn blend_additive_pixel(&mut self, x: i32, y: i32, overlay: Rgb, alpha: f64) {
        if let Some(existing) = self.get_pixel(x, y) {
            self.set_pixel(x, y, existing.blend_additive(overlay, alpha));
        }
    }

    /// Fill the inclusive span `[x0, x1]` of row `y`.
    fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: Rgb) {
        if y < 0 || y as u32 >= self.height || self.width == 0 {
            return;
        }
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let x0 = x0.max(0);
        let x1 = x1.min(self.width as i32 - 1);
        if x0 > x1 {
            return;
        }
        let start = self.offset(x0, y);
        let end = self.offset(x1, y) + 3;
        for px in self.data[start..end].chunks_exact_mut(3) {
            px.copy_from_slice(&color.to_array());
        }
    }

    /// Paint full-width rows `y0..y1` (half-open), each row colored by
    /// `color_fn(y)`. Used for vertical gradients.
    pub fn fill_horizontal_band<F>(&mut self, y0: i32, y1: i32, mut color_fn: F)
    where
        F: FnMut(i32) -> Rgb,
    {
        let y0 = y0.max(0);
        let y1 = y1.min(self.height as i32);
        for y in y0..y1 {
            let color = color_fn(y);
            self.fill_span(y, 0, self.width as i32 - 1, color);
        }
    }

    /// Integer pixel range covered by `[lo, hi]`, clipped to `[0, limit)`.
    fn covered(lo: f64, hi: f64, limit: u32) -> (i32, i32) {
        let lo = lo.ceil().max(0.0).min(limit as f64);
        let hi = hi.floor().min(limit as f64 - 1.0).max(-1.0);
        (lo as i32, hi as i32)
    }

    /// Fill an axis-aligned rectangle. Both corners are inclusive.
    pub fn fill_rect(&mut self, bbox: BBox, color: Rgb) {
        if !bbox_is_finite(&bbox) {
            return;
        }
        let (y0, y1) = Self::covered(bbox.y0, bbox.y1, self.height);
        let (x0, x1) = Self::covered(bbox.x0, bbox.x1, self.width);
        if x0 > x1 {
            return;
        }
        for y in y0..=y1 {
            self.fill_span(y, x0, x1, color);
        }
    }

    /// Visit every pixel whose center lies inside the ellipse inscribed in
    /// `bbox`. Shapes too small to contain a pixel center still cover the
    /// pixel under their center.
    fn for_each_in_ellipse<F>(&self, bbox: &BBox, mut visit: F)
    where
        F: FnMut(i32, i32),
    {
        if !bbox_is_finite(bbox) {
            return;
        }
        let c = bbox.center();
        let (rx, ry) = (bbox.half_width(), bbox.half_height());
        let (y0, y1) = Self::covered(bbox.y0, bbox.y1, self.height);
        let (x0, x1) = Self::covered(bbox.x0, bbox.x1, self.width);
        let mut any = false;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if ellipse_contains(c, rx, ry, x as f64, y as f64) {
                    visit(x, y);
                    any = true;
                }
            }
        }
        if !any && bbox.x1 - bbox.x0 < 1.0 && bbox.y1 - bbox.y0 < 1.0 {
            let (x, y) = (c.x as i32, c.y as i32);
            if self.in_bounds(x, y) {
                visit(x, y);
            }
        }
    }

    /// Fill the ellipse inscribed in `bbox`.
    pub fn fill_ellipse(&mut self, bbox: BBox, color: Rgb) {
        let mut hits = Vec::new();
        self.for_each_in_ellipse(&bbox, |x, y| hits.push((x, y)));
        for (x, y) in hits {
            self.set_pixel(x, y, color);
        }
    }

    /// Pixels of the ellipse interior that touch the outside through a
    /// 4-neighbour.
    fn ellipse_outline(&self, bbox: &BBox) -> Vec<(i32, i32)> {
        let c = bbox.center();
        let (rx, ry) = (bbox.half_width(), bbox.half_height());
        let mut outline = Vec::new();
        self.for_each_in_ellipse(bbox, |x, y| {
            let edge = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .iter()
                .any(|(dx, dy)| !ellipse_contains(c, rx, ry, (x + dx) as f64, (y + dy) as f64));
            if edge {
                outline.push((x, y));
            }
        });
        outline
    }

    /// Draw a one-pixel outline of the ellipse inscribed in `bbox`.
    pub fn draw_ellipse_outline(&mut self, bbox: BBox, color: Rgb) {
        for (x, y) in self.ellipse_outline(&bbox) {
            self.set_pixel(x, y, color);
        }
    }

    /// Draw part of an ellipse outline between two angles in degrees.
    ///
    /// Angles are measured clockwise from 3 o'clock because the y axis points
    /// down, so `0..180` is the lower half.
    pub fn draw_arc(&mut self, bbox: BBox, start_deg: f64, end_deg: f64, color: Rgb) {
        let c = bbox.center();
        let (rx, ry) = (bbox.half_width().max(EDGE_EPSILON), bbox.half_height().max(EDGE_EPSILON));
        let start = start_deg.rem_euclid(360.0);
        let mut end = end_deg.rem_euclid(360.0);
        if end_deg - start_deg >= 360.0 {
            end = start + 360.0;
        } else if end < start {
            end += 360.0;
        }
        for (x, y) in self.ellipse_outline(&bbox) {
            let angle = ((y as f64 - c.y) / ry)
                .atan2((x as f64 - c.x) / rx)
                .to_degrees()
                .rem_euclid(360.0);
            let in_range = (angle >= start - EDGE_EPSILON && angle <= end + EDGE_EPSILON)
                || (angle + 360.0 >= start && angle + 360.0 <= end + EDGE_EPSILON);
            if in_range {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Draw a line from `p0` to `p1`. `width > 1` strokes parallel offset
    /// lines across the perpendicular.
    pub fn draw_line(&mut self, p0: Point2D, p1: Point2D, color: Rgb, width: u32) {
        if width <= 1 {
            self.draw_thin_line(p0, p1, color);
            return;
        }
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let len = dx.hypot(dy);
        if !len.is_finite() {
            return;
        }
        if len < 1e-3 {
            let r = (width as f64 - 1.0) / 2.0;
            self.fill_ellipse(BBox::circle(p0.x, p0.y, r), color);
            return;
        }
        let (nx, ny) = (-dy / len, dx / len);
        let half = (width as f64 - 1.0) / 2.0;
        for i in 0..width {
            let offset = i as f64 - half;
            let (ox, oy) = (nx * offset, ny * offset);
            self.draw_thin_line(
                Point2D::new(p0.x + ox, p0.y + oy),
                Point2D::new(p1.x + ox, p1.y + oy),
                color,
            );
        }
    }

    /// Bresenham over truncated endpoints, clipped to the canvas first so
    /// far-away endpoints do not cost a long walk.
    fn draw_thin_line(&mut self, p0: Point2D, p1: Point2D, color: Rgb) {
        let Some((a, b)) = clip_line(p0, p1, self.width as f64, self.height as f64) else {
            return;
        };
        let (mut x, mut y) = (a.x as i32, a.y as i32);
        let (x1, y1) = (b.x as i32, b.y as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Fill a polygon using an even-odd scanline test at pixel centers,
    /// then stroke its edges so slivers thinner than a pixel still show.
    pub fn fill_polygon(&mut self, points: &[Point2D], color: Rgb) {
        if points.is_empty() || points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return;
        }
        if points.len() < 3 {
            let last = points[points.len() - 1];
            self.draw_thin_line(points[0], last, color);
            return;
        }

        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let (y0, y1) = Self::covered(min_y, max_y, self.height);

        let n = points.len();
        let mut crossings: Vec<f64> = Vec::with_capacity(n);
        for y in y0..=y1 {
            crossings.clear();
            let yf = y as f64;
            for i in 0..n {
                let a = points[i];
                let b = points[(i + 1) % n];
                if (a.y <= yf && b.y > yf) || (b.y <= yf && a.y > yf) {
                    crossings.push(a.x + (yf - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks_exact(2) {
                let (x0, x1) = Self::covered(pair[0], pair[1], self.width);
                if x0 <= x1 {
                    self.fill_span(y, x0, x1, color);
                }
            }
        }

        for i in 0..n {
            self.draw_thin_line(points[i], points[(i + 1) % n], color);
        }
    }
}

fn bbox_is_finite(b: &BBox) -> bool {
    b.x0.is_finite() && b.y0.is_finite() && b.x1.is_finite() && b.y1.is_finite()
}

/// Inside-test for an axis-aligned ellipse. A zero radius degenerates to a
/// one-pixel-wide line through the center.
fn ellipse_contains(c: Point2D, rx: f64, ry: f64, x: f64, y: f64) -> bool {
    let norm = |d: f64, r: f64| -> Option<f64> {
        if r > EDGE_EPSILON {
            Some(d / r)
        } else if d.abs() <= 0.5 {
            Some(0.0)
        } else {
            None
        }
    };
    match (norm(x - c.x, rx), norm(y - c.y, ry)) {
        (Some(nx), Some(ny)) => nx * nx + ny * ny <= 1.0 + EDGE_EPSILON,
        _ => false,
    }
}

/// Liang-Barsky clip of a segment against `[0, w) x [0, h)` (with a one
/// pixel margin so truncation at the far edge still lands on-canvas).
fn clip_line(p0: Point2D, p1: Point2D, w: f64, h: f64) -> Option<(Point2D, Point2D)> {
    if !(p0.x.is_finite() && p0.y.is_finite() && p1.x.is_finite() && p1.y.is_finite()) {
        return None;
    }
    let (xmin, ymin, xmax, ymax) = (-1.0, -1.0, w, h);
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [
        (-dx, p0.x - xmin),
        (dx, xmax - p0.x),
        (-dy, p0.y - ymin),
        (dy, ymax - p0.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((
        Point2D::new(p0.x + t0 * dx, p0.y + t0 * dy),
        Point2D::new(p0.x + t1 * dx, p0.y + t1 * dy),
    ))
}
