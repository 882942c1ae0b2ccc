//! Shared pass helpers: gradients, height-field silhouettes, shaded discs
//! and additive radial glow.

use pixloop_core::{Canvas, Point2D, Rgb};

use crate::animate::radial_falloff;

/// Shorthand for polygon and line vertices.
#[inline]
pub fn pt(x: f64, y: f64) -> Point2D {
    Point2D::new(x, y)
}

/// Paint every row with `top.lerp(bottom, y / H)`.
pub fn paint_vertical_gradient(canvas: &mut Canvas, top: Rgb, bottom: Rgb) {
    let h = canvas.height() as f64;
    canvas.fill_horizontal_band(0, canvas.height() as i32, |y| top.lerp(bottom, y as f64 / h));
}

/// One sine term of a [`HeightField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    pub amplitude: f64,
    pub freq: f64,
    pub phase: f64,
}

impl Wave {
    pub const fn new(amplitude: f64, freq: f64, phase: f64) -> Self {
        Self {
            amplitude,
            freq,
            phase,
        }
    }
}

/// Terrain silhouette `base + Σ amplitude·sin(x·freq + phase)`, evaluated
/// per column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightField {
    pub base: f64,
    pub waves: &'static [Wave],
}

impl HeightField {
    pub const fn new(base: f64, waves: &'static [Wave]) -> Self {
        Self { base, waves }
    }

    pub fn height_at(&self, x: f64) -> f64 {
        self.waves
            .iter()
            .fold(self.base, |h, w| h + (x * w.freq + w.phase).sin() * w.amplitude)
    }
}

/// Fill every pixel at or below the field's surface.
///
/// `color_fn` receives `t = (y - surface) / max(1, H - surface)`, i.e. 0 at
/// the surface growing toward 1 at the bottom edge.
pub fn paint_height_field<F>(canvas: &mut Canvas, field: &HeightField, mut color_fn: F)
where
    F: FnMut(f64) -> Rgb,
{
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    for x in 0..w {
        let surface = field.height_at(x as f64);
        let depth = (h as f64 - surface).max(1.0);
        for y in (surface as i32).max(0)..h {
            let t = (y as f64 - surface) / depth;
            canvas.set_pixel(x, y, color_fn(t));
        }
    }
}

/// Paint a disc of integer radius pixel by pixel, letting `shade` pick each
/// color from the offset `(dx, dy)` and its distance to the center.
pub fn shade_disc<F>(canvas: &mut Canvas, cx: i32, cy: i32, radius: i32, mut shade: F)
where
    F: FnMut(i32, i32, f64) -> Rgb,
{
    if radius < 0 {
        return;
    }
    let r = radius as f64;
    let (cx, cy, reach) = (cx as i64, cy as i64, radius as i64);
    for y in clipped_span(cy, reach, canvas.height()) {
        for x in clipped_span(cx, reach, canvas.width()) {
            let (dx, dy) = (x - cx, y - cy);
            let dist = offset_len(dx, dy);
            if dist <= r {
                // Both offsets are bounded by `radius`, so they fit in i32.
                canvas.set_pixel(x as i32, y as i32, shade(dx as i32, dy as i32, dist));
            }
        }
    }
}

/// Additively blend `tint` into a disc around `(cx, cy)` with alpha
/// `radial_falloff(dist, radius, k)`.
///
/// Reads the pixels already on the canvas, so it must run after whatever
/// it is meant to light up. Overlapping glows accumulate.
pub fn radial_glow(canvas: &mut Canvas, cx: i32, cy: i32, radius: f64, tint: Rgb, k: f64) {
    if radius.is_nan() || radius <= 0.0 {
        return;
    }
    let (cx, cy) = (cx as i64, cy as i64);
    let reach = radius as i64;
    for y in clipped_span(cy, reach, canvas.height()) {
        for x in clipped_span(cx, reach, canvas.width()) {
            let dist = offset_len(x - cx, y - cy);
            if dist < radius {
                let alpha = radial_falloff(dist, radius, k);
                canvas.blend_additive_pixel(x as i32, y as i32, tint, alpha);
            }
        }
    }
}

fn offset_len(dx: i64, dy: i64) -> f64 {
    let (dx, dy) = (dx as f64, dy as f64);
    (dx * dx + dy * dy).sqrt()
}

/// Canvas coordinates within `reach` of `center` along an axis of `len`
/// pixels. Empty when the span misses the canvas.
fn clipped_span(center: i64, reach: i64, len: u32) -> std::ops::RangeInclusive<i64> {
    let lo = center.saturating_sub(reach).max(0);
    let hi = center.saturating_add(reach).min(len as i64 - 1);
    lo..=hi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_gradient_rows() {
        let mut c = Canvas::new(4, 128);
        paint_vertical_gradient(&mut c, Rgb::new(5, 5, 20), Rgb::new(15, 5, 30));
        assert_eq!(c.get_pixel(0, 0), Some(Rgb::new(5, 5, 20)));
        assert_eq!(c.get_pixel(3, 64), Some(Rgb::new(10, 5, 25)));
        assert_eq!(c.get_pixel(0, 127), Some(Rgb::new(14, 5, 29)));
    }

    #[test]
    fn test_height_field_sum() {
        const WAVES: &[Wave] = &[Wave::new(10.0, 0.0, std::f64::consts::FRAC_PI_2)];
        let field = HeightField::new(70.0, WAVES);
        assert!((field.height_at(123.0) - 80.0).abs() < 1e-12);
        let flat = HeightField::new(90.0, &[]);
        assert_eq!(flat.height_at(5.0), 90.0);
    }

    #[test]
    fn test_height_field_paints_below_surface_only() {
        let mut c = Canvas::new(8, 16);
        let field = HeightField::new(10.0, &[]);
        paint_height_field(&mut c, &field, |_| Rgb::WHITE);
        assert_eq!(c.get_pixel(3, 9), Some(Rgb::BLACK));
        assert_eq!(c.get_pixel(3, 10), Some(Rgb::WHITE));
        assert_eq!(c.get_pixel(7, 15), Some(Rgb::WHITE));
    }

    #[test]
    fn test_height_field_gradient_parameter() {
        let mut c = Canvas::new(1, 20);
        let field = HeightField::new(10.0, &[]);
        paint_height_field(&mut c, &field, |t| Rgb::BLACK.lerp(Rgb::gray(100), t));
        assert_eq!(c.get_pixel(0, 10), Some(Rgb::BLACK));
        assert_eq!(c.get_pixel(0, 15), Some(Rgb::gray(50)));
    }

    #[test]
    fn test_shade_disc_covers_radius() {
        let mut c = Canvas::new(32, 32);
        shade_disc(&mut c, 16, 16, 3, |_, _, _| Rgb::RED);
        assert_eq!(c.get_pixel(16, 13), Some(Rgb::RED));
        assert_eq!(c.get_pixel(19, 16), Some(Rgb::RED));
        assert_eq!(c.get_pixel(19, 19), Some(Rgb::BLACK));
    }

    #[test]
    fn test_radial_glow_brightens_center_most() {
        let mut c = Canvas::solid(64, 64, Rgb::new(10, 10, 10));
        radial_glow(&mut c, 32, 32, 10.0, Rgb::new(255, 140, 30), 0.25);
        // alpha 0.25 at the center: 10 + 255*0.25 = 73.75
        assert_eq!(c.get_pixel(32, 32), Some(Rgb::new(73, 45, 17)));
        let near = c.get_pixel(35, 32).unwrap();
        assert!(near.r < 73 && near.r > 10);
        assert_eq!(c.get_pixel(42, 32), Some(Rgb::new(10, 10, 10)));
        assert_eq!(c.get_pixel(0, 0), Some(Rgb::new(10, 10, 10)));
    }

    #[test]
    fn test_radial_glow_off_canvas_is_noop() {
        let mut c = Canvas::new(16, 16);
        let before = c.clone();
        radial_glow(&mut c, 10_000, -10_000, 30.0, Rgb::WHITE, 1.0);
        radial_glow(&mut c, 8, 8, 0.0, Rgb::WHITE, 1.0);
        radial_glow(&mut c, 8, 8, f64::NAN, Rgb::WHITE, 1.0);
        assert_eq!(c, before);
    }

    #[test]
    fn test_extreme_centers_do_not_overflow() {
        let mut c = Canvas::new(16, 16);
        let before = c.clone();
        radial_glow(&mut c, i32::MIN, i32::MIN, 40.0, Rgb::WHITE, 1.0);
        radial_glow(&mut c, i32::MAX, 0, 1e12, Rgb::BLACK, 1.0);
        shade_disc(&mut c, i32::MIN, i32::MAX, 5, |_, _, _| Rgb::RED);
        assert_eq!(c, before);

        // A huge disc centred far away still reaches the canvas.
        shade_disc(&mut c, -1_000_000_000, 0, i32::MAX, |_, _, _| Rgb::RED);
        assert_eq!(c.get_pixel(0, 0), Some(Rgb::RED));
    }

    #[test]
    fn test_overlapping_glows_saturate() {
        let mut c = Canvas::new(16, 16);
        for _ in 0..8 {
            radial_glow(&mut c, 8, 8, 6.0, Rgb::WHITE, 1.0);
        }
        assert_eq!(c.get_pixel(8, 8), Some(Rgb::WHITE));
    }
}
