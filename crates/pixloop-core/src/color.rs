use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Truncate a channel value into `[0, 255]`.
#[inline]
fn channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

impl Rgb {
    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a gray with all channels set to `v`.
    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Channels as an array, in R, G, B order.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Linearly interpolate between two colors.
    ///
    /// `t` is clamped to `[0, 1]` before use, so extrapolated inputs
    /// saturate at either endpoint. Channels are truncated, not rounded.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| channel(a as f64 + (b as f64 - a as f64) * t);
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Pixel-additive blend: `self + overlay * alpha`, per channel, clamped.
    ///
    /// This is not alpha-over compositing. Overlapping glows accumulate and
    /// can saturate to white.
    pub fn blend_additive(self, overlay: Rgb, alpha: f64) -> Rgb {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.max(0.0) };
        let add = |e: u8, o: u8| channel(e as f64 + o as f64 * alpha);
        Rgb {
            r: add(self.r, overlay.r),
            g: add(self.g, overlay.g),
            b: add(self.b, overlay.b),
        }
    }

    /// Multiply every channel by `factor` (shading), clamped.
    pub fn scale(self, factor: f64) -> Rgb {
        let mul = |c: u8| channel(c as f64 * factor);
        Rgb {
            r: mul(self.r),
            g: mul(self.g),
            b: mul(self.b),
        }
    }

    /// Subtract `delta` from every channel, saturating at zero.
    pub fn darken(self, delta: u8) -> Rgb {
        Rgb {
            r: self.r.saturating_sub(delta),
            g: self.g.saturating_sub(delta),
            b: self.b.saturating_sub(delta),
        }
    }

    // --- Named constants ---

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rgb::new(5, 5, 20);
        let b = Rgb::new(15, 5, 30);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(10, 5, 25));
    }

    #[test]
    fn test_lerp_truncates() {
        // 0 + 255 * 0.999 = 254.745, truncated to 254
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 0.999), Rgb::gray(254));
    }

    #[test]
    fn test_lerp_clamps_t() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(a.lerp(b, -3.0), a);
        assert_eq!(a.lerp(b, 7.5), b);
        assert_eq!(a.lerp(b, f64::NAN), a);
    }

    #[test]
    fn test_blend_additive_basic() {
        let out = Rgb::new(10, 10, 10).blend_additive(Rgb::new(100, 50, 0), 0.5);
        assert_eq!(out, Rgb::new(60, 35, 10));
    }

    #[test]
    fn test_blend_additive_saturates() {
        let out = Rgb::new(200, 200, 200).blend_additive(Rgb::new(255, 140, 30), 4.0);
        assert_eq!(out, Rgb::new(255, 255, 255));
        let out = Rgb::WHITE.blend_additive(Rgb::WHITE, f64::MAX);
        assert_eq!(out, Rgb::WHITE);
    }

    #[test]
    fn test_blend_additive_negative_alpha_is_noop() {
        let c = Rgb::new(40, 50, 60);
        assert_eq!(c.blend_additive(Rgb::WHITE, -2.0), c);
    }

    #[test]
    fn test_scale_and_darken() {
        assert_eq!(Rgb::new(20, 60, 180).scale(0.6), Rgb::new(12, 36, 108));
        assert_eq!(Rgb::new(200, 200, 200).scale(2.0), Rgb::WHITE);
        assert_eq!(Rgb::new(30, 50, 10).darken(40), Rgb::new(0, 10, 0));
    }

    #[test]
    fn test_color_display() {
        assert_eq!(format!("{}", Rgb::RED), "#FF0000");
        assert_eq!(format!("{}", Rgb::new(255, 140, 30)), "#FF8C1E");
    }
}
