//! Closed-form per-frame animation.
//!
//! Every function here is pure and total over `u64` frame indices, so any
//! frame can be rendered in isolation, out of order, or on another thread.

/// Maps an immutable record and a frame index to a transient render state.
pub trait Animate {
    type State: Copy;

    fn state_at(&self, frame: u64) -> Self::State;
}

#[inline]
fn t(frame: u64) -> f64 {
    frame as f64
}

/// Twinkle value in `[0, 1]`: `(sin(frame*speed + phase) + 1) / 2`.
pub fn pulse(frame: u64, speed: f64, phase: f64) -> f64 {
    ((t(frame) * speed + phase).sin() + 1.0) / 2.0
}

/// [`pulse`] mapped linearly onto `[lo, hi]`.
pub fn pulse_between(frame: u64, speed: f64, phase: f64, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * pulse(frame, speed, phase)
}

/// Modular drift: `(start + frame*speed) mod period - margin`.
///
/// Uses the Euclidean remainder so negative speeds wrap the same way as
/// positive ones. The result lies in `[-margin, period - margin)`.
pub fn wrap(start: f64, frame: u64, speed: f64, period: f64, margin: f64) -> f64 {
    if period <= 0.0 {
        return start - margin;
    }
    (start + t(frame) * speed).rem_euclid(period) - margin
}

/// Lateral oscillation around `base`.
pub fn sway(base: f64, frame: u64, freq: f64, phase: f64, amplitude: f64) -> f64 {
    base + (t(frame) * freq + phase).sin() * amplitude
}

/// Position within a repeating cycle, or `None` while the entity is hidden.
///
/// `position mod period` is visible while it is at most `visible`.
pub fn cyclic_window(position: f64, period: f64, visible: f64) -> Option<f64> {
    if period <= 0.0 {
        return None;
    }
    let p = position.rem_euclid(period);
    (p <= visible).then_some(p)
}

/// `base * (0.8 + sin(frame*freq) * 0.2)`
pub fn pulsing_radius(base: f64, frame: u64, freq: f64) -> f64 {
    base * (0.8 + (t(frame) * freq).sin() * 0.2)
}

/// Radial glow falloff `(1 - dist/radius)^2 * k`, zero at or beyond `radius`.
pub fn radial_falloff(dist: f64, radius: f64, k: f64) -> f64 {
    if radius <= 0.0 || dist >= radius {
        return 0.0;
    }
    let u = 1.0 - dist / radius;
    u * u * k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_bounds_for_large_frames() {
        for frame in (0..10_000).chain([1 << 20, 1 << 40, u64::MAX / 3]) {
            let v = pulse(frame, 0.37, 12.0);
            assert!((0.0..=1.0).contains(&v), "pulse({frame}) = {v}");
            let b = pulse_between(frame, 0.2, 1.0, 40.0, 220.0);
            assert!((40.0..=220.0).contains(&b));
        }
    }

    #[test]
    fn test_pulse_known_values() {
        assert!((pulse(0, 1.0, 0.0) - 0.5).abs() < 1e-12);
        let quarter = std::f64::consts::FRAC_PI_2;
        assert!((pulse(1, quarter, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_range() {
        for frame in 0..10_000 {
            let y = wrap(-64.0, frame, 3.1, 158.0, 15.0);
            assert!((-15.0..=143.0).contains(&y));
            let x = wrap(40.0, frame, -1.3, 148.0, 10.0);
            assert!((-10.0..=138.0).contains(&x));
        }
    }

    #[test]
    fn test_wrap_subtracts_exactly_one_period() {
        let (speed, period) = (2.0, 158.0);
        let mut prev = wrap(0.0, 0, speed, period, 15.0);
        let mut wraps = 0;
        for frame in 1..500 {
            let y = wrap(0.0, frame, speed, period, 15.0);
            let step = y - prev;
            if (step - speed).abs() > 1e-9 {
                assert!((step - (speed - period)).abs() < 1e-9, "bad step {step}");
                wraps += 1;
            }
            prev = y;
        }
        // 2 * 499 = 998 px of travel crosses the 158 px loop six times.
        assert_eq!(wraps, 6);
    }

    #[test]
    fn test_wrap_negative_speed() {
        // Rising from y=10 at 1 px/frame in a 148 px loop.
        assert_eq!(wrap(10.0, 0, -1.0, 148.0, 0.0), 10.0);
        assert_eq!(wrap(10.0, 11, -1.0, 148.0, 0.0), 147.0);
    }

    #[test]
    fn test_sway_amplitude() {
        for frame in 0..200 {
            let x = sway(75.0, frame, 0.08, 0.0, 5.0);
            assert!((70.0..=80.0).contains(&x));
        }
        assert_eq!(sway(75.0, 0, 0.08, 0.0, 5.0), 75.0);
    }

    #[test]
    fn test_cyclic_window() {
        assert_eq!(cyclic_window(0.0, 60.0, 40.0), Some(0.0));
        assert_eq!(cyclic_window(40.0, 60.0, 40.0), Some(40.0));
        assert_eq!(cyclic_window(41.0, 60.0, 40.0), None);
        assert_eq!(cyclic_window(61.0, 60.0, 40.0), Some(1.0));
        assert_eq!(cyclic_window(5.0, 0.0, 40.0), None);
        let p = cyclic_window(3.9, 1.0, 0.7);
        assert!(p.is_none());
    }

    #[test]
    fn test_pulsing_radius_bounds() {
        for frame in 0..1000 {
            let r = pulsing_radius(35.0, frame, 0.3);
            assert!(r >= 35.0 * 0.6 - 1e-9 && r <= 35.0 + 1e-9);
        }
        assert!((pulsing_radius(35.0, 0, 0.3) - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_radial_falloff() {
        assert_eq!(radial_falloff(0.0, 10.0, 0.25), 0.25);
        assert!((radial_falloff(5.0, 10.0, 1.0) - 0.25).abs() < 1e-12);
        assert_eq!(radial_falloff(10.0, 10.0, 1.0), 0.0);
        assert_eq!(radial_falloff(50.0, 10.0, 1.0), 0.0);
        assert_eq!(radial_falloff(0.0, 0.0, 1.0), 0.0);
    }
}
