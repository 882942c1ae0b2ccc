//! A snowy night: moon halo, hills, a cabin with a glowing window, a
//! bobbing snowman and drifting snowflakes.

use serde::Serialize;

use pixloop_core::{BBox, Canvas, PixloopResult, RenderSettings, Rgb};

use crate::animate::{self, Animate};
use crate::compositor::{DrawPass, PassKind, Scene};
use crate::entity::{EntitySet, SeedSource};
use crate::paint::{self, pt, HeightField, Wave};

const W: f64 = 128.0;
const H: f64 = 128.0;

const SKY_TOP: Rgb = Rgb::new(15, 15, 50);
const SKY_BOTTOM: Rgb = Rgb::new(40, 40, 80);
const MOON: Rgb = Rgb::new(220, 220, 235);
const ROOF_SNOW: Rgb = Rgb::new(215, 225, 240);
const COAL: Rgb = Rgb::new(20, 20, 20);
const SCARF: Rgb = Rgb::new(200, 40, 40);
const STICK: Rgb = Rgb::new(80, 50, 30);
const WINDOW_FRAME: Rgb = Rgb::new(80, 50, 25);
const WINDOW_GLOW: Rgb = Rgb::new(255, 200, 80);

const HILLS: HeightField =
    HeightField::new(75.0, &[Wave::new(10.0, 0.03, 0.0), Wave::new(5.0, 0.07, 2.0)]);
const GROUND: HeightField = HeightField::new(95.0, &[Wave::new(3.0, 0.05, 0.0)]);

/// `(x, height)` of each pine.
const PINES: [(f64, i32); 6] = [
    (8.0, 28),
    (20.0, 35),
    (55.0, 22),
    (65.0, 30),
    (112.0, 32),
    (120.0, 25),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snowflake {
    pub x: i32,
    pub y: i32,
    pub speed: f64,
    pub size: i32,
    pub drift: f64,
}

impl Snowflake {
    /// Vertical travel loops over the canvas plus this many rows.
    const FALL_SLACK: f64 = 30.0;
    const FALL_MARGIN: f64 = 15.0;
}

impl Animate for Snowflake {
    type State = (f64, f64);

    fn state_at(&self, frame: u64) -> (f64, f64) {
        let y = animate::wrap(
            self.y as f64,
            frame,
            self.speed * 2.0,
            H + Self::FALL_SLACK,
            Self::FALL_MARGIN,
        );
        let wobble = animate::sway(self.x as f64, frame, 0.1, self.x as f64, 3.0);
        let x = animate::wrap(wobble, frame, self.drift, W, 0.0);
        (x, y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Star {
    pub x: i32,
    pub y: i32,
    pub speed: f64,
}

impl Animate for Star {
    type State = Rgb;

    fn state_at(&self, frame: u64) -> Rgb {
        let b = animate::pulse_between(frame, self.speed, self.x as f64 * 0.5, 55.0, 255.0) as u8;
        Rgb::new(b, b, b.saturating_add(20))
    }
}

#[derive(Debug)]
pub struct Snow {
    settings: RenderSettings,
    snowflakes: EntitySet<Snowflake>,
    stars: EntitySet<Star>,
}

impl Snow {
    pub fn snowflakes(&self) -> &EntitySet<Snowflake> {
        &self.snowflakes
    }

    fn draw_sky(&self, canvas: &mut Canvas, _frame: u64) {
        paint::paint_vertical_gradient(canvas, SKY_TOP, SKY_BOTTOM);
    }

    fn draw_stars(&self, canvas: &mut Canvas, frame: u64) {
        for star in &self.stars {
            canvas.set_pixel(star.x, star.y, star.state_at(frame));
        }
    }

    fn draw_moon(&self, canvas: &mut Canvas, _frame: u64) {
        let (mx, my) = (105.0, 18.0);
        for r in (9..=15).rev() {
            let t = (r - 8) as f64 / 7.0;
            let halo = Rgb::new(200, 200, 220).lerp(Rgb::new(40, 40, 70), t);
            canvas.fill_ellipse(BBox::circle(mx, my, r as f64), halo);
        }
        canvas.fill_ellipse(BBox::circle(mx, my, 8.0), MOON);
        canvas.fill_ellipse(
            BBox::new(mx - 4.0, my - 8.0, mx + 10.0, my + 8.0),
            MOON.lerp(SKY_TOP, 0.7),
        );
    }

    fn draw_hills(&self, canvas: &mut Canvas, _frame: u64) {
        let (top, bottom) = (Rgb::new(200, 210, 230), Rgb::new(180, 190, 210));
        paint::paint_height_field(canvas, &HILLS, |t| top.lerp(bottom, t));
    }

    fn draw_ground(&self, canvas: &mut Canvas, _frame: u64) {
        let (top, bottom) = (Rgb::new(220, 225, 240), Rgb::new(200, 205, 220));
        paint::paint_height_field(canvas, &GROUND, |t| top.lerp(bottom, t));
    }

    fn draw_smoke(&self, canvas: &mut Canvas, frame: u64) {
        for i in 0..8 {
            let t = i as f64 / 7.0;
            let x = animate::sway(90.0, frame, 0.1, i as f64 * 0.8, 3.0 + t * 5.0);
            let y = 60.0 - i as f64 * 4.0;
            let r = 2.0 + t * 3.0;
            let color = Rgb::new(40, 40, 80).lerp(Rgb::new(150, 150, 170), (1.0 - t) * 0.5);
            canvas.fill_ellipse(BBox::circle(x, y, r), color);
        }
    }

    fn draw_pines(&self, canvas: &mut Canvas, _frame: u64) {
        for (x, height) in PINES {
            draw_pine(canvas, x, height);
        }
    }

    fn draw_cabin(&self, canvas: &mut Canvas, frame: u64) {
        let (cx, cy) = (82.0, 82.0);
        canvas.fill_rect(BBox::centered(cx, cy, 12.0, 10.0), Rgb::new(100, 60, 30));
        for i in 0..5 {
            let y = cy - 8.0 + i as f64 * 4.0;
            canvas.draw_line(pt(cx - 12.0, y), pt(cx + 12.0, y), Rgb::new(80, 45, 20), 1);
        }
        canvas.fill_polygon(
            &[pt(cx - 15.0, cy - 10.0), pt(cx, cy - 22.0), pt(cx + 15.0, cy - 10.0)],
            Rgb::new(120, 70, 35),
        );
        canvas.fill_polygon(
            &[pt(cx - 14.0, cy - 11.0), pt(cx, cy - 22.0), pt(cx + 14.0, cy - 11.0)],
            ROOF_SNOW,
        );

        canvas.fill_rect(BBox::new(cx - 3.0, cy + 2.0, cx + 3.0, cy + 10.0), Rgb::new(70, 40, 15));
        canvas.plot(cx + 2.0, cy + 6.0, Rgb::new(200, 180, 50));

        let brightness = animate::pulse_between(frame, 0.15, 0.0, 0.6, 1.0);
        let glow = WINDOW_GLOW.scale(brightness);
        for (x0, x1) in [(cx + 5.0, cx + 10.0), (cx - 10.0, cx - 5.0)] {
            canvas.fill_rect(BBox::new(x0, cy - 5.0, x1, cy), glow);
            canvas.draw_line(pt(x0, cy - 2.5), pt(x1, cy - 2.5), WINDOW_FRAME, 1);
            let mid = (x0 + x1) / 2.0;
            canvas.draw_line(pt(mid, cy - 5.0), pt(mid, cy), WINDOW_FRAME, 1);
        }

        canvas.fill_rect(
            BBox::new(cx + 6.0, cy - 22.0, cx + 10.0, cy - 15.0),
            Rgb::new(140, 80, 50),
        );
        canvas.fill_rect(BBox::new(cx + 5.0, cy - 23.0, cx + 11.0, cy - 21.0), ROOF_SNOW);
    }

    fn draw_snowman(&self, canvas: &mut Canvas, frame: u64) {
        let (sx, sy) = (42.0, 98.0);
        let bob = animate::sway(0.0, frame, 0.1, 0.0, 0.5);
        // Feature rows snap to whole pixels.
        let row = |dy: f64| (sy + dy + bob).trunc();

        canvas.fill_ellipse(
            BBox::new(sx - 7.0, sy - 5.0 + bob, sx + 7.0, sy + 7.0 + bob),
            Rgb::new(230, 235, 245),
        );
        canvas.fill_ellipse(
            BBox::new(sx - 5.0, sy - 12.0 + bob, sx + 5.0, sy - 2.0 + bob),
            Rgb::new(235, 240, 248),
        );
        canvas.fill_ellipse(
            BBox::new(sx - 4.0, sy - 19.0 + bob, sx + 4.0, sy - 11.0 + bob),
            Rgb::new(240, 242, 250),
        );

        canvas.plot(sx - 2.0, row(-16.0), COAL);
        canvas.plot(sx + 2.0, row(-16.0), COAL);
        canvas.draw_line(pt(sx, row(-14.0)), pt(sx + 3.0, row(-14.0)), Rgb::new(240, 140, 40), 1);
        for i in 0..3 {
            canvas.plot(sx - 1.0 + i as f64, row(-12.0), COAL);
            canvas.plot(sx, row(-9.0 + i as f64 * 3.0), COAL);
        }

        let hat_y = row(-19.0);
        canvas.fill_rect(BBox::new(sx - 5.0, hat_y - 1.0, sx + 5.0, hat_y), Rgb::new(30, 30, 40));
        canvas.fill_rect(
            BBox::new(sx - 3.0, hat_y - 7.0, sx + 3.0, hat_y - 1.0),
            Rgb::new(30, 30, 40),
        );

        canvas.draw_line(pt(sx - 5.0, row(-11.0)), pt(sx + 5.0, row(-11.0)), SCARF, 2);
        canvas.draw_line(pt(sx + 4.0, row(-11.0)), pt(sx + 6.0, row(-8.0)), SCARF, 2);

        canvas.draw_line(pt(sx - 5.0, row(-8.0)), pt(sx - 12.0, row(-14.0)), STICK, 1);
        canvas.draw_line(pt(sx + 5.0, row(-8.0)), pt(sx + 12.0, row(-14.0)), STICK, 1);
    }

    fn draw_snowflakes(&self, canvas: &mut Canvas, frame: u64) {
        for flake in &self.snowflakes {
            let (x, y) = flake.state_at(frame);
            let (px, py) = (x as i32, y as i32);
            if !(0..W as i32).contains(&px) || !(0..H as i32).contains(&py) {
                continue;
            }
            if flake.size <= 1 {
                canvas.set_pixel(px, py, Rgb::new(230, 235, 250));
            } else {
                let half = flake.size as f64 / 2.0;
                canvas.fill_ellipse(BBox::circle(x, y, half), Rgb::new(220, 230, 248));
            }
        }
    }
}

/// A snow-laden pine rooted on the ground line below `x`.
fn draw_pine(canvas: &mut Canvas, x: f64, height: i32) {
    const TRUNK: f64 = 5.0;
    let base_y = 95.0 + ((x * 0.05).sin() * 3.0).trunc();
    canvas.fill_rect(BBox::new(x - 1.0, base_y - TRUNK, x + 1.0, base_y), Rgb::new(80, 50, 30));

    let layers = height / 7;
    for i in 0..layers {
        let t = i as f64 / (layers - 1).max(1) as f64;
        let ly = base_y - TRUNK - i as f64 * 7.0;
        let w = ((1.0 - t * 0.6) * 10.0).trunc();
        canvas.fill_polygon(
            &[pt(x - w, ly), pt(x, ly - 8.0), pt(x + w, ly)],
            Rgb::new(20, 60 + i as u8 * 10, 30),
        );
        canvas.fill_polygon(
            &[pt(x - w + 2.0, ly - 1.0), pt(x, ly - 8.0), pt(x + w - 2.0, ly - 1.0)],
            Rgb::new(220, 230, 245),
        );
        canvas.draw_line(pt(x - w + 1.0, ly), pt(x + w - 1.0, ly), Rgb::new(210, 220, 235), 1);
    }
}

impl Scene for Snow {
    const NAME: &'static str = "snow";

    const PASSES: &'static [DrawPass<Self>] = &[
        DrawPass {
            name: "sky",
            kind: PassKind::Backdrop,
            draw: Self::draw_sky,
        },
        DrawPass {
            name: "stars",
            kind: PassKind::Entities,
            draw: Self::draw_stars,
        },
        DrawPass {
            name: "moon",
            kind: PassKind::Structure,
            draw: Self::draw_moon,
        },
        DrawPass {
            name: "hills",
            kind: PassKind::Backdrop,
            draw: Self::draw_hills,
        },
        DrawPass {
            name: "ground",
            kind: PassKind::Backdrop,
            draw: Self::draw_ground,
        },
        DrawPass {
            name: "smoke",
            kind: PassKind::Entities,
            draw: Self::draw_smoke,
        },
        DrawPass {
            name: "pines",
            kind: PassKind::Structure,
            draw: Self::draw_pines,
        },
        DrawPass {
            name: "cabin",
            kind: PassKind::Structure,
            draw: Self::draw_cabin,
        },
        DrawPass {
            name: "snowman",
            kind: PassKind::Structure,
            draw: Self::draw_snowman,
        },
        DrawPass {
            name: "snowflakes",
            kind: PassKind::Entities,
            draw: Self::draw_snowflakes,
        },
    ];

    fn build(settings: &RenderSettings) -> PixloopResult<Self> {
        let mut source = SeedSource::entity(settings.entity_seed);

        let snowflakes = EntitySet::generate("snowflakes", 60, &mut source, |_, s| Snowflake {
            x: s.int_in(0, 127),
            y: s.int_in(-128, 127),
            speed: s.uniform(0.5, 1.8),
            size: s.int_in(1, 3),
            drift: s.uniform(-0.3, 0.3),
        })?;
        let stars = EntitySet::generate("stars", 40, &mut source, |_, s| Star {
            x: s.int_in(0, 127),
            y: s.int_in(0, 45),
            speed: s.uniform(0.1, 0.4),
        })?;

        Ok(Self {
            settings: settings.clone(),
            snowflakes,
            stars,
        })
    }

    fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn entity_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (self.snowflakes.name(), self.snowflakes.len()),
            (self.stars.name(), self.stars.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::Compositor;

    #[test]
    fn test_snowflake_falls_then_reenters_from_top() {
        let flake = Snowflake {
            x: 10,
            y: 140,
            speed: 1.0,
            size: 1,
            drift: 0.0,
        };
        // (140 + 0) mod 158 - 15 = 125, then two rows per frame.
        assert_eq!(flake.state_at(0).1, 125.0);
        assert_eq!(flake.state_at(1).1, 127.0);
        // frame 9: (140 + 18) mod 158 = 0 -> just above the canvas.
        assert_eq!(flake.state_at(9).1, -15.0);
    }

    #[test]
    fn test_snowflake_x_stays_on_canvas() {
        let flake = Snowflake {
            x: 127,
            y: 0,
            speed: 1.8,
            size: 3,
            drift: -0.3,
        };
        for frame in 0..10_000 {
            let (x, _) = flake.state_at(frame);
            assert!((0.0..=W).contains(&x));
        }
    }

    #[test]
    fn test_star_brightness_range() {
        let star = Star {
            x: 17,
            y: 3,
            speed: 0.33,
        };
        for frame in 0..10_000 {
            let c = star.state_at(frame);
            assert!(c.r >= 55);
            assert_eq!(c.b, c.r.saturating_add(20));
        }
    }

    #[test]
    fn test_window_glow_pulses() {
        let comp = Compositor::new(Snow::build(&RenderSettings::default()).unwrap());
        // Window pixel away from the frame cross and any falling snow is
        // checked right after the cabin pass.
        let a = comp.render_frame_until(0, "cabin").unwrap();
        let b = comp.render_frame_until(10, "cabin").unwrap();
        let (pa, pb) = (a.get_pixel(88, 78).unwrap(), b.get_pixel(88, 78).unwrap());
        // Mid-pulse at frame 0: 80% of the lamp color.
        let mid = animate::pulse_between(0, 0.15, 0.0, 0.6, 1.0);
        assert_eq!(pa, WINDOW_GLOW.scale(mid));
        assert!((203..=204).contains(&pa.r) && (159..=160).contains(&pa.g));
        assert_ne!(pa, pb);
    }

    #[test]
    fn test_entity_counts() {
        let scene = Snow::build(&RenderSettings::default()).unwrap();
        assert_eq!(scene.entity_counts(), vec![("snowflakes", 60), ("stars", 40)]);
    }
}
