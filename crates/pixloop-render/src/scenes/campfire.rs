//! A campfire night: twinkling stars, layered mountains, a pulsing fire
//! glow, rising sparks and fireflies.

use serde::Serialize;

use pixloop_core::{BBox, Canvas, PixloopResult, RenderSettings, Rgb};

use crate::animate::{self, Animate};
use crate::compositor::{DrawPass, PassKind, Scene};
use crate::entity::{EntitySet, SeedSource};
use crate::paint::{self, pt, HeightField, Wave};

const SKY_TOP: Rgb = Rgb::new(5, 5, 25);
const SKY_BOTTOM: Rgb = Rgb::new(15, 15, 40);

const FIRE_X: f64 = 64.0;
const FIRE_Y: f64 = 88.0;
const FIRE_GLOW_TINT: Rgb = Rgb::new(255, 140, 30);

const FAR_MOUNTAINS: HeightField =
    HeightField::new(55.0, &[Wave::new(15.0, 0.02, 0.0), Wave::new(8.0, 0.05, 1.0)]);
const NEAR_MOUNTAINS: HeightField =
    HeightField::new(70.0, &[Wave::new(10.0, 0.03, 2.0), Wave::new(5.0, 0.06, 0.0)]);
const GROUND: HeightField = HeightField::new(90.0, &[Wave::new(2.0, 0.04, 0.0)]);

const TREES: [(f64, f64); 6] = [
    (5.0, 60.0),
    (15.0, 55.0),
    (25.0, 58.0),
    (100.0, 57.0),
    (110.0, 53.0),
    (120.0, 60.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Star {
    pub x: i32,
    pub y: i32,
    pub speed: f64,
}

impl Animate for Star {
    type State = Rgb;

    fn state_at(&self, frame: u64) -> Rgb {
        let twinkle = animate::pulse(frame, self.speed, (self.x + self.y) as f64);
        let b = (twinkle * 180.0 + 40.0) as u8;
        Rgb::new(b, b, b.saturating_add(15))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Firefly {
    pub x: i32,
    pub y: i32,
    pub speed: f64,
    pub phase: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glimmer {
    pub x: f64,
    pub y: f64,
    pub brightness: f64,
}

impl Animate for Firefly {
    type State = Glimmer;

    fn state_at(&self, frame: u64) -> Glimmer {
        let f = frame as f64;
        Glimmer {
            x: animate::sway(self.x as f64, frame, self.speed, self.phase * 10.0, 10.0),
            y: self.y as f64 + (f * self.speed * 0.7 + self.phase * 5.0).cos() * 8.0,
            brightness: animate::pulse(frame, self.speed * 2.0, self.phase * 3.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spark {
    pub dx: f64,
    /// Drawn with the record but not used by the motion.
    pub speed: f64,
    pub phase: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ember {
    pub x: f64,
    pub y: f64,
    pub brightness: f64,
}

impl Spark {
    /// Sparks are visible for the first 70% of each unit cycle.
    const VISIBLE: f64 = 0.7;
    const ORIGIN_Y: f64 = 85.0;
    /// Height climbed over one full cycle.
    const RISE: f64 = 30.0;
}

impl Animate for Spark {
    type State = Option<Ember>;

    fn state_at(&self, frame: u64) -> Option<Ember> {
        let t = animate::cyclic_window(frame as f64 * 0.08 + self.phase, 1.0, Self::VISIBLE)?;
        Some(Ember {
            x: animate::sway(FIRE_X + self.dx, frame, 0.2, self.phase * 5.0, 3.0),
            y: Self::ORIGIN_Y - t * Self::RISE,
            brightness: 1.0 - t / Self::VISIBLE,
        })
    }
}

/// One of the overlapping flame tongues, identified by its slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlameTongue {
    pub slot: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlameShape {
    pub base_x: f64,
    pub height: f64,
    pub width: f64,
    pub tip_dx: f64,
    pub inner_tip_dx: f64,
}

impl FlameTongue {
    fn outer_color(&self) -> Rgb {
        Rgb::new(220, 80 + self.slot * 10, 20)
    }
}

impl Animate for FlameTongue {
    type State = FlameShape;

    fn state_at(&self, frame: u64) -> FlameShape {
        let slot = self.slot as f64;
        let phase = frame as f64 * 0.3 + slot * 1.3;
        FlameShape {
            base_x: FIRE_X + phase.sin() * 3.0 + (slot - 2.0) * 2.0,
            height: 12.0 + (phase * 1.5).sin() * 4.0,
            width: 5.0 + (phase * 0.7).sin() * 2.0,
            tip_dx: (phase + 1.0).sin() * 2.0,
            inner_tip_dx: (phase + 2.0).sin(),
        }
    }
}

#[derive(Debug)]
pub struct Campfire {
    settings: RenderSettings,
    stars: EntitySet<Star>,
    fireflies: EntitySet<Firefly>,
    sparks: EntitySet<Spark>,
    flames: EntitySet<FlameTongue>,
}

impl Campfire {
    pub fn stars(&self) -> &EntitySet<Star> {
        &self.stars
    }

    pub fn sparks(&self) -> &EntitySet<Spark> {
        &self.sparks
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
        canvas.fill_ellipse(BBox::circle(20.0, 15.0, 7.0), Rgb::new(230, 230, 210));
        // A sky-colored disc offset up and right carves the crescent.
        canvas.fill_ellipse(BBox::new(17.0, 7.0, 29.0, 21.0), SKY_TOP);
    }

    fn draw_mountains(&self, canvas: &mut Canvas, _frame: u64) {
        paint::paint_height_field(canvas, &FAR_MOUNTAINS, |_| Rgb::new(15, 20, 35));
        paint::paint_height_field(canvas, &NEAR_MOUNTAINS, |_| Rgb::new(10, 15, 25));
    }

    fn draw_ground(&self, canvas: &mut Canvas, _frame: u64) {
        let (top, bottom) = (Rgb::new(25, 35, 20), Rgb::new(20, 28, 15));
        paint::paint_height_field(canvas, &GROUND, |t| top.lerp(bottom, t));
    }

    fn draw_trees(&self, canvas: &mut Canvas, _frame: u64) {
        for (tx, ty) in TREES {
            canvas.fill_rect(BBox::new(tx - 1.0, ty, tx + 1.0, ty + 30.0), Rgb::new(8, 10, 15));
            for layer in 0..4 {
                let ly = ty - layer as f64 * 5.0;
                let w = 8.0 - layer as f64 * 1.5;
                canvas.fill_polygon(
                    &[pt(tx - w, ly), pt(tx, ly - 7.0), pt(tx + w, ly)],
                    Rgb::new(8, 12, 18),
                );
            }
        }
    }

    fn draw_tent(&self, canvas: &mut Canvas, _frame: u64) {
        let (tx, ty) = (100.0, 85.0);
        canvas.fill_polygon(
            &[pt(tx - 12.0, ty + 8.0), pt(tx, ty - 8.0), pt(tx + 12.0, ty + 8.0)],
            Rgb::new(60, 50, 40),
        );
        canvas.fill_polygon(
            &[pt(tx - 10.0, ty + 8.0), pt(tx, ty - 6.0), pt(tx + 10.0, ty + 8.0)],
            Rgb::new(70, 60, 50),
        );
        canvas.fill_polygon(
            &[pt(tx - 2.0, ty + 8.0), pt(tx, ty), pt(tx + 2.0, ty + 8.0)],
            Rgb::new(50, 40, 30),
        );
    }

    fn draw_fire_glow(&self, canvas: &mut Canvas, frame: u64) {
        let radius = animate::pulsing_radius(35.0, frame, 0.3);
        paint::radial_glow(canvas, FIRE_X as i32, FIRE_Y as i32, radius, FIRE_GLOW_TINT, 0.25);
    }

    fn draw_logs(&self, canvas: &mut Canvas, _frame: u64) {
        let (cx, cy) = (FIRE_X, 95.0);
        canvas.fill_ellipse(
            BBox::new(cx - 10.0, cy - 2.0, cx - 2.0, cy + 3.0),
            Rgb::new(60, 35, 15),
        );
        canvas.fill_ellipse(
            BBox::new(cx + 2.0, cy - 2.0, cx + 10.0, cy + 3.0),
            Rgb::new(55, 30, 12),
        );
        canvas.draw_line(pt(cx - 8.0, cy + 2.0), pt(cx + 8.0, cy - 2.0), Rgb::new(65, 38, 18), 3);

        for deg in (0..360).step_by(30) {
            let a = (deg as f64).to_radians();
            let (sx, sy) = (cx + a.cos() * 12.0, cy + a.sin() * 5.0);
            canvas.fill_ellipse(BBox::centered(sx, sy, 2.0, 1.5), Rgb::new(80, 80, 85));
        }
    }

    fn draw_log_seats(&self, canvas: &mut Canvas, _frame: u64) {
        canvas.fill_ellipse(BBox::new(40.0, 98.0, 52.0, 103.0), Rgb::new(70, 45, 20));
        canvas.fill_ellipse(BBox::new(76.0, 99.0, 88.0, 104.0), Rgb::new(65, 40, 18));
    }

    fn draw_fire(&self, canvas: &mut Canvas, frame: u64) {
        for tongue in &self.flames {
            let s = tongue.state_at(frame);
            canvas.fill_polygon(
                &[
                    pt(s.base_x - s.width, FIRE_Y),
                    pt(s.base_x + s.tip_dx, FIRE_Y - s.height),
                    pt(s.base_x + s.width, FIRE_Y),
                ],
                tongue.outer_color(),
            );
            let (inner_h, inner_w) = (s.height * 0.6, s.width * 0.5);
            canvas.fill_polygon(
                &[
                    pt(s.base_x - inner_w, FIRE_Y),
                    pt(s.base_x + s.inner_tip_dx, FIRE_Y - inner_h),
                    pt(s.base_x + inner_w, FIRE_Y),
                ],
                Rgb::new(255, 200, 50),
            );
        }
        canvas.fill_ellipse(
            BBox::new(FIRE_X - 3.0, FIRE_Y - 3.0, FIRE_X + 3.0, FIRE_Y + 1.0),
            Rgb::new(255, 240, 150),
        );
    }

    fn draw_sparks(&self, canvas: &mut Canvas, frame: u64) {
        for spark in &self.sparks {
            if let Some(ember) = spark.state_at(frame) {
                let color = Rgb::new(255, 150, 30).scale(ember.brightness);
                canvas.plot(ember.x, ember.y, color);
            }
        }
    }

    fn draw_fireflies(&self, canvas: &mut Canvas, frame: u64) {
        for fly in &self.fireflies {
            let g = fly.state_at(frame);
            if g.brightness > 0.6 {
                let b = (g.brightness * 200.0) as u8;
                canvas.plot(g.x, g.y, Rgb::new(b, b, b / 3));
            }
        }
    }
}

impl Scene for Campfire {
    const NAME: &'static str = "campfire";

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
            name: "mountains",
            kind: PassKind::Backdrop,
            draw: Self::draw_mountains,
        },
        DrawPass {
            name: "ground",
            kind: PassKind::Backdrop,
            draw: Self::draw_ground,
        },
        DrawPass {
            name: "trees",
            kind: PassKind::Structure,
            draw: Self::draw_trees,
        },
        DrawPass {
            name: "tent",
            kind: PassKind::Structure,
            draw: Self::draw_tent,
        },
        DrawPass {
            name: "fire_glow",
            kind: PassKind::Glow,
            draw: Self::draw_fire_glow,
        },
        DrawPass {
            name: "logs",
            kind: PassKind::Structure,
            draw: Self::draw_logs,
        },
        DrawPass {
            name: "log_seats",
            kind: PassKind::Structure,
            draw: Self::draw_log_seats,
        },
        DrawPass {
            name: "fire",
            kind: PassKind::Entities,
            draw: Self::draw_fire,
        },
        DrawPass {
            name: "sparks",
            kind: PassKind::Entities,
            draw: Self::draw_sparks,
        },
        DrawPass {
            name: "fireflies",
            kind: PassKind::Entities,
            draw: Self::draw_fireflies,
        },
    ];

    fn build(settings: &RenderSettings) -> PixloopResult<Self> {
        let mut source = SeedSource::entity(settings.entity_seed);

        let stars = EntitySet::generate("stars", 50, &mut source, |_, s| Star {
            x: s.int_in(0, 127),
            y: s.int_in(0, 50),
            speed: s.uniform(0.1, 0.4),
        })?;
        let fireflies = EntitySet::generate("fireflies", 12, &mut source, |_, s| Firefly {
            x: s.int_in(0, 127),
            y: s.int_in(30, 90),
            speed: s.uniform(0.1, 0.3),
            phase: s.uniform(0.5, 1.5),
        })?;
        let sparks = EntitySet::generate("sparks", 15, &mut source, |_, s| Spark {
            dx: s.uniform(-5.0, 5.0),
            speed: s.uniform(2.0, 8.0),
            phase: s.uniform(0.5, 1.5),
        })?;
        let flames =
            EntitySet::from_records("flames", (0..5).map(|slot| FlameTongue { slot }).collect())?;

        Ok(Self {
            settings: settings.clone(),
            stars,
            fireflies,
            sparks,
            flames,
        })
    }

    fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn entity_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (self.stars.name(), self.stars.len()),
            (self.fireflies.name(), self.fireflies.len()),
            (self.sparks.name(), self.sparks.len()),
            (self.flames.name(), self.flames.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::Compositor;

    fn scene() -> Campfire {
        Campfire::build(&RenderSettings::default()).unwrap()
    }

    #[test]
    fn test_entity_counts() {
        let counts = scene().entity_counts();
        assert_eq!(
            counts,
            vec![("stars", 50), ("fireflies", 12), ("sparks", 15), ("flames", 5)]
        );
    }

    #[test]
    fn test_star_records_in_range() {
        for star in scene().stars() {
            assert!((0..=127).contains(&star.x));
            assert!((0..=50).contains(&star.y));
            assert!(star.speed >= 0.1 && star.speed < 0.4);
        }
    }

    #[test]
    fn test_star_brightness_range() {
        let star = Star {
            x: 3,
            y: 9,
            speed: 0.25,
        };
        for frame in 0..10_000 {
            let c = star.state_at(frame);
            assert!((40..=220).contains(&c.r));
            assert_eq!(c.b, c.r + 15);
        }
    }

    #[test]
    fn test_sparks_hidden_late_in_cycle() {
        let spark = Spark {
            dx: 0.0,
            speed: 5.0,
            phase: 0.0,
        };
        // frame 10: 0.8 of the way through the cycle.
        assert!(spark.state_at(10).is_none());
        let ember = spark.state_at(0).unwrap();
        assert_eq!(ember.y, Spark::ORIGIN_Y);
        assert_eq!(ember.brightness, 1.0);
    }

    #[test]
    fn test_fire_glow_brightens_ground_near_fire() {
        let comp = Compositor::new(scene());
        let before = comp.render_frame_until(0, "tent").unwrap();
        let after = comp.render_frame_until(0, "fire_glow").unwrap();
        let (b, a) = (before.get_pixel(64, 80).unwrap(), after.get_pixel(64, 80).unwrap());
        assert!(a.r > b.r && a.g > b.g);
        // Outside the glow disc nothing changes.
        assert_eq!(before.get_pixel(0, 0), after.get_pixel(0, 0));
    }

    #[test]
    fn test_spark_rise_ignores_speed() {
        let slow = Spark {
            dx: 0.0,
            speed: 2.0,
            phase: 0.5,
        };
        let fast = Spark {
            speed: 8.0,
            ..slow.clone()
        };
        let (a, b) = (slow.state_at(0).unwrap(), fast.state_at(0).unwrap());
        assert_eq!(a.y, 70.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_sparks_climb_thirty_pixels_per_cycle() {
        let scene = scene();
        for spark in scene.sparks() {
            for frame in 0..60 {
                let t = (frame as f64 * 0.08 + spark.phase).rem_euclid(1.0);
                match spark.state_at(frame) {
                    Some(ember) => {
                        assert!(t <= Spark::VISIBLE);
                        assert!((ember.y - (85.0 - 30.0 * t)).abs() < 1e-9);
                    }
                    None => assert!(t > Spark::VISIBLE),
                }
            }
        }
    }

    #[test]
    fn test_fire_core_is_drawn() {
        // Sparks start above the core and fireflies come later, so stop at
        // the fire pass.
        let frame = Compositor::new(scene())
            .render_frame_until(7, "fire")
            .unwrap();
        assert_eq!(frame.get_pixel(64, 87), Some(Rgb::new(255, 240, 150)));
    }
}
