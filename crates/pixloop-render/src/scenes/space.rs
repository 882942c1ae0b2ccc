//! Deep space: nebula haze, twinkling stars, a cratered moon, a rotating
//! Earth, ringed Saturn, a periodic comet, a rocket and a passing UFO.

use serde::Serialize;

use pixloop_core::{BBox, Canvas, PixloopResult, RenderSettings, Rgb};

use crate::animate::{self, Animate};
use crate::compositor::{DrawPass, PassKind, Scene};
use crate::entity::{EntitySet, SeedSource};
use crate::paint::{self, pt};

const W: f64 = 128.0;

pub const BACKGROUND_TOP: Rgb = Rgb::new(5, 5, 20);
pub const BACKGROUND_BOTTOM: Rgb = Rgb::new(15, 5, 30);

pub const EARTH_CENTER: (i32, i32) = (50, 55);
const EARTH_RADIUS: i32 = 18;
pub const LAND: Rgb = Rgb::new(30, 130, 50);
pub const OCEAN: Rgb = Rgb::new(20, 60, 180);
const ATMOSPHERE: Rgb = Rgb::new(100, 150, 255);

/// Crater offsets and radii on the moon disc.
const CRATERS: [(f64, f64, f64); 3] = [(2.0, -2.0, 2.0), (-3.0, 1.0, 1.5), (1.0, 3.0, 1.0)];

const RING_TILT: f64 = 0.3;
const ROCKET_RED: Rgb = Rgb::new(220, 50, 50);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Star {
    pub x: i32,
    pub y: i32,
    pub brightness: f64,
    pub speed: f64,
}

impl Animate for Star {
    /// Current intensity in `0..=255`.
    type State = u8;

    fn state_at(&self, frame: u64) -> u8 {
        let twinkle = animate::pulse(frame, self.speed, (self.x + self.y) as f64);
        (self.brightness * twinkle * 255.0) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NebulaBlob {
    pub x: i32,
    pub y: i32,
    pub radius: f64,
    pub tint: Rgb,
}

impl Animate for NebulaBlob {
    /// Current radius.
    type State = f64;

    fn state_at(&self, frame: u64) -> f64 {
        self.radius * animate::sway(1.0, frame, 0.05, self.x as f64 * 0.1, 0.15)
    }
}

/// A comet crossing right to left, then hidden for the rest of its cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comet {
    pub period: f64,
    pub visible: f64,
}

impl Comet {
    const TAIL: i32 = 20;
}

impl Animate for Comet {
    /// Head position, or `None` while hidden.
    type State = Option<(i32, i32)>;

    fn state_at(&self, frame: u64) -> Option<(i32, i32)> {
        let cycle = animate::cyclic_window(frame as f64, self.period, self.visible)?;
        let t = cycle / self.visible;
        Some(((W * (1.0 - t) + 10.0) as i32, (10.0 + t * 50.0) as i32))
    }
}

const COMET: Comet = Comet {
    period: 60.0,
    visible: 40.0,
};

#[derive(Debug)]
pub struct Space {
    settings: RenderSettings,
    stars: EntitySet<Star>,
    nebula: EntitySet<NebulaBlob>,
}

impl Space {
    pub fn stars(&self) -> &EntitySet<Star> {
        &self.stars
    }

    fn draw_background(&self, canvas: &mut Canvas, _frame: u64) {
        paint::paint_vertical_gradient(canvas, BACKGROUND_TOP, BACKGROUND_BOTTOM);
    }

    fn draw_nebula(&self, canvas: &mut Canvas, frame: u64) {
        for blob in &self.nebula {
            let radius = blob.state_at(frame);
            paint::radial_glow(canvas, blob.x, blob.y, radius, blob.tint, 0.3);
        }
    }

    fn draw_stars(&self, canvas: &mut Canvas, frame: u64) {
        for star in &self.stars {
            let b = star.state_at(frame);
            if b <= 30 {
                continue;
            }
            canvas.set_pixel(star.x, star.y, Rgb::new(b, b, b.saturating_add(30)));
            if b > 180 {
                let halo = Rgb::gray(b / 2);
                canvas.set_pixel(star.x + 1, star.y, halo);
                canvas.set_pixel(star.x - 1, star.y, halo);
            }
        }
    }

    fn draw_moon(&self, canvas: &mut Canvas, _frame: u64) {
        let r = 8.0;
        paint::shade_disc(canvas, 18, 20, 8, |dx, dy, _| {
            let (dx, dy) = (dx as f64, dy as f64);
            let light = (dx / r * 0.3 + 0.6).max(0.2);
            let in_crater = CRATERS
                .iter()
                .any(|&(cx, cy, cr)| (dx - cx).hypot(dy - cy) < cr);
            let base = if in_crater {
                Rgb::new(165, 165, 155)
            } else {
                Rgb::new(180, 180, 170)
            };
            base.scale(light)
        });
    }

    fn draw_earth(&self, canvas: &mut Canvas, frame: u64) {
        let r = EARTH_RADIUS as f64;
        let rotation = frame as f64 * 0.03;
        let (cx, cy) = EARTH_CENTER;
        paint::shade_disc(canvas, cx, cy, EARTH_RADIUS, |dx, dy, dist| {
            let (nx, ny) = (dx as f64 / r, dy as f64 / r);
            let light = (-nx * 0.5 - ny * 0.3 + 0.6).max(0.0);

            let angle = (dy as f64).atan2(dx as f64) + rotation;
            let pattern = (angle * 3.0 + ny * 4.0).sin() * (angle * 2.0 - ny * 3.0).cos();
            let base = if pattern > 0.1 { LAND } else { OCEAN };

            let color = base.scale(light);
            let edge = dist / r;
            if edge > 0.85 {
                color.lerp(ATMOSPHERE, (edge - 0.85) / 0.15 * 0.6)
            } else {
                color
            }
        });
    }

    fn draw_saturn(&self, canvas: &mut Canvas, _frame: u64) {
        let (cx, cy, r) = (100, 30, 10);
        let rf = r as f64;
        paint::shade_disc(canvas, cx, cy, r, |dx, dy, _| {
            let light = (-(dx as f64) / rf * 0.4 + 0.7).max(0.2);
            let band = (dy as f64 * 0.8).sin() * 0.15;
            let base = Rgb::new(
                (210 + (band * 40.0) as i32) as u8,
                (180 + (band * 30.0) as i32) as u8,
                120,
            );
            base.scale(light)
        });

        let (cx, cy) = (cx as f64, cy as f64);
        for deg in 0..360 {
            let a = (deg as f64).to_radians();
            for ring_r in 14..20 {
                let ring = ring_r as f64;
                let rx = cx + a.cos() * ring;
                let ry = cy + a.sin() * ring * RING_TILT;
                // The far half of the ring is hidden behind the planet body.
                if a.sin() > 0.0 && (rx - cx).abs() < rf && (ry - cy).abs() < rf * RING_TILT {
                    continue;
                }
                let brightness = 0.5 + (ring * 1.5).sin() * 0.3;
                canvas.plot(rx, ry, Rgb::new(200, 190, 160).scale(brightness));
            }
        }
    }

    fn draw_comet(&self, canvas: &mut Canvas, frame: u64) {
        let Some((cx, cy)) = COMET.state_at(frame) else {
            return;
        };
        for i in 0..Comet::TAIL {
            let fade = 1.0 - i as f64 / Comet::TAIL as f64;
            let b = (fade * 200.0) as u8;
            if b > 10 {
                let (tx, ty) = (cx as f64 + i as f64 * 1.2, cy as f64 - i as f64 * 0.5);
                canvas.plot(tx, ty, Rgb::new(b, b, b / 2));
            }
        }
        let (hx, hy) = (cx as f64, cy as f64);
        canvas.fill_ellipse(BBox::circle(hx, hy, 2.0), Rgb::new(255, 255, 200));
        canvas.fill_ellipse(BBox::circle(hx, hy, 1.0), Rgb::WHITE);
    }

    fn draw_rocket(&self, canvas: &mut Canvas, frame: u64) {
        let rx = animate::sway(75.0, frame, 0.08, 0.0, 5.0);
        let ry = 95.0 + (frame as f64 * 0.06).cos() * 3.0;
        let bob = (frame as f64 * 0.15).sin();

        canvas.fill_rect(
            BBox::new(rx - 2.0, ry - 6.0, rx + 2.0, ry + 4.0),
            Rgb::new(200, 200, 210),
        );
        canvas.fill_polygon(
            &[
                pt(rx - 2.0, ry - 6.0),
                pt(rx, ry - 10.0),
                pt(rx + 2.0, ry - 6.0),
            ],
            ROCKET_RED,
        );
        canvas.fill_polygon(
            &[
                pt(rx - 2.0, ry + 2.0),
                pt(rx - 5.0, ry + 5.0),
                pt(rx - 2.0, ry + 4.0),
            ],
            ROCKET_RED,
        );
        canvas.fill_polygon(
            &[
                pt(rx + 2.0, ry + 2.0),
                pt(rx + 5.0, ry + 5.0),
                pt(rx + 2.0, ry + 4.0),
            ],
            ROCKET_RED,
        );
        canvas.fill_ellipse(
            BBox::new(rx - 1.0, ry - 4.0, rx + 1.0, ry - 2.0),
            Rgb::new(100, 180, 255),
        );

        let flame = 3.0 + bob.abs() * 3.0;
        canvas.fill_polygon(
            &[pt(rx - 2.0, ry + 4.0), pt(rx, ry + 4.0 + flame), pt(rx + 2.0, ry + 4.0)],
            Rgb::new(255, 200, 50),
        );
        canvas.fill_polygon(
            &[pt(rx - 1.0, ry + 4.0), pt(rx, ry + 4.0 + flame * 0.7), pt(rx + 1.0, ry + 4.0)],
            Rgb::new(255, 255, 150),
        );
    }

    fn draw_ufo(&self, canvas: &mut Canvas, frame: u64) {
        let ux = animate::wrap(20.0, frame, 1.5, W + 30.0, 15.0);
        let uy = animate::sway(108.0, frame, 0.12, 0.0, 4.0);

        canvas.fill_ellipse(
            BBox::new(ux - 4.0, uy - 6.0, ux + 4.0, uy - 1.0),
            Rgb::new(150, 200, 150),
        );
        canvas.fill_ellipse(
            BBox::new(ux - 8.0, uy - 3.0, ux + 8.0, uy + 2.0),
            Rgb::new(180, 180, 190),
        );
        for i in 0..3 {
            let lx = ux - 5.0 + i as f64 * 5.0;
            let lit = (frame as f64 * 0.4 + i as f64 * 2.0).sin() > 0.0;
            let color = if lit {
                Rgb::new(255, 255, 0)
            } else {
                Rgb::new(100, 100, 50)
            };
            canvas.fill_ellipse(BBox::circle(lx, uy, 1.0), color);
        }
    }
}

impl Scene for Space {
    const NAME: &'static str = "space";

    const PASSES: &'static [DrawPass<Self>] = &[
        DrawPass {
            name: "background",
            kind: PassKind::Backdrop,
            draw: Self::draw_background,
        },
        DrawPass {
            name: "nebula",
            kind: PassKind::Glow,
            draw: Self::draw_nebula,
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
            name: "earth",
            kind: PassKind::Structure,
            draw: Self::draw_earth,
        },
        DrawPass {
            name: "saturn",
            kind: PassKind::Structure,
            draw: Self::draw_saturn,
        },
        DrawPass {
            name: "comet",
            kind: PassKind::Entities,
            draw: Self::draw_comet,
        },
        DrawPass {
            name: "rocket",
            kind: PassKind::Entities,
            draw: Self::draw_rocket,
        },
        DrawPass {
            name: "ufo",
            kind: PassKind::Entities,
            draw: Self::draw_ufo,
        },
    ];

    fn build(settings: &RenderSettings) -> PixloopResult<Self> {
        let mut source = SeedSource::entity(settings.entity_seed);

        let stars = EntitySet::generate("stars", 80, &mut source, |_, s| Star {
            x: s.int_in(0, 127),
            y: s.int_in(0, 127),
            brightness: s.uniform(0.3, 1.0),
            speed: s.uniform(0.1, 0.4),
        })?;
        let blob = |x, y, radius, tint| NebulaBlob { x, y, radius, tint };
        let nebula = EntitySet::from_records(
            "nebula",
            vec![
                blob(30, 80, 30.0, Rgb::new(60, 20, 80)),
                blob(90, 40, 25.0, Rgb::new(20, 30, 70)),
                blob(60, 60, 20.0, Rgb::new(50, 15, 50)),
                blob(110, 90, 18.0, Rgb::new(30, 20, 60)),
            ],
        )?;

        Ok(Self {
            settings: settings.clone(),
            stars,
            nebula,
        })
    }

    fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn entity_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (self.stars.name(), self.stars.len()),
            (self.nebula.name(), self.nebula.len()),
        ]
    }
}
