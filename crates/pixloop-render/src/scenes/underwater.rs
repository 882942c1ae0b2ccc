//! Under the sea: light rays, a sandy floor, swaying coral and kelp,
//! schooling fish, a jellyfish and rising bubbles.

use std::f64::consts::PI;

use serde::Serialize;

use pixloop_core::{BBox, Canvas, PixloopResult, RenderSettings, Rgb};

use crate::animate::{self, Animate};
use crate::compositor::{DrawPass, PassKind, Scene};
use crate::entity::{EntitySet, SeedSource};
use crate::paint::{self, pt};

const W: f64 = 128.0;
const H: f64 = 128.0;

const WATER_TOP: Rgb = Rgb::new(30, 120, 200);
const WATER_BOTTOM: Rgb = Rgb::new(10, 30, 80);
const RAY_LIGHT: Rgb = Rgb::new(180, 220, 255);
const SAND: Rgb = Rgb::new(200, 180, 130);
const SAND_DARK: Rgb = Rgb::new(160, 140, 100);
const SAND_TOP: i32 = 110;
const KELP_GREEN: Rgb = Rgb::new(20, 120, 40);
const KELP_LIGHT: Rgb = Rgb::new(40, 160, 60);
const BUBBLE: Rgb = Rgb::new(150, 200, 255);

const CORAL_COLORS: [Rgb; 4] = [
    Rgb::new(220, 80, 80),
    Rgb::new(240, 140, 60),
    Rgb::new(200, 60, 160),
    Rgb::new(255, 180, 80),
];
const CORAL_ROOTS: [(f64, f64); 4] = [
    (15.0, 108.0),
    (45.0, 110.0),
    (80.0, 107.0),
    (105.0, 111.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fish {
    pub x: i32,
    pub y: i32,
    pub speed: f64,
    pub size: i32,
    pub color: Rgb,
    /// `1` swims right, `-1` swims left.
    pub direction: i32,
}

impl Fish {
    const SWIM_SLACK: f64 = 20.0;
    const SWIM_MARGIN: f64 = 10.0;
}

impl Animate for Fish {
    type State = (f64, f64);

    fn state_at(&self, frame: u64) -> (f64, f64) {
        let x = animate::wrap(
            self.x as f64,
            frame,
            self.speed * self.direction as f64,
            W + Self::SWIM_SLACK,
            Self::SWIM_MARGIN,
        );
        let y = animate::sway(self.y as f64, frame, 0.2, self.x as f64, 2.0);
        (x, y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    pub x: i32,
    pub y: i32,
    pub speed: f64,
    pub size: i32,
}

impl Animate for Bubble {
    /// Center, or `None` near the surface and below the sand line.
    type State = Option<(f64, f64)>;

    fn state_at(&self, frame: u64) -> Option<(f64, f64)> {
        let y = animate::wrap(self.y as f64, frame, -self.speed, H + 20.0, 0.0);
        if !(5.0..=120.0).contains(&y) {
            return None;
        }
        let x = animate::sway(self.x as f64, frame, 0.2, self.x as f64, 1.5);
        Some((x, y))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kelp {
    pub x: i32,
    pub segments: i32,
    /// Per-stalk sway offset, so neighbouring stalks do not move in step.
    pub phase: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shell {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightRay {
    pub x: i32,
    pub width: i32,
}

/// A coral colony: a fixed root with a fan of tapering branches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coral {
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
    pub phase: f64,
}

impl Coral {
    pub const BRANCHES: u32 = 4;
    pub const SEGMENTS: u32 = 8;

    /// Centre and radius of one blob along a branch. `sway` tilts the
    /// whole fan.
    pub fn segment(&self, branch: u32, seg: u32, sway: f64) -> (f64, f64, f64) {
        let fan = (Self::BRANCHES - 1) as f64 / 2.0;
        let angle = -PI / 2.0 + (branch as f64 - fan) * 0.4 + sway * 0.1;
        let t = seg as f64 / (Self::SEGMENTS - 1) as f64;
        let reach = seg as f64 * 2.0;
        (
            self.x + angle.cos() * reach,
            self.y + angle.sin() * reach,
            3.0 - t * 2.0,
        )
    }
}

#[derive(Debug)]
pub struct Underwater {
    settings: RenderSettings,
    fish: EntitySet<Fish>,
    bubbles: EntitySet<Bubble>,
    kelp: EntitySet<Kelp>,
    shells: EntitySet<Shell>,
    rays: EntitySet<LightRay>,
    coral: EntitySet<Coral>,
}

impl Underwater {
    pub fn fish(&self) -> &EntitySet<Fish> {
        &self.fish
    }

    pub fn coral(&self) -> &EntitySet<Coral> {
        &self.coral
    }

    fn draw_water(&self, canvas: &mut Canvas, _frame: u64) {
        paint::paint_vertical_gradient(canvas, WATER_TOP, WATER_BOTTOM);
    }

    /// Rays overwrite with a faint lighter tint of the water at each row.
    fn draw_light_rays(&self, canvas: &mut Canvas, frame: u64) {
        for ray in &self.rays {
            let x = animate::sway(ray.x as f64, frame, 0.08, ray.x as f64 * 0.1, 5.0);
            for y in 0..90 {
                let t = y as f64 / 90.0;
                let spread = (t * ray.width as f64) as i32;
                let light = WATER_TOP.lerp(RAY_LIGHT, 1.0 - t);
                let water = WATER_TOP.lerp(WATER_BOTTOM, y as f64 / H);
                let color = water.lerp(light, (1.0 - t) * 0.15);
                for dx in -spread..=spread {
                    canvas.plot(x + dx as f64, y as f64, color);
                }
            }
        }
    }

    fn draw_sand(&self, canvas: &mut Canvas, _frame: u64) {
        let depth = H - SAND_TOP as f64;
        canvas.fill_horizontal_band(SAND_TOP, H as i32, |y| {
            SAND_DARK.lerp(SAND, (y - SAND_TOP) as f64 / depth)
        });
        for x in (0..W as i32).step_by(8) {
            let sx = x as f64 + (x as f64 * 0.3).sin() * 3.0;
            canvas.draw_arc(
                BBox::new(sx, 115.0, sx + 10.0, 120.0),
                0.0,
                180.0,
                Rgb::new(180, 160, 120),
            );
        }
    }

    fn draw_coral(&self, canvas: &mut Canvas, frame: u64) {
        for coral in &self.coral {
            let sway = animate::sway(0.0, frame, 0.05, coral.phase, 1.0);
            for branch in 0..Coral::BRANCHES {
                for seg in 0..Coral::SEGMENTS {
                    let (bx, by, r) = coral.segment(branch, seg, sway);
                    if r > 0.0 {
                        canvas.fill_ellipse(BBox::circle(bx, by, r), coral.color);
                    }
                }
            }
        }
    }

    fn draw_kelp(&self, canvas: &mut Canvas, frame: u64) {
        let f = frame as f64;
        for kelp in &self.kelp {
            let last = (kelp.segments - 1).max(1) as f64;
            for seg in 0..kelp.segments {
                let t = seg as f64 / last;
                let s = seg as f64;
                let x = animate::sway(kelp.x as f64, frame, 0.1, kelp.phase + s * 0.3, 3.0 * t);
                let y = 118.0 - s * 3.0;
                let w = 3.0 - t * 1.5;
                let color = KELP_GREEN.lerp(KELP_LIGHT, t * 0.5 + (f * 0.1 + s).sin() * 0.2);
                canvas.fill_ellipse(BBox::new(x - w, y - 1.0, x + w, y + 1.0), color);
            }
        }
    }

    fn draw_starfish(&self, canvas: &mut Canvas, _frame: u64) {
        let (sx, sy) = (30.0, 117.0);
        for arm in 0..5 {
            let angle = -PI / 2.0 + arm as f64 * 2.0 * PI / 5.0;
            for seg in 0..6 {
                let t = seg as f64 / 5.0;
                let reach = seg as f64 * 1.5;
                let r = 1.5 - t * 0.8;
                canvas.fill_ellipse(
                    BBox::circle(sx + angle.cos() * reach, sy + angle.sin() * reach, r),
                    Rgb::new(230, 140, 50),
                );
            }
        }
        canvas.fill_ellipse(BBox::circle(sx, sy, 1.0), Rgb::new(240, 160, 70));
    }

    fn draw_shells(&self, canvas: &mut Canvas, _frame: u64) {
        for shell in &self.shells {
            let (x, y) = (shell.x as f64, shell.y as f64);
            canvas.draw_arc(BBox::centered(x, y, 3.0, 2.0), 0.0, 180.0, Rgb::new(230, 210, 180));
            canvas.draw_arc(BBox::centered(x, y, 2.0, 1.0), 0.0, 180.0, Rgb::new(210, 190, 160));
        }
    }

    fn draw_fish(&self, canvas: &mut Canvas, frame: u64) {
        for fish in &self.fish {
            let (x, y) = fish.state_at(frame);
            let size = fish.size as f64;
            let half = (fish.size / 2) as f64;
            let third = (fish.size / 3) as f64;
            let dir = fish.direction as f64;

            canvas.fill_ellipse(BBox::new(x - size, y - half, x + size, y + half), fish.color);
            // Tail trails behind, eye sits ahead.
            let tail_root = x - dir * size;
            let tail_tip = x - dir * (size + half);
            canvas.fill_polygon(
                &[pt(tail_root, y), pt(tail_tip, y - half), pt(tail_tip, y + half)],
                fish.color,
            );
            let eye_x = x + dir * third;
            canvas.fill_ellipse(BBox::new(eye_x, y - 2.0, eye_x + dir * 2.0, y), Rgb::BLACK);

            canvas.draw_line(pt(x - half, y), pt(x + half, y), fish.color.darken(40), 1);
        }
    }

    fn draw_jellyfish(&self, canvas: &mut Canvas, frame: u64) {
        let f = frame as f64;
        let jx = animate::sway(95.0, frame, 0.06, 0.0, 10.0);
        let jy = animate::sway(35.0, frame, 0.08, 0.0, 8.0);
        let r = 8.0 + (f * 0.2).sin() * 2.0;

        canvas.fill_ellipse(
            BBox::new(jx - r, jy - r * 0.6, jx + r, jy + r * 0.4),
            Rgb::new(200, 150, 255),
        );
        canvas.fill_ellipse(
            BBox::new(jx - r + 2.0, jy - r * 0.4, jx + r - 2.0, jy + r * 0.2),
            Rgb::new(220, 180, 255),
        );
        for strand in 0..5 {
            let tx = jx - 6.0 + strand as f64 * 3.0;
            for seg in 0..8 {
                let ty = jy + r * 0.3 + seg as f64 * 2.5;
                let sx = animate::sway(tx, frame, 0.15, strand as f64 + seg as f64 * 0.4, 2.0);
                canvas.plot(sx, ty, Rgb::new(180, 130, 230));
            }
        }
    }

    fn draw_bubbles(&self, canvas: &mut Canvas, frame: u64) {
        for bubble in &self.bubbles {
            let Some((x, y)) = bubble.state_at(frame) else {
                continue;
            };
            let size = bubble.size as f64;
            canvas.draw_ellipse_outline(BBox::circle(x, y, size), BUBBLE);
            canvas.plot(x - size * 0.3, y - size * 0.3, Rgb::new(200, 230, 255));
        }
    }
}

impl Scene for Underwater {
    const NAME: &'static str = "underwater";

    const PASSES: &'static [DrawPass<Self>] = &[
        DrawPass {
            name: "water",
            kind: PassKind::Backdrop,
            draw: Self::draw_water,
        },
        DrawPass {
            name: "light_rays",
            kind: PassKind::Glow,
            draw: Self::draw_light_rays,
        },
        DrawPass {
            name: "sand",
            kind: PassKind::Backdrop,
            draw: Self::draw_sand,
        },
        DrawPass {
            name: "coral",
            kind: PassKind::Entities,
            draw: Self::draw_coral,
        },
        DrawPass {
            name: "kelp",
            kind: PassKind::Entities,
            draw: Self::draw_kelp,
        },
        DrawPass {
            name: "starfish",
            kind: PassKind::Structure,
            draw: Self::draw_starfish,
        },
        DrawPass {
            name: "shells",
            kind: PassKind::Structure,
            draw: Self::draw_shells,
        },
        DrawPass {
            name: "fish",
            kind: PassKind::Entities,
            draw: Self::draw_fish,
        },
        DrawPass {
            name: "jellyfish",
            kind: PassKind::Entities,
            draw: Self::draw_jellyfish,
        },
        DrawPass {
            name: "bubbles",
            kind: PassKind::Entities,
            draw: Self::draw_bubbles,
        },
    ];

    fn build(settings: &RenderSettings) -> PixloopResult<Self> {
        let mut source = SeedSource::entity(settings.entity_seed);

        let fish = EntitySet::generate("fish", 6, &mut source, |_, s| Fish {
            x: s.int_in(0, 127),
            y: s.int_in(20, 95),
            speed: s.uniform(0.8, 2.0),
            size: s.int_in(4, 8),
            color: s.color_in((150, 255), (80, 255), (50, 255)),
            direction: s.sign(),
        })?;
        let bubbles = EntitySet::generate("bubbles", 15, &mut source, |_, s| Bubble {
            x: s.int_in(10, 118),
            y: s.int_in(40, 120),
            speed: s.uniform(0.5, 1.5),
            size: s.int_in(1, 3),
        })?;
        let kelp = EntitySet::generate("kelp", 8, &mut source, |i, s| Kelp {
            x: s.int_in(5, 123),
            segments: s.int_in(25, 40),
            phase: i as f64 * 0.7,
        })?;
        let shells = EntitySet::generate("shells", 5, &mut source, |_, s| Shell {
            x: s.int_in(10, 118),
            y: s.int_in(112, 122),
        })?;
        let rays = EntitySet::generate("light_rays", 4, &mut source, |_, s| LightRay {
            x: s.int_in(10, 118),
            width: s.int_in(8, 20),
        })?;

        // Coral has its own stream so the fan never shifts the entity draws.
        // The fan itself is fixed and takes no values from it.
        let mut layout = SeedSource::layout(settings.layout_seed);
        let coral = EntitySet::generate("coral", CORAL_ROOTS.len(), &mut layout, |i, _| {
            let (x, y) = CORAL_ROOTS[i];
            Coral {
                x,
                y,
                color: CORAL_COLORS[i % CORAL_COLORS.len()],
                phase: i as f64,
            }
        })?;

        Ok(Self {
            settings: settings.clone(),
            fish,
            bubbles,
            kelp,
            shells,
            rays,
            coral,
        })
    }

    fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn entity_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (self.fish.name(), self.fish.len()),
            (self.bubbles.name(), self.bubbles.len()),
            (self.kelp.name(), self.kelp.len()),
            (self.shells.name(), self.shells.len()),
            (self.rays.name(), self.rays.len()),
            (self.coral.name(), self.coral.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::Compositor;

    fn settings() -> RenderSettings {
        RenderSettings::default()
    }

    #[test]
    fn test_coral_layout_independent_of_entity_seed() {
        let a = Underwater::build(&settings()).unwrap();
        let b = Underwater::build(&RenderSettings {
            entity_seed: 7,
            ..settings()
        })
        .unwrap();
        assert_eq!(a.coral(), b.coral());
        assert_ne!(a.fish(), b.fish());
    }

    #[test]
    fn test_coral_fan_is_fixed() {
        let scene = Underwater::build(&settings()).unwrap();
        let reseeded = Underwater::build(&RenderSettings {
            layout_seed: 5,
            ..settings()
        })
        .unwrap();
        assert_eq!(scene.coral(), reseeded.coral());
        assert_eq!(scene.coral().len(), 4);
        for (coral, (x, y)) in scene.coral().iter().zip(CORAL_ROOTS) {
            assert_eq!((coral.x, coral.y), (x, y));
        }
        assert_eq!((Coral::BRANCHES, Coral::SEGMENTS), (4, 8));
    }

    #[test]
    fn test_coral_branch_tip_geometry() {
        let scene = Underwater::build(&settings()).unwrap();
        let coral = scene.coral().get(0).unwrap();
        // Branch 1 leans 0.2 rad left of vertical; the last segment sits
        // 14px out with radius 1.
        let (bx, by, r) = coral.segment(1, 7, 0.0);
        assert!((bx - 12.2186).abs() < 1e-3);
        assert!((by - 94.2791).abs() < 1e-3);
        assert!((r - 1.0).abs() < 1e-12);

        let frame = Compositor::new(scene).render_frame_until(0, "coral").unwrap();
        let color = CORAL_COLORS[0];
        assert_eq!(frame.get_pixel(15, 108), Some(color));
        assert_eq!(frame.get_pixel(12, 94), Some(color));
        // Nothing past the eighth segment.
        assert_ne!(frame.get_pixel(12, 92), Some(color));
    }

    #[test]
    fn test_fish_records() {
        let scene = Underwater::build(&settings()).unwrap();
        for fish in scene.fish() {
            assert!(fish.direction == 1 || fish.direction == -1);
            assert!((4..=8).contains(&fish.size));
            assert!(fish.color.r >= 150);
        }
    }

    #[test]
    fn test_fish_wraps_across_both_edges() {
        let right = Fish {
            x: 120,
            y: 50,
            speed: 2.0,
            size: 6,
            color: Rgb::RED,
            direction: 1,
        };
        let left = Fish {
            direction: -1,
            ..right.clone()
        };
        for frame in 0..10_000 {
            let (xr, _) = right.state_at(frame);
            let (xl, _) = left.state_at(frame);
            assert!((-10.0..=138.0).contains(&xr));
            assert!((-10.0..=138.0).contains(&xl));
        }
        // 120 + 2*14 = 148 wraps to 0 in a 148 px loop, minus the margin.
        assert_eq!(right.state_at(14).0, -10.0);
    }

    #[test]
    fn test_bubble_hidden_outside_band() {
        let bubble = Bubble {
            x: 50,
            y: 4,
            speed: 1.0,
            size: 2,
        };
        assert!(bubble.state_at(0).is_none());
        // Rising past the top re-enters at the bottom: (4 - 30) mod 148 = 122,
        // still under the sand line.
        assert!(bubble.state_at(30).is_none());
        let (_, y) = bubble.state_at(40).unwrap();
        assert_eq!(y, 112.0);
    }
}
