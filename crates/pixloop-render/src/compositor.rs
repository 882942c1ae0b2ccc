//! Ordered draw-pass composition.
//!
//! A scene is a value holding its immutable entity sets plus a static,
//! declared list of [`DrawPass`]es. The [`Compositor`] runs that list, in
//! order, against a fresh canvas for each frame index. Later passes see the
//! cumulative result of earlier ones, so the declared order is part of the
//! scene's output contract.

use serde::Serialize;
use tracing::info;

use pixloop_core::{Canvas, PixloopResult, RenderSettings};

/// The broad shape of work a pass performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    /// Full-canvas paint: gradients and terrain silhouettes.
    Backdrop,
    /// Fixed scene geometry independent of entity sets.
    Structure,
    /// Iterates an entity set through the animator.
    Entities,
    /// Additive blend over existing pixels.
    Glow,
}

/// Signature of a pass body: `(scene, canvas, frame)`.
pub type DrawFn<S> = fn(&S, &mut Canvas, u64);

/// One named stage of a scene's per-frame pipeline.
pub struct DrawPass<S> {
    pub name: &'static str,
    pub kind: PassKind,
    pub draw: DrawFn<S>,
}

impl<S> Clone for DrawPass<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for DrawPass<S> {}

impl<S> std::fmt::Debug for DrawPass<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawPass")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A renderable scene definition.
pub trait Scene: Sized + Send + Sync + 'static {
    const NAME: &'static str;

    /// Passes in execution order.
    const PASSES: &'static [DrawPass<Self>];

    /// Populate entity sets. Runs once, before any frame is rendered.
    fn build(settings: &RenderSettings) -> PixloopResult<Self>;

    fn settings(&self) -> &RenderSettings;

    /// `(set name, record count)` for every entity set the scene owns.
    fn entity_counts(&self) -> Vec<(&'static str, usize)>;
}

/// Runs a scene's passes against fresh canvases.
#[derive(Debug)]
pub struct Compositor<S: Scene> {
    scene: S,
}

impl<S: Scene> Compositor<S> {
    /// Wrap an already built scene.
    pub fn new(scene: S) -> Self {
        Self { scene }
    }

    /// Validate `settings`, then build the scene. Fails before any frame is
    /// produced.
    pub fn build(settings: &RenderSettings) -> PixloopResult<Self> {
        settings.ensure_valid()?;
        let scene = S::build(settings)?;
        info!(
            scene = S::NAME,
            passes = S::PASSES.len(),
            entities = ?scene.entity_counts(),
            "built scene"
        );
        Ok(Self { scene })
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn passes(&self) -> &'static [DrawPass<S>] {
        S::PASSES
    }

    /// Render one frame through every declared pass.
    pub fn render_frame(&self, frame: u64) -> Canvas {
        self.render_with(frame, S::PASSES)
    }

    /// Render the declared passes up to and including `last_pass`.
    /// Returns `None` if the scene has no pass of that name.
    pub fn render_frame_until(&self, frame: u64, last_pass: &str) -> Option<Canvas> {
        let end = S::PASSES.iter().position(|p| p.name == last_pass)?;
        Some(self.render_with(frame, &S::PASSES[..=end]))
    }

    /// Render an arbitrary pass list against this scene's entities.
    pub fn render_with(&self, frame: u64, passes: &[DrawPass<S>]) -> Canvas {
        let settings = self.scene.settings();
        let mut canvas = Canvas::new(settings.width, settings.height);
        for pass in passes {
            (pass.draw)(&self.scene, &mut canvas, frame);
        }
        canvas
    }
}

/// Name and kind of one pass, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassInfo {
    pub name: &'static str,
    pub kind: PassKind,
}

/// Type-erased view of a built scene, shareable across render threads.
pub trait FrameSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn settings(&self) -> &RenderSettings;

    fn passes(&self) -> Vec<PassInfo>;

    fn entity_counts(&self) -> Vec<(&'static str, usize)>;

    fn render_frame(&self, frame: u64) -> Canvas;
}

impl<S: Scene> FrameSource for Compositor<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn settings(&self) -> &RenderSettings {
        self.scene.settings()
    }

    fn passes(&self) -> Vec<PassInfo> {
        S::PASSES
            .iter()
            .map(|p| PassInfo {
                name: p.name,
                kind: p.kind,
            })
            .collect()
    }

    fn entity_counts(&self) -> Vec<(&'static str, usize)> {
        self.scene.entity_counts()
    }

    fn render_frame(&self, frame: u64) -> Canvas {
        Compositor::<S>::render_frame(self, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixloop_core::{BBox, PixloopError, Rgb};

    use crate::paint::radial_glow;

    /// Minimal scene: gray fill, then a glow, then a moving dot.
    #[derive(Debug)]
    struct Marker {
        settings: RenderSettings,
    }

    impl Marker {
        fn fill(&self, canvas: &mut Canvas, _frame: u64) {
            canvas.fill(Rgb::gray(40));
        }

        fn glow(&self, canvas: &mut Canvas, _frame: u64) {
            radial_glow(canvas, 8, 8, 4.0, Rgb::new(200, 0, 0), 1.0);
        }

        fn dot(&self, canvas: &mut Canvas, frame: u64) {
            let x = (frame % 16) as f64;
            canvas.fill_rect(BBox::new(x, 0.0, x, 0.0), Rgb::WHITE);
        }
    }

    impl Scene for Marker {
        const NAME: &'static str = "marker";
        const PASSES: &'static [DrawPass<Self>] = &[
            DrawPass {
                name: "fill",
                kind: PassKind::Backdrop,
                draw: Self::fill,
            },
            DrawPass {
                name: "glow",
                kind: PassKind::Glow,
                draw: Self::glow,
            },
            DrawPass {
                name: "dot",
                kind: PassKind::Entities,
                draw: Self::dot,
            },
        ];

        fn build(settings: &RenderSettings) -> PixloopResult<Self> {
            Ok(Self {
                settings: settings.clone(),
            })
        }

        fn settings(&self) -> &RenderSettings {
            &self.settings
        }

        fn entity_counts(&self) -> Vec<(&'static str, usize)> {
            vec![("dot", 1)]
        }
    }

    fn small() -> RenderSettings {
        RenderSettings {
            width: 16,
            height: 16,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_passes_run_in_declared_order() {
        let comp = Compositor::<Marker>::build(&small()).unwrap();
        let frame = comp.render_frame(3);
        assert_eq!(frame.get_pixel(3, 0), Some(Rgb::WHITE));
        // Glow added onto the gray fill.
        assert_eq!(frame.get_pixel(8, 8), Some(Rgb::new(240, 40, 40)));
    }

    #[test]
    fn test_reordering_changes_output() {
        let comp = Compositor::<Marker>::build(&small()).unwrap();
        let reversed: Vec<DrawPass<Marker>> = Marker::PASSES.iter().rev().copied().collect();
        assert_ne!(comp.render_frame(3), comp.render_with(3, &reversed));
    }

    #[test]
    fn test_render_frame_until_prefix() {
        let comp = Compositor::<Marker>::build(&small()).unwrap();
        let backdrop = comp.render_frame_until(0, "fill").unwrap();
        assert_eq!(backdrop, Canvas::solid(16, 16, Rgb::gray(40)));
        assert_eq!(comp.render_frame_until(0, "dot").unwrap(), comp.render_frame(0));
        assert!(comp.render_frame_until(0, "missing").is_none());
    }

    #[test]
    fn test_invalid_settings_fail_before_build() {
        let err = Compositor::<Marker>::build(&RenderSettings {
            height: 0,
            ..small()
        })
        .unwrap_err();
        assert!(matches!(err, PixloopError::InvalidConfig(_)));
    }

    #[test]
    fn test_frame_source_reports_passes() {
        let comp = Compositor::<Marker>::build(&small()).unwrap();
        let source: &dyn FrameSource = &comp;
        assert_eq!(source.name(), "marker");
        let names: Vec<_> = source.passes().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["fill", "glow", "dot"]);
        assert_eq!(source.entity_counts(), vec![("dot", 1)]);
        assert_eq!(source.render_frame(5), comp.render_frame(5));
    }
}
