//! The built-in scenes.

pub mod campfire;
pub mod snow;
pub mod space;
pub mod underwater;

use std::fmt;
use std::str::FromStr;

use pixloop_core::{PixloopError, PixloopResult, RenderSettings};

use crate::compositor::{Compositor, FrameSource, Scene};

pub use campfire::Campfire;
pub use snow::Snow;
pub use space::Space;
pub use underwater::Underwater;

/// Selects one of the built-in scenes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Campfire,
    Snow,
    Space,
    Underwater,
}

impl SceneKind {
    pub const ALL: [SceneKind; 4] = [
        SceneKind::Campfire,
        SceneKind::Snow,
        SceneKind::Space,
        SceneKind::Underwater,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Campfire => Campfire::NAME,
            SceneKind::Snow => Snow::NAME,
            SceneKind::Space => Space::NAME,
            SceneKind::Underwater => Underwater::NAME,
        }
    }

    /// Validate settings and build the scene behind a type-erased handle.
    pub fn build(&self, settings: &RenderSettings) -> PixloopResult<Box<dyn FrameSource>> {
        Ok(match self {
            SceneKind::Campfire => Box::new(Compositor::<Campfire>::build(settings)?),
            SceneKind::Snow => Box::new(Compositor::<Snow>::build(settings)?),
            SceneKind::Space => Box::new(Compositor::<Space>::build(settings)?),
            SceneKind::Underwater => Box::new(Compositor::<Underwater>::build(settings)?),
        })
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = PixloopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| PixloopError::UnknownScene(s.to_string()))
    }
}
