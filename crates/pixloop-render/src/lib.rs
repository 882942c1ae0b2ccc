//! # pixloop-render
//!
//! The Pixloop rendering engine. Builds a scene's seeded entity sets once,
//! then renders each frame index independently through the scene's
//! declared draw passes.

pub mod animate;
pub mod compositor;
pub mod entity;
pub mod paint;
pub mod scenes;
pub mod sequence;

pub use animate::Animate;
pub use compositor::{Compositor, DrawPass, FrameSource, PassInfo, PassKind, Scene};
pub use entity::{EntitySet, SeedSource};
pub use scenes::SceneKind;
pub use sequence::{FrameSequence, SequenceBuilder};
