//! The hand-off point between rendering and packaging.
//!
//! Renderers produce an ordered slice of equally sized canvases; an
//! [`AnimationEncoder`] turns them into one looping artifact. Concrete
//! encoders live in `pixloop-encode`.

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::error::PixloopResult;

/// How many times the animation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    Infinite,
    Finite(u16),
}

impl LoopMode {
    /// Map a loop count where 0 means "forever".
    pub fn from_count(count: u16) -> Self {
        match count {
            0 => LoopMode::Infinite,
            n => LoopMode::Finite(n),
        }
    }
}

/// Uniform per-frame timing metadata passed alongside the frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTiming {
    /// Display duration of every frame, in milliseconds.
    pub delay_ms: u32,
    pub repeat: LoopMode,
}

/// Consumes an ordered frame sequence and persists an animated image.
///
/// Frames are composed in the order given. Implementations must reject
/// empty input and frames whose dimensions differ from the first.
pub trait AnimationEncoder {
    fn encode(&mut self, frames: &[Canvas], timing: &FrameTiming) -> PixloopResult<()>;
}
