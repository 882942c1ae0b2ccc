//! Frame sequence building and encoder hand-off.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use pixloop_core::hash::{self, ContentHash};
use pixloop_core::{AnimationEncoder, Canvas, FrameTiming, LoopMode, PixloopError, PixloopResult};

use crate::compositor::FrameSource;

/// The complete, ordered output of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Canvas>,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// `1000 / fps`, the uniform per-frame display duration.
    pub frame_duration_ms: u32,
}

impl FrameSequence {
    pub fn frames(&self) -> &[Canvas] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Canvas> {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Canvas> {
        self.frames.get(index)
    }

    /// Hash of every frame, dimensions included. Two renders of the same
    /// scene and seeds produce the same hash.
    pub fn content_hash(&self) -> ContentHash {
        hash::hash_canvases(&self.frames)
    }

    pub fn frame_hash(&self, index: usize) -> Option<ContentHash> {
        self.frames.get(index).map(hash::hash_canvas)
    }

    pub fn timing(&self, repeat: LoopMode) -> FrameTiming {
        FrameTiming {
            delay_ms: self.frame_duration_ms,
            repeat,
        }
    }

    /// Pass the whole sequence, in index order, to `encoder` in a single
    /// call. Encoder failures are returned as-is; nothing is retried.
    pub fn hand_off(
        &self,
        encoder: &mut dyn AnimationEncoder,
        repeat: LoopMode,
    ) -> PixloopResult<()> {
        let timing = self.timing(repeat);
        debug!(
            frames = self.len(),
            delay_ms = timing.delay_ms,
            "handing sequence to encoder"
        );
        encoder.encode(&self.frames, &timing)
    }
}

/// Drives a [`FrameSource`] over `0..total_frames`.
pub struct SequenceBuilder;

impl SequenceBuilder {
    /// Render every frame. Frames are independent, so with
    /// `settings.parallel` they are spread over the rayon pool and collected
    /// back in index order.
    pub fn render(source: &dyn FrameSource) -> PixloopResult<FrameSequence> {
        let settings = source.settings();
        settings.ensure_valid()?;

        let total_frames = settings.total_frames;
        let start = Instant::now();
        let frames: Vec<Canvas> = if settings.parallel {
            (0..total_frames)
                .into_par_iter()
                .map(|frame| source.render_frame(frame))
                .collect()
        } else {
            (0..total_frames).map(|frame| source.render_frame(frame)).collect()
        };

        info!(
            scene = source.name(),
            frames = frames.len(),
            parallel = settings.parallel,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "rendered frame sequence"
        );

        Ok(FrameSequence {
            frames,
            width: settings.width,
            height: settings.height,
            fps: settings.fps,
            frame_duration_ms: settings.frame_duration_ms(),
        })
    }

    /// Render exactly one frame by index, without rendering any other.
    pub fn render_frame(source: &dyn FrameSource, index: u64) -> PixloopResult<Canvas> {
        let total = source.settings().total_frames;
        if index >= total {
            return Err(PixloopError::FrameOutOfRange { index, total });
        }
        Ok(source.render_frame(index))
    }
}
