//! # pixloop-encode
//!
//! Packages an ordered frame sequence into one looping animated image.
//! Both encoders implement [`AnimationEncoder`] and accept frames in the
//! order they should play.

pub mod apng;
pub mod gif;

use std::path::PathBuf;

use pixloop_core::{AnimationEncoder, Canvas, OutputFormat, PixloopError, PixloopResult};

pub use apng::ApngEncoder;
pub use gif::GifEncoder;

/// Build the encoder for `format`, writing to `path`.
pub fn encoder_for(format: OutputFormat, path: impl Into<PathBuf>) -> Box<dyn AnimationEncoder> {
    match format {
        OutputFormat::Gif => Box::new(GifEncoder::new(path)),
        OutputFormat::Apng => Box::new(ApngEncoder::new(path)),
    }
}

/// Reject empty sequences and frames whose size differs from the first.
/// Returns the common `(width, height)`.
pub(crate) fn check_frames(frames: &[Canvas], format: &str) -> PixloopResult<(u32, u32)> {
    let first = frames
        .first()
        .ok_or_else(|| PixloopError::Encode(format!("no frames to encode for {}", format)))?;
    let (width, height) = (first.width(), first.height());
    for (i, frame) in frames.iter().enumerate() {
        if frame.width() != width || frame.height() != height {
            return Err(PixloopError::Encode(format!(
                "frame {} has dimensions {}x{}, expected {}x{}",
                i,
                frame.width(),
                frame.height(),
                width,
                height
            )));
        }
    }
    Ok((width, height))
}

/// Create the parent directory of `path` if needed.
pub(crate) fn ensure_parent(path: &std::path::Path) -> PixloopResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixloop_core::Rgb;

    #[test]
    fn test_check_frames_empty() {
        let err = check_frames(&[], "GIF").unwrap_err();
        assert!(err.to_string().contains("no frames"));
    }

    #[test]
    fn test_check_frames_mismatch() {
        let frames = vec![Canvas::new(4, 4), Canvas::new(4, 4), Canvas::new(5, 4)];
        let err = check_frames(&frames, "GIF").unwrap_err();
        assert!(err.to_string().contains("frame 2 has dimensions 5x4"));
    }

    #[test]
    fn test_check_frames_ok() {
        let frames = vec![Canvas::solid(3, 2, Rgb::RED); 4];
        assert_eq!(check_frames(&frames, "APNG").unwrap(), (3, 2));
    }
}
