use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use pixloop_core::{AnimationEncoder, Canvas, FrameTiming, LoopMode, PixloopError, PixloopResult};

use crate::{check_frames, ensure_parent};

/// Lossless animated PNG output via the `png` crate.
#[derive(Debug, Clone)]
pub struct ApngEncoder {
    path: PathBuf,
}

impl ApngEncoder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnimationEncoder for ApngEncoder {
    fn encode(&mut self, frames: &[Canvas], timing: &FrameTiming) -> PixloopResult<()> {
        let (width, height) = check_frames(frames, "APNG")?;

        // Delay is stored as a fraction of a second: delay_ms / 1000.
        let delay_num = u16::try_from(timing.delay_ms).map_err(|_| {
            PixloopError::Encode(format!("frame delay {} ms is too long for APNG", timing.delay_ms))
        })?;
        let plays = match timing.repeat {
            LoopMode::Infinite => 0,
            LoopMode::Finite(n) => n as u32,
        };

        ensure_parent(&self.path)?;
        let file = File::create(&self.path)
            .map_err(|e| PixloopError::Encode(format!("failed to create APNG file: {}", e)))?;

        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .set_animated(frames.len() as u32, plays)
            .map_err(|e| PixloopError::Encode(format!("failed to set APNG animation: {}", e)))?;
        encoder
            .set_frame_delay(delay_num, 1000)
            .map_err(|e| PixloopError::Encode(format!("failed to set APNG frame delay: {}", e)))?;

        let mut writer = encoder
            .write_header()
            .map_err(|e| PixloopError::Encode(format!("failed to write APNG header: {}", e)))?;

        for (i, frame) in frames.iter().enumerate() {
            writer
                .write_image_data(frame.as_raw())
                .map_err(|e| {
                    PixloopError::Encode(format!("failed to write APNG frame {}: {}", i, e))
                })?;
        }

        writer
            .finish()
            .map_err(|e| PixloopError::Encode(format!("failed to finalize APNG: {}", e)))?;

        tracing::info!(
            frames = frames.len(),
            width,
            height,
            delay_ms = timing.delay_ms,
            path = %self.path.display(),
            "encoded APNG"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixloop_core::Rgb;

    #[test]
    fn test_apng_encode_empty_frames() {
        let out = std::env::temp_dir().join("pixloop_test_empty.png");
        let timing = FrameTiming {
            delay_ms: 83,
            repeat: LoopMode::Infinite,
        };
        assert!(ApngEncoder::new(&out).encode(&[], &timing).is_err());
    }

    #[test]
    fn test_apng_encode_solid_frames() {
        let frames: Vec<Canvas> = (0..3)
            .map(|i| Canvas::solid(4, 4, Rgb::new(0, i * 50, 255)))
            .collect();
        let timing = FrameTiming {
            delay_ms: 83,
            repeat: LoopMode::Finite(2),
        };

        let out = std::env::temp_dir().join("pixloop_test_apng.png");
        let result = ApngEncoder::new(&out).encode(&frames, &timing);
        assert!(result.is_ok(), "APNG encode failed: {:?}", result.err());

        let mut reader = png::Decoder::new(File::open(&out).unwrap())
            .read_info()
            .unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (4, 4));
        let actl = info.animation_control.expect("animated PNG");
        assert_eq!(actl.num_frames, 3);
        assert_eq!(actl.num_plays, 2);

        // Lossless: the first frame decodes back to the same canvas.
        let mut buf = vec![0; reader.output_buffer_size()];
        let output = reader.next_frame(&mut buf).unwrap();
        buf.truncate(output.buffer_size());
        assert_eq!(Canvas::from_raw(4, 4, buf).as_ref(), Some(&frames[0]));

        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_apng_rejects_overlong_delay() {
        let out = std::env::temp_dir().join("pixloop_test_overlong.png");
        let timing = FrameTiming {
            delay_ms: 70_000,
            repeat: LoopMode::Infinite,
        };
        let result = ApngEncoder::new(&out).encode(&[Canvas::new(2, 2)], &timing);
        assert!(matches!(result, Err(PixloopError::Encode(_))));
    }
}
