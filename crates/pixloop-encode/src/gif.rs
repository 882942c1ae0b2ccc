use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::Repeat;
use pixloop_core::{AnimationEncoder, Canvas, FrameTiming, LoopMode, PixloopError, PixloopResult};

use crate::{check_frames, ensure_parent};

/// Animated GIF output via the `image` crate.
///
/// GIF stores delays in centiseconds, so `delay_ms` is rounded down to the
/// nearest 10 ms by the format.
#[derive(Debug, Clone)]
pub struct GifEncoder {
    path: PathBuf,
}

impl GifEncoder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnimationEncoder for GifEncoder {
    fn encode(&mut self, frames: &[Canvas], timing: &FrameTiming) -> PixloopResult<()> {
        let (width, height) = check_frames(frames, "GIF")?;

        ensure_parent(&self.path)?;
        let file = File::create(&self.path)
            .map_err(|e| PixloopError::Encode(format!("failed to create GIF file: {}", e)))?;
        let mut encoder = image::codecs::gif::GifEncoder::new_with_speed(BufWriter::new(file), 10);

        let repeat = match timing.repeat {
            LoopMode::Infinite => Repeat::Infinite,
            LoopMode::Finite(n) => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| PixloopError::Encode(format!("failed to set GIF repeat: {}", e)))?;

        let delay = image::Delay::from_numer_denom_ms(timing.delay_ms, 1);
        for (i, frame) in frames.iter().enumerate() {
            let rgba: Vec<u8> = frame
                .as_raw()
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect();
            let image = image::RgbaImage::from_raw(width, height, rgba)
                .ok_or_else(|| PixloopError::Encode(format!("invalid frame data at frame {}", i)))?;
            encoder
                .encode_frame(image::Frame::from_parts(image, 0, 0, delay))
                .map_err(|e| {
                    PixloopError::Encode(format!("failed to encode GIF frame {}: {}", i, e))
                })?;
        }

        tracing::info!(
            frames = frames.len(),
            width,
            height,
            delay_ms = timing.delay_ms,
            path = %self.path.display(),
            "encoded GIF"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::AnimationDecoder;
    use pixloop_core::Rgb;

    fn timing() -> FrameTiming {
        FrameTiming {
            delay_ms: 83,
            repeat: LoopMode::Infinite,
        }
    }

    #[test]
    fn test_gif_encode_empty_frames() {
        let out = std::env::temp_dir().join("pixloop_test_empty.gif");
        let result = GifEncoder::new(&out).encode(&[], &timing());
        assert!(matches!(result, Err(PixloopError::Encode(_))));
        assert!(!out.exists());
    }

    #[test]
    fn test_gif_encode_rejects_mismatched_frames() {
        let out = std::env::temp_dir().join("pixloop_test_mismatch.gif");
        let frames = vec![Canvas::new(4, 4), Canvas::new(8, 4)];
        assert!(GifEncoder::new(&out).encode(&frames, &timing()).is_err());
    }

    #[test]
    fn test_gif_encode_solid_frames() {
        let frames: Vec<Canvas> = (0..5)
            .map(|i| Canvas::solid(4, 4, Rgb::new(255, i * 50, 0)))
            .collect();

        let out = std::env::temp_dir().join("pixloop_test_gif.gif");
        let result = GifEncoder::new(&out).encode(&frames, &timing());
        assert!(result.is_ok(), "GIF encode failed: {:?}", result.err());

        let file = std::io::BufReader::new(File::open(&out).unwrap());
        let decoded = image::codecs::gif::GifDecoder::new(file)
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded[0].buffer().dimensions(), (4, 4));

        let _ = std::fs::remove_file(&out);
    }
}
