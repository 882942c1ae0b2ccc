use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PixloopError, PixloopResult};

/// Per-scene render parameters. Defaults reproduce the reference loops:
/// 128x128, 60 frames at 12 fps, entity seed 42, layout seed 99.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub total_frames: u64,
    pub fps: u32,
    /// Seed for the per-scene entity sets.
    pub entity_seed: u64,
    /// Seed for secondary fixed layouts, independent of the entity stream.
    pub layout_seed: u64,
    /// Render frames across the rayon pool.
    pub parallel: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            total_frames: 60,
            fps: 12,
            entity_seed: 42,
            layout_seed: 99,
            parallel: true,
        }
    }
}

impl RenderSettings {
    /// Per-frame display duration in whole milliseconds (`1000 / fps`).
    pub fn frame_duration_ms(&self) -> u32 {
        if self.fps == 0 {
            return 0;
        }
        1000 / self.fps
    }

    /// Check the settings before any scene is built.
    pub fn validate(&self) -> Result<(), Vec<PixloopError>> {
        let mut errors = Vec::new();

        if self.width == 0 || self.height == 0 {
            errors.push(PixloopError::InvalidConfig(format!(
                "canvas dimensions must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }

        if self.total_frames == 0 {
            errors.push(PixloopError::InvalidConfig(
                "total frame count must be positive".into(),
            ));
        }

        if self.fps == 0 {
            errors.push(PixloopError::InvalidConfig("fps must be positive".into()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Like [`validate`](Self::validate), but surfaces the first problem as
    /// a single hard error.
    pub fn ensure_valid(&self) -> PixloopResult<()> {
        self.validate()
            .map_err(|errors| errors.into_iter().next().unwrap_or_else(|| {
                PixloopError::InvalidConfig("invalid render settings".into())
            }))
    }
}

/// Container format for the encoded loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Gif,
    Apng,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Gif => "gif",
            OutputFormat::Apng => "png",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = PixloopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gif" => Ok(OutputFormat::Gif),
            "apng" | "png" => Ok(OutputFormat::Apng),
            other => Err(PixloopError::InvalidConfig(format!(
                "unsupported output format '{}' (expected gif or apng)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    pub format: OutputFormat,
    /// Number of loops; 0 = loop forever.
    pub loop_count: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "output".to_string(),
            format: OutputFormat::Gif,
            loop_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct PixloopConfig {
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

impl PixloopConfig {
    pub fn load_from_file(path: &Path) -> PixloopResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            PixloopError::Config { message, .. } => PixloopError::config(message, path),
            other => other,
        })
    }

    /// Load `path` if it exists, otherwise fall back to defaults. A file that
    /// exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> PixloopResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn from_toml_str(contents: &str) -> PixloopResult<Self> {
        toml::from_str(contents).map_err(|e| PixloopError::config(e.to_string(), "<inline>"))
    }

    pub fn to_toml_string(&self) -> PixloopResult<String> {
        toml::to_string_pretty(self).map_err(|e| PixloopError::config(e.to_string(), "<inline>"))
    }
}
