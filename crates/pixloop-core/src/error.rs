/// Core error types for the Pixloop engine.
use std::path::PathBuf;

/// A specialized Result type for Pixloop operations.
pub type PixloopResult<T> = Result<T, PixloopError>;

/// Top-level error type encompassing all Pixloop subsystems.
///
/// Rendering itself has no error path: once settings and entity sets are
/// validated, drawing is pure computation. Everything here is raised either
/// at scene-build time or at the encoder boundary.
#[derive(Debug, thiserror::Error)]
pub enum PixloopError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("entity set '{0}' must contain at least one record")]
    EmptyEntitySet(&'static str),

    #[error("unknown scene: {0}")]
    UnknownScene(String),

    #[error("frame {index} out of range (sequence has {total} frames)")]
    FrameOutOfRange { index: u64, total: u64 },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("config error: {message} ({path:?})")]
    Config { message: String, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PixloopError {
    /// Create a config-file error.
    pub fn config(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        PixloopError::Config {
            message: message.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_entity_set_display() {
        let err = PixloopError::EmptyEntitySet("stars");
        assert_eq!(
            err.to_string(),
            "entity set 'stars' must contain at least one record"
        );
    }

    #[test]
    fn test_frame_out_of_range_display() {
        let err = PixloopError::FrameOutOfRange {
            index: 60,
            total: 60,
        };
        assert_eq!(
            err.to_string(),
            "frame 60 out of range (sequence has 60 frames)"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = PixloopError::config("expected a table", "pixloop.toml");
        assert!(err.to_string().contains("expected a table"));
        assert!(err.to_string().contains("pixloop.toml"));
    }
}
