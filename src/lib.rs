//! Framescrub - pointer-scrubbed image sequence viewer
//!
//! Preloads a fixed sequence of still frames and selects the visible frame
//! from the horizontal pointer position, so the subject appears to rotate as
//! the pointer sweeps across the viewport:
//! - Concurrent frame loading with per-frame failure isolation
//! - Pure position-to-frame mapping with a redundant-redraw guard
//! - Pluggable draw sink (terminal half-block renderer included)

pub mod canvas;
pub mod controller;
pub mod loader;
pub mod mapper;
pub mod store;
pub mod tui;

pub use canvas::{Canvas, NullCanvas};
pub use controller::{AnimationController, InputEvent, Status};
pub use loader::{Frame, FrameLoader, FsFrameLoader};
pub use mapper::map_to_frame;
pub use store::{FrameStore, LoadEvent, LoadState};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a frame sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// Directory containing the image sequence
    pub frames_dir: PathBuf,

    /// File name prefix shared by every frame
    pub prefix: String,

    /// File extension (without the dot)
    pub extension: String,

    /// Zero-pad width of the frame number in the file name
    pub pad_width: usize,

    /// Total number of frames in the sequence
    pub frame_count: usize,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        // Reference layout: source/image_sequence/pigeon0000.png ~ pigeon0124.png
        Self {
            frames_dir: PathBuf::from("source/image_sequence"),
            prefix: "pigeon".to_string(),
            extension: "png".to_string(),
            pad_width: 4,
            frame_count: 125,
        }
    }
}

impl ScrubConfig {
    pub fn new(frames_dir: PathBuf) -> Self {
        Self {
            frames_dir,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_pad_width(mut self, pad_width: usize) -> Self {
        self.pad_width = pad_width;
        self
    }

    pub fn with_frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = frame_count;
        self
    }

    /// Load a config from a TOML file. Missing keys fall back to defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// The sequence length must be at least one frame.
    pub fn validate(&self) -> Result<()> {
        if self.frame_count == 0 {
            return Err(ScrubError::InvalidFrameCount(self.frame_count));
        }
        Ok(())
    }

    /// Path for frame `index`: `{frames_dir}/{prefix}{index:0pad}.{extension}`.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.frames_dir.join(format!(
            "{}{:0width$}.{}",
            self.prefix,
            index,
            self.extension,
            width = self.pad_width
        ))
    }
}

/// Result type for framescrub operations
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Errors that can occur in framescrub
#[derive(Debug, thiserror::Error)]
pub enum ScrubError {
    #[error("frame count must be at least 1, got {0}")]
    InvalidFrameCount(usize),

    #[error("failed to decode frame image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}
