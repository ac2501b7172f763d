// Engine construction parameters

use std::path::{Path, PathBuf};

/// Default frame rate the loop paces itself to
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Default window title (the FPS counter is appended at runtime)
pub const DEFAULT_TITLE: &str = "Simple Engine";

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be a positive integer")]
    ZeroDimension(&'static str),

    #[error("Target frame rate must be at least 1")]
    InvalidFps,

    #[error("Window size {width}x{height} at pixel size {pixel_size} does not fit in u32")]
    WindowTooLarge {
        width: u32,
        height: u32,
        pixel_size: u32,
    },
}

/// Engine configuration
///
/// The drawing surface is `width` x `height` logical pixels; the window is
/// that size multiplied by `pixel_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub pixel_size: u32,
    pub title: String,
    pub target_fps: u32,
    /// Base directory for relative image, sound and font paths
    pub asset_root: PathBuf,
}

impl EngineConfig {
    /// Create a configuration with default title, frame rate and asset root
    pub fn new(width: u32, height: u32, pixel_size: u32) -> Self {
        Self {
            width,
            height,
            pixel_size,
            title: DEFAULT_TITLE.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            asset_root: PathBuf::from("."),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_asset_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.asset_root = root.as_ref().to_path_buf();
        self
    }

    /// Check that every dimension is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroDimension("width"));
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroDimension("height"));
        }
        if self.pixel_size == 0 {
            return Err(ConfigError::ZeroDimension("pixel_size"));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::InvalidFps);
        }
        if self.width.checked_mul(self.pixel_size).is_none()
            || self.height.checked_mul(self.pixel_size).is_none()
        {
            return Err(ConfigError::WindowTooLarge {
                width: self.width,
                height: self.height,
                pixel_size: self.pixel_size,
            });
        }
        Ok(())
    }

    /// Window size in physical pixels, saturating on unvalidated configs
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.width.saturating_mul(self.pixel_size),
            self.height.saturating_mul(self.pixel_size),
        )
    }
}
