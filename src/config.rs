use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MotionError, Result};

/// Numeric parameters of the motion pipeline.
///
/// Loaded from a JSON file; keys that are not listed here (camera selection,
/// display toggles and the like) are ignored so legacy config files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Minimum region area (pixels) that counts as real motion
    pub min_area: f64,
    /// Foreground binarization threshold
    pub delta_thresh: u8,
    /// Consecutive positive ticks needed to confirm an episode
    pub min_motion_frames: u32,
    /// Minimum spacing between confirmed episodes, in seconds
    pub min_upload_seconds: f64,
    /// Background smoothing factor
    pub alpha: f32,
    /// Frames are resized to this width before analysis (aspect preserved)
    pub resize_width: Option<u32>,
    /// Gaussian blur sigma applied to the grayscale frame, 0 disables
    pub blur_sigma: f32,
    /// Half-size of the square dilation element
    pub dilate_radius: u8,
    /// Number of dilation passes
    pub dilate_iterations: u32,
    /// Frame rate used by replay sources to derive timestamps
    pub fps: f64,
    /// Seconds to wait before reading the first frame
    pub camera_warmup_time: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            min_area: 5000.0,
            delta_thresh: 5,
            min_motion_frames: 8,
            min_upload_seconds: 3.0,
            alpha: 0.5,
            resize_width: Some(500),
            blur_sigma: 3.5,
            dilate_radius: 1,
            dilate_iterations: 2,
            fps: 16.0,
            camera_warmup_time: 0.0,
        }
    }
}

impl MotionConfig {
    /// Parse a config from a JSON string and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MotionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file and validate it
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Check every parameter, naming the first offending key
    pub fn validate(&self) -> Result<()> {
        if !(self.min_area.is_finite() && self.min_area > 0.0) {
            return Err(MotionError::config(format!(
                "min_area must be positive, got {}",
                self.min_area
            )));
        }
        if self.delta_thresh == 0 {
            return Err(MotionError::config("delta_thresh must be in 1..=255"));
        }
        if self.min_motion_frames < 1 {
            return Err(MotionError::config("min_motion_frames must be at least 1"));
        }
        if !(self.min_upload_seconds.is_finite() && self.min_upload_seconds >= 0.0) {
            return Err(MotionError::config(format!(
                "min_upload_seconds must be a non-negative duration, got {}",
                self.min_upload_seconds
            )));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(MotionError::config(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.resize_width == Some(0) {
            return Err(MotionError::config("resize_width must be at least 1"));
        }
        if !(self.blur_sigma.is_finite() && self.blur_sigma >= 0.0) {
            return Err(MotionError::config(format!(
                "blur_sigma must be non-negative, got {}",
                self.blur_sigma
            )));
        }
        if self.dilate_radius == 0 {
            return Err(MotionError::config("dilate_radius must be at least 1"));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(MotionError::config(format!("fps must be positive, got {}", self.fps)));
        }
        if !(self.camera_warmup_time.is_finite() && self.camera_warmup_time >= 0.0) {
            return Err(MotionError::config(format!(
                "camera_warmup_time must be non-negative, got {}",
                self.camera_warmup_time
            )));
        }
        Ok(())
    }

    /// `min_upload_seconds` as a duration
    pub fn min_upload_interval(&self) -> time::Duration {
        time::Duration::seconds_f64(self.min_upload_seconds)
    }
}
