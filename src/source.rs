use image::{DynamicImage, ImageFormat};
use log::debug;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use time::{Duration, OffsetDateTime};

use crate::error::{MotionError, Result};
use crate::models::Timestamp;

/// A decoded frame and the time it was captured
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub image: DynamicImage,
    pub timestamp: Timestamp,
}

impl CapturedFrame {
    pub fn new(image: DynamicImage, timestamp: Timestamp) -> Self {
        Self { image, timestamp }
    }
}

/// Anything that yields frames at a roughly fixed rate
pub trait FrameSource {
    /// `None` ends the stream. `Some(Err(..))` is a frame that could not be
    /// acquired; the caller skips it and asks for the next one.
    fn next_frame(&mut self) -> Option<Result<CapturedFrame>>;

    /// Human-readable name for this source (used in log output)
    fn name(&self) -> &str;
}

/// Replays a directory of still images in file name order.
///
/// Timestamps are synthesized as `start + index / fps` so replays are
/// reproducible regardless of decode speed.
pub struct ImageSequenceSource {
    name: String,
    paths: Vec<PathBuf>,
    next_index: usize,
    start: Timestamp,
    frame_interval: Duration,
}

impl ImageSequenceSource {
    pub fn open(dir: impl AsRef<Path>, fps: f64) -> Result<Self> {
        let dir = dir.as_ref();
        if !(fps.is_finite() && fps > 0.0) {
            return Err(MotionError::config(format!("fps must be positive, got {}", fps)));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && ImageFormat::from_path(path).is_ok())
            .collect();
        paths.sort();

        debug!("Found {} frames in {}", paths.len(), dir.display());

        Ok(Self {
            name: dir.display().to_string(),
            paths,
            next_index: 0,
            start: OffsetDateTime::now_utc(),
            frame_interval: Duration::seconds_f64(1.0 / fps),
        })
    }

    /// Set the timestamp of the first frame
    pub fn with_start(mut self, start: Timestamp) -> Self {
        self.start = start;
        self
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Option<Result<CapturedFrame>> {
        let path = self.paths.get(self.next_index)?;
        let timestamp = self.start + self.frame_interval * self.next_index as u32;
        self.next_index += 1;

        Some(
            image::open(path)
                .map(|image| CapturedFrame::new(image, timestamp))
                .map_err(MotionError::from),
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Frames that were decoded elsewhere, replayed with their own timestamps
pub struct MemorySource {
    name: String,
    frames: VecDeque<Result<CapturedFrame>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, frames: Vec<CapturedFrame>) -> Self {
        Self::from_results(name, frames.into_iter().map(Ok).collect())
    }

    /// Frames mixed with acquisition failures, in stream order
    pub fn from_results(name: impl Into<String>, frames: Vec<Result<CapturedFrame>>) -> Self {
        Self {
            name: name.into(),
            frames: frames.into(),
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Option<Result<CapturedFrame>> {
        self.frames.pop_front()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
