use image::{GrayImage, ImageBuffer, Luma};
use log::info;

use crate::error::{MotionError, Result};

/// Per-pixel floating point background accumulator
pub type BackgroundEstimate = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Exponentially weighted running estimate of the static scene.
///
/// Once initialized the accumulator is only ever updated in place; a new
/// resolution requires `reset` followed by `initialize`.
#[derive(Debug, Clone, Default)]
pub struct BackgroundModel {
    estimate: Option<BackgroundEstimate>,
}

impl BackgroundModel {
    pub fn new() -> Self {
        Self { estimate: None }
    }

    /// Seed the accumulator from the first frame of a stream
    pub fn initialize(&mut self, frame: &GrayImage) {
        let (width, height) = frame.dimensions();
        info!("Starting background model at {}x{}", width, height);
        let data: Vec<f32> = frame.as_raw().iter().map(|&p| p as f32).collect();
        self.estimate = ImageBuffer::from_raw(width, height, data);
    }

    /// `estimate = alpha * frame + (1 - alpha) * estimate`, per pixel
    pub fn update(&mut self, frame: &GrayImage, alpha: f32) -> Result<&BackgroundEstimate> {
        let estimate = self
            .estimate
            .as_mut()
            .ok_or(MotionError::UninitializedState("background model updated before initialization"))?;

        if estimate.dimensions() != frame.dimensions() {
            return Err(MotionError::DimensionMismatch {
                expected: estimate.dimensions(),
                actual: frame.dimensions(),
            });
        }

        let keep = 1.0 - alpha;
        for (bg, &px) in estimate.iter_mut().zip(frame.as_raw()) {
            *bg = alpha * px as f32 + keep * *bg;
        }

        Ok(estimate)
    }

    pub fn estimate(&self) -> Option<&BackgroundEstimate> {
        self.estimate.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.estimate.is_some()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.estimate.as_ref().map(|e| e.dimensions())
    }

    /// Drop the accumulator, restarting warm-up
    pub fn reset(&mut self) {
        self.estimate = None;
    }
}
