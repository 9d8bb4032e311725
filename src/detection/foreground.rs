use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate_mut;

use crate::config::MotionConfig;
use crate::detection::background::BackgroundEstimate;
use crate::error::{MotionError, Result};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Turns a frame and the background estimate into a binary foreground mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForegroundExtractor {
    pub threshold: u8,
    /// Square structuring element of side `2 * dilate_radius + 1`
    pub dilate_radius: u8,
    pub dilate_iterations: u32,
}

impl ForegroundExtractor {
    pub fn new(threshold: u8, dilate_radius: u8, dilate_iterations: u32) -> Self {
        Self {
            threshold,
            dilate_radius,
            dilate_iterations,
        }
    }

    pub fn from_config(config: &MotionConfig) -> Self {
        Self::new(config.delta_thresh, config.dilate_radius, config.dilate_iterations)
    }

    /// Difference, threshold and dilate.
    ///
    /// Pixels whose absolute difference from the rounded background is at
    /// least `threshold` become foreground (255), the rest 0.
    pub fn extract(&self, frame: &GrayImage, background: &BackgroundEstimate) -> Result<GrayImage> {
        if frame.dimensions() != background.dimensions() {
            return Err(MotionError::DimensionMismatch {
                expected: background.dimensions(),
                actual: frame.dimensions(),
            });
        }

        let mut mask = threshold_delta(frame, background, self.threshold);
        self.dilate(&mut mask);
        Ok(mask)
    }

    fn dilate(&self, mask: &mut GrayImage) {
        for _ in 0..self.dilate_iterations {
            dilate_mut(mask, Norm::LInf, self.dilate_radius);
        }
    }
}

/// `|frame - background|` thresholded to 0/255, without morphology
pub fn threshold_delta(frame: &GrayImage, background: &BackgroundEstimate, threshold: u8) -> GrayImage {
    let (width, height) = frame.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let bg = background.get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8;
        if frame.get_pixel(x, y)[0].abs_diff(bg) >= threshold {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}
