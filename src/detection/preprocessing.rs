use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use imageproc::filter::gaussian_blur_f32;

/// Resize to `width`, scaling height to keep the aspect ratio
pub fn resize_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
    if img.width() == width {
        return img.clone();
    }
    let height = scaled_height(img.width(), img.height(), width);
    DynamicImage::ImageRgba8(imageops::resize(img, width, height, FilterType::Triangle))
}

fn scaled_height(src_width: u32, src_height: u32, width: u32) -> u32 {
    let ratio = width as f64 / src_width.max(1) as f64;
    ((src_height as f64 * ratio).round() as u32).max(1)
}

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to reduce sensor noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return img.clone();
    }
    gaussian_blur_f32(img, sigma)
}

/// Full frame preparation: optional resize, grayscale, blur.
///
/// Returns the resized color frame too, since overlays are drawn on it.
pub fn prepare(img: &DynamicImage, resize_width: Option<u32>, sigma: f32) -> (DynamicImage, GrayImage) {
    let resized = match resize_width {
        Some(width) => resize_to_width(img, width),
        None => img.clone(),
    };
    let gray = apply_blur(&to_grayscale(&resized), sigma);
    (resized, gray)
}
