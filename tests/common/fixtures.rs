use image::{DynamicImage, Rgb, RgbImage};
use motionwatch::{CapturedFrame, MotionConfig, Timestamp};
use time::{Duration, OffsetDateTime};

pub const WIDTH: u32 = 160;
pub const HEIGHT: u32 = 120;

/// Intensity of the static scene
pub const SCENE: u8 = 100;

/// Location of the synthetic blob: 40x25 = 1000 pixels
pub const BLOB: (u32, u32, u32, u32) = (60, 40, 40, 25);

/// Timestamp `ms` milliseconds after the epoch
pub fn at_millis(ms: i64) -> Timestamp {
    OffsetDateTime::UNIX_EPOCH + Duration::milliseconds(ms)
}

/// Config from the reference scenario, with resizing and blur disabled so
/// mask areas are exact.
pub fn scenario_config() -> MotionConfig {
    MotionConfig {
        min_area: 500.0,
        delta_thresh: 5,
        min_motion_frames: 8,
        min_upload_seconds: 3.0,
        alpha: 0.5,
        resize_width: None,
        blur_sigma: 0.0,
        ..MotionConfig::default()
    }
}

pub fn static_frame() -> DynamicImage {
    static_frame_sized(WIDTH, HEIGHT)
}

pub fn static_frame_sized(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([SCENE, SCENE, SCENE])))
}

/// Static scene with a filled rectangle of the given intensity
pub fn frame_with_blob(x: u32, y: u32, width: u32, height: u32, value: u8) -> DynamicImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([SCENE, SCENE, SCENE]));
    for py in y..y + height {
        for px in x..x + width {
            img.put_pixel(px, py, Rgb([value, value, value]));
        }
    }
    DynamicImage::ImageRgb8(img)
}

/// The reference blob, alternating between white and black on every tick so
/// the background never absorbs it.
pub fn flickering_blob(tick: usize) -> DynamicImage {
    let (x, y, w, h) = BLOB;
    let value = if tick % 2 == 0 { 255 } else { 0 };
    frame_with_blob(x, y, w, h, value)
}

/// 1 static frame, 10 flickering-blob frames, 5 static frames, 100ms apart
pub fn scenario_frames() -> Vec<CapturedFrame> {
    let mut frames = vec![static_frame()];
    frames.extend((0..10).map(flickering_blob));
    frames.extend((0..5).map(|_| static_frame()));

    frames
        .into_iter()
        .enumerate()
        .map(|(i, image)| CapturedFrame::new(image, at_millis(i as i64 * 100)))
        .collect()
}
