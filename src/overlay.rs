use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::models::Region;

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Draw a 2px box around every region on a copy of the frame
pub fn draw_regions(frame: &DynamicImage, regions: &[Region]) -> RgbImage {
    let mut canvas = frame.to_rgb8();
    for region in regions {
        draw_hollow_rect_mut(&mut canvas, region_rect(region, 0), BOX_COLOR);
        if region.width > 2 && region.height > 2 {
            draw_hollow_rect_mut(&mut canvas, region_rect(region, 1), BOX_COLOR);
        }
    }
    canvas
}

fn region_rect(region: &Region, inset: u32) -> Rect {
    Rect::at((region.x + inset) as i32, (region.y + inset) as i32)
        .of_size(region.width - 2 * inset, region.height - 2 * inset)
}
