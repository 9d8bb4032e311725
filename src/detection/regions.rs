use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use log::debug;
use std::collections::{BTreeMap, HashSet};

use crate::detection::foreground::{BACKGROUND, FOREGROUND};
use crate::models::{MotionSignal, Region};

/// Extracts regions from a foreground mask and drops the small ones
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFilter {
    pub min_area: f64,
}

impl RegionFilter {
    pub fn new(min_area: f64) -> Self {
        Self { min_area }
    }

    /// Regions with `area >= min_area`; motion iff at least one survives
    pub fn filter(&self, mask: &GrayImage) -> MotionSignal {
        let all_regions = find_regions(mask);
        let total = all_regions.len();

        let regions: Vec<Region> = all_regions
            .into_iter()
            .filter(|r| r.area as f64 >= self.min_area)
            .collect();

        debug!("Kept {} of {} regions (min_area {})", regions.len(), total, self.min_area);
        MotionSignal::from_regions(regions)
    }
}

/// Find the outer regions of a mask, in raster order of their first pixel.
///
/// Any non-zero pixel is foreground. Components are 8-connected. Only outer
/// boundaries are reported: a component sitting inside the hole of another
/// is folded into the enclosing region, and each region's area counts every
/// pixel inside its outer boundary.
pub fn find_regions(mask: &GrayImage) -> Vec<Region> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let filled = fill_enclosed(&binarize(mask));
    let labeled = connected_components(&filled, Connectivity::Eight, Luma([BACKGROUND]));

    let mut extents: BTreeMap<u32, (u32, u32, u32, u32, u32)> = BTreeMap::new();
    for (x, y, label) in labeled.enumerate_pixels() {
        let label = label[0];
        if label == 0 {
            continue;
        }

        extents
            .entry(label)
            .and_modify(|(min_x, min_y, max_x, max_y, count)| {
                *min_x = (*min_x).min(x);
                *min_y = (*min_y).min(y);
                *max_x = (*max_x).max(x);
                *max_y = (*max_y).max(y);
                *count += 1;
            })
            .or_insert((x, y, x, y, 1));
    }

    extents
        .into_values()
        .map(|(min_x, min_y, max_x, max_y, count)| Region::from_extent(min_x, min_y, max_x, max_y, count))
        .collect()
}

fn binarize(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        if mask.get_pixel(x, y)[0] > 0 {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Mark every background pixel that cannot reach the border as foreground.
///
/// Background is 4-connected, the dual of the 8-connected foreground, so the
/// remaining background is exactly what lies outside all outer boundaries.
fn fill_enclosed(binary: &GrayImage) -> GrayImage {
    let (width, height) = binary.dimensions();
    // labels the background pixels; foreground gets label 0
    let gaps = connected_components(binary, Connectivity::Four, Luma([FOREGROUND]));

    let mut outside = HashSet::new();
    for x in 0..width {
        outside.insert(gaps.get_pixel(x, 0)[0]);
        outside.insert(gaps.get_pixel(x, height - 1)[0]);
    }
    for y in 0..height {
        outside.insert(gaps.get_pixel(0, y)[0]);
        outside.insert(gaps.get_pixel(width - 1, y)[0]);
    }
    outside.remove(&0);

    GrayImage::from_fn(width, height, |x, y| {
        let label = gaps.get_pixel(x, y)[0];
        if label != 0 && outside.contains(&label) {
            Luma([BACKGROUND])
        } else {
            Luma([FOREGROUND])
        }
    })
}
