//! Per-frame motion detection: preprocessing, background model, foreground
//! mask and region filtering. Only the background model keeps state.

pub mod background;
pub mod foreground;
pub mod preprocessing;
pub mod regions;

pub use background::{BackgroundEstimate, BackgroundModel};
pub use foreground::ForegroundExtractor;
pub use regions::RegionFilter;
