use time::OffsetDateTime;

/// Wall-clock time attached to each captured frame
pub type Timestamp = OffsetDateTime;

/// One connected foreground component of a frame
///
/// Regions carry no identity: the set is rebuilt from scratch every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Pixels enclosed by the component's outer boundary, holes included
    pub area: u32,
}

impl Region {
    pub(crate) fn from_extent(min_x: u32, min_y: u32, max_x: u32, max_y: u32, area: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
            area,
        }
    }
}

/// Frame-level motion flag plus the regions that justified it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotionSignal {
    pub motion_detected: bool,
    pub regions: Vec<Region>,
}

impl MotionSignal {
    /// Signal with no motion and no regions
    pub fn quiescent() -> Self {
        Self::default()
    }

    pub fn from_regions(regions: Vec<Region>) -> Self {
        Self {
            motion_detected: !regions.is_empty(),
            regions,
        }
    }
}

/// Debounced scene status carried by events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionStatus {
    Active,
    Quiescent,
}

impl MotionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MotionStatus::Active => "Motion detected",
            MotionStatus::Quiescent => "Scene quiet",
        }
    }
}

/// A confirmed, rate-limited motion episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEvent {
    pub timestamp: Timestamp,
    pub status: MotionStatus,
}
