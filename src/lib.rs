pub mod config;
pub mod debounce;
pub mod detection;
pub mod error;
pub mod models;
pub mod overlay;
pub mod pipeline;
pub mod runner;
pub mod source;

pub use config::MotionConfig;
pub use debounce::{DebounceState, EventDebouncer};
pub use detection::{BackgroundModel, ForegroundExtractor, RegionFilter};
pub use error::{MotionError, Result};
pub use models::{MotionEvent, MotionSignal, MotionStatus, Region, Timestamp};
pub use pipeline::{DebugConfig, EventSink, MotionPipeline, RunSummary, TickOutcome};
pub use source::{CapturedFrame, FrameSource, ImageSequenceSource, MemorySource};
