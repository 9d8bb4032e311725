#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from motionwatch for tests
pub use motionwatch::{
    CapturedFrame, DebounceState, EventDebouncer, FrameSource, ImageSequenceSource, MemorySource,
    MotionConfig, MotionError, MotionEvent, MotionPipeline, MotionStatus, Region, Timestamp,
};
