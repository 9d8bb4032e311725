use log::{debug, info};
use time::Duration;

use crate::config::MotionConfig;
use crate::error::{MotionError, Result};
use crate::models::{MotionEvent, MotionStatus, Timestamp};

/// Debounced scene state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// No motion on the last tick
    Quiescent,
    /// Motion seen, not yet confirmed
    Pending,
    /// Confirmed episode in progress
    Active,
}

impl DebounceState {
    pub fn status(&self) -> MotionStatus {
        match self {
            DebounceState::Active => MotionStatus::Active,
            DebounceState::Quiescent | DebounceState::Pending => MotionStatus::Quiescent,
        }
    }
}

/// Turns per-frame motion flags into rate-limited motion events.
///
/// An episode is confirmed after `min_motion_frames` consecutive positive
/// ticks, and two confirmed episodes are at least `min_upload_interval`
/// apart. Positive ticks inside that interval are ignored entirely; they do
/// not count towards the next episode.
#[derive(Debug, Clone)]
pub struct EventDebouncer {
    min_motion_frames: u32,
    min_upload_interval: Duration,
    state: DebounceState,
    consecutive_motion_count: u32,
    last_event_timestamp: Option<Timestamp>,
}

impl EventDebouncer {
    pub fn new(min_motion_frames: u32, min_upload_interval: Duration) -> Result<Self> {
        if min_motion_frames < 1 {
            return Err(MotionError::config("min_motion_frames must be at least 1"));
        }
        if min_upload_interval.is_negative() {
            return Err(MotionError::config(format!(
                "min_upload_seconds must be a non-negative duration, got {}",
                min_upload_interval
            )));
        }

        Ok(Self {
            min_motion_frames,
            min_upload_interval,
            state: DebounceState::Quiescent,
            consecutive_motion_count: 0,
            last_event_timestamp: None,
        })
    }

    pub fn from_config(config: &MotionConfig) -> Result<Self> {
        Self::new(config.min_motion_frames, config.min_upload_interval())
    }

    /// Feed one tick. Returns the event confirmed on this tick, if any.
    pub fn update(&mut self, motion_detected: bool, timestamp: Timestamp) -> Option<MotionEvent> {
        if !motion_detected {
            if self.state != DebounceState::Quiescent {
                debug!("Debounce: {:?} -> Quiescent", self.state);
            }
            self.consecutive_motion_count = 0;
            self.state = DebounceState::Quiescent;
            return None;
        }

        if self.within_upload_interval(timestamp) {
            return None;
        }

        self.consecutive_motion_count += 1;

        if self.consecutive_motion_count >= self.min_motion_frames {
            self.last_event_timestamp = Some(timestamp);
            self.consecutive_motion_count = 0;
            self.state = DebounceState::Active;

            info!("Motion episode confirmed at {}", timestamp);
            return Some(MotionEvent {
                timestamp,
                status: MotionStatus::Active,
            });
        }

        // an active episode stays active while it counts towards reaffirmation
        if self.state == DebounceState::Quiescent {
            debug!("Debounce: Quiescent -> Pending");
            self.state = DebounceState::Pending;
        }
        None
    }

    fn within_upload_interval(&self, timestamp: Timestamp) -> bool {
        match self.last_event_timestamp {
            Some(last) => timestamp - last < self.min_upload_interval,
            None => false,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn consecutive_motion_count(&self) -> u32 {
        self.consecutive_motion_count
    }

    pub fn last_event_timestamp(&self) -> Option<Timestamp> {
        self.last_event_timestamp
    }

    pub fn min_motion_frames(&self) -> u32 {
        self.min_motion_frames
    }

    pub fn min_upload_interval(&self) -> Duration {
        self.min_upload_interval
    }
}
