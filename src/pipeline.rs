use image::{DynamicImage, GrayImage};
use log::{debug, info, warn};
use std::path::PathBuf;

use crate::config::MotionConfig;
use crate::debounce::{DebounceState, EventDebouncer};
use crate::detection::background::BackgroundModel;
use crate::detection::foreground::ForegroundExtractor;
use crate::detection::preprocessing;
use crate::detection::regions::RegionFilter;
use crate::error::{MotionError, Result};
use crate::models::{MotionEvent, MotionSignal, Timestamp};
use crate::overlay;
use crate::source::FrameSource;

const GRAYSCALE_DIR: &str = "01_grayscale";
const MASK_DIR: &str = "02_foreground_mask";
const REGIONS_DIR: &str = "03_regions";

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// Save one stage image as `<stage>/<tick>.png`
    fn save(&self, stage: &str, tick: u64, image: &DynamicImage) -> Result<()> {
        let path = self.output_dir.join(stage).join(format!("{:06}.png", tick));
        image.save(&path)?;
        Ok(())
    }
}

/// Everything a single tick produced
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// 1-based tick number within the stream
    pub tick: u64,
    /// The background model was (re)initialized on this tick
    pub warm_up: bool,
    pub signal: MotionSignal,
    /// Debounced state after this tick
    pub state: DebounceState,
    pub event: Option<MotionEvent>,
}

/// Receives confirmed motion events
pub trait EventSink {
    fn on_event(&mut self, event: &MotionEvent);
}

impl EventSink for Vec<MotionEvent> {
    fn on_event(&mut self, event: &MotionEvent) {
        self.push(*event);
    }
}

/// Counters for one `run` over a frame source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub skipped_frames: u64,
    pub background_resets: u64,
    pub events: u64,
}

/// One stream's motion pipeline: background model, mask, regions, debounce.
///
/// Owns all per-stream state; run one instance per stream.
pub struct MotionPipeline {
    config: MotionConfig,
    name: String,
    background: BackgroundModel,
    extractor: ForegroundExtractor,
    region_filter: RegionFilter,
    debouncer: EventDebouncer,
    debug: Option<DebugConfig>,
    ticks: u64,
}

impl MotionPipeline {
    /// Build a pipeline, rejecting invalid configuration up front
    pub fn new(config: MotionConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            extractor: ForegroundExtractor::from_config(&config),
            region_filter: RegionFilter::new(config.min_area),
            debouncer: EventDebouncer::from_config(&config)?,
            background: BackgroundModel::new(),
            name: "stream".to_string(),
            debug: None,
            ticks: 0,
            config,
        })
    }

    /// Name used to prefix log lines
    pub fn with_stream_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(MotionError::config(format!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        }

        for stage in [GRAYSCALE_DIR, MASK_DIR, REGIONS_DIR] {
            std::fs::create_dir_all(output_dir.join(stage))?;
        }

        self.debug = Some(DebugConfig { output_dir });

        Ok(self)
    }

    /// Process one frame.
    ///
    /// The first frame of a stream only seeds the background and never
    /// reports motion. A frame whose resolution differs from the background
    /// reseeds it and returns `DimensionMismatch` once; the next tick
    /// proceeds normally.
    pub fn tick(&mut self, frame: &DynamicImage, timestamp: Timestamp) -> Result<TickOutcome> {
        self.ticks += 1;
        let tick = self.ticks;

        let (resized, gray) =
            preprocessing::prepare(frame, self.config.resize_width, self.config.blur_sigma);

        if !self.background.is_initialized() {
            self.background.initialize(&gray);
            self.save_debug(tick, &gray, None, &resized, &MotionSignal::quiescent());
            self.debouncer.update(false, timestamp);
            return Ok(TickOutcome {
                tick,
                warm_up: true,
                signal: MotionSignal::quiescent(),
                state: self.debouncer.state(),
                event: None,
            });
        }

        let updated = self.background.update(&gray, self.config.alpha).map(|_| ());
        if let Err(err) = updated {
            if err.is_recoverable() {
                warn!("[{}] {}; restarting background model", self.name, err);
                self.background.reset();
                self.background.initialize(&gray);
            }
            return Err(err);
        }

        let background = self
            .background
            .estimate()
            .ok_or(MotionError::UninitializedState("background estimate missing after update"))?;
        let mask = self.extractor.extract(&gray, background)?;
        let signal = self.region_filter.filter(&mask);

        let event = self.debouncer.update(signal.motion_detected, timestamp);

        debug!(
            "[{}] tick {}: {} regions, motion={}, state={:?}, count={}",
            self.name,
            tick,
            signal.regions.len(),
            signal.motion_detected,
            self.debouncer.state(),
            self.debouncer.consecutive_motion_count()
        );

        self.save_debug(tick, &gray, Some(&mask), &resized, &signal);

        Ok(TickOutcome {
            tick,
            warm_up: false,
            signal,
            state: self.debouncer.state(),
            event,
        })
    }

    /// Drive a frame source to exhaustion, forwarding events to `sink`.
    ///
    /// Frames that fail to decode are skipped; dimension changes reseed the
    /// background. Any other error stops the stream.
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> Result<RunSummary>
    where
        S: FrameSource + ?Sized,
        K: EventSink + ?Sized,
    {
        if self.config.camera_warmup_time > 0.0 {
            info!("[{}] Warming up camera for {:.1}s", self.name, self.config.camera_warmup_time);
            std::thread::sleep(std::time::Duration::from_secs_f64(self.config.camera_warmup_time));
        }

        let mut summary = RunSummary::default();

        while let Some(next) = source.next_frame() {
            let frame = match next {
                Ok(frame) => frame,
                Err(err) => {
                    warn!("[{}] Skipping frame from {}: {}", self.name, source.name(), err);
                    summary.skipped_frames += 1;
                    continue;
                }
            };

            match self.tick(&frame.image, frame.timestamp) {
                Ok(outcome) => {
                    summary.ticks += 1;
                    if let Some(event) = outcome.event {
                        summary.events += 1;
                        sink.on_event(&event);
                    }
                }
                Err(err) if err.is_recoverable() => {
                    summary.ticks += 1;
                    summary.background_resets += 1;
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "[{}] Stream finished: {} ticks, {} events, {} skipped frames",
            self.name, summary.ticks, summary.events, summary.skipped_frames
        );
        Ok(summary)
    }

    /// Restart warm-up, e.g. after changing the resize configuration.
    /// Debounce state is kept.
    pub fn reset(&mut self) {
        self.background.reset();
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> &BackgroundModel {
        &self.background
    }

    pub fn debouncer(&self) -> &EventDebouncer {
        &self.debouncer
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Best effort: a failed write is logged and the tick keeps its outcome
    fn save_debug(
        &self,
        tick: u64,
        gray: &GrayImage,
        mask: Option<&GrayImage>,
        resized: &DynamicImage,
        signal: &MotionSignal,
    ) {
        let Some(debug_config) = &self.debug else {
            return;
        };

        if let Err(err) = self.write_stages(debug_config, tick, gray, mask, resized, signal) {
            warn!("[{}] Debug: failed to save tick {:06}: {}", self.name, tick, err);
        }
    }

    fn write_stages(
        &self,
        debug_config: &DebugConfig,
        tick: u64,
        gray: &GrayImage,
        mask: Option<&GrayImage>,
        resized: &DynamicImage,
        signal: &MotionSignal,
    ) -> Result<()> {
        debug_config.save(GRAYSCALE_DIR, tick, &DynamicImage::ImageLuma8(gray.clone()))?;
        if let Some(mask) = mask {
            debug_config.save(MASK_DIR, tick, &DynamicImage::ImageLuma8(mask.clone()))?;
        }
        let annotated = overlay::draw_regions(resized, &signal.regions);
        debug_config.save(REGIONS_DIR, tick, &DynamicImage::ImageRgb8(annotated))?;

        debug!("[{}] Debug: saved tick {:06}", self.name, tick);
        Ok(())
    }
}
