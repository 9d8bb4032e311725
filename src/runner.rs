use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::MotionConfig;
use crate::models::MotionEvent;
use crate::pipeline::{MotionPipeline, RunSummary};
use crate::source::FrameSource;

/// Outcome of one stream
#[derive(Debug)]
pub struct StreamReport {
    pub stream_id: Uuid,
    pub source_name: String,
    /// Counters for the finished run, or the error that stopped the stream
    pub outcome: Result<RunSummary>,
    /// Events confirmed before the stream ended, even if it failed
    pub events: Vec<MotionEvent>,
}

impl StreamReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Run every source through its own pipeline instance, in parallel.
///
/// Streams share nothing but the (cloned) config, and a failing stream only
/// fails its own report. With `debug_root` set, each stream writes debug
/// images under `<debug_root>/<stream_id>/`. Reports come back in the order
/// the sources were given.
pub async fn run_streams(
    config: MotionConfig,
    sources: Vec<Box<dyn FrameSource + Send>>,
    debug_root: Option<PathBuf>,
) -> Result<Vec<StreamReport>> {
    config.validate()?;

    let mut handles = Vec::with_capacity(sources.len());
    for mut source in sources {
        let config = config.clone();
        let stream_id = Uuid::new_v4();
        let source_name = source.name().to_string();
        let debug_dir = debug_root.as_ref().map(|root| root.join(stream_id.to_string()));

        let task_name = source_name.clone();
        let handle = tokio::task::spawn_blocking(move || {
            info!("Starting stream {} ({})", stream_id, task_name);

            let mut events = Vec::new();
            let outcome = run_stream(config, stream_id, debug_dir, source.as_mut(), &mut events)
                .with_context(|| format!("Stream {} ({}) stopped", stream_id, task_name));
            (outcome, events)
        });
        handles.push((stream_id, source_name, handle));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for (stream_id, source_name, handle) in handles {
        let (outcome, events) = match handle.await {
            Ok(finished) => finished,
            Err(err) => (Err(anyhow!("Stream task panicked: {}", err)), Vec::new()),
        };
        if let Err(err) = &outcome {
            warn!("{:#}", err);
        }
        reports.push(StreamReport {
            stream_id,
            source_name,
            outcome,
            events,
        });
    }
    Ok(reports)
}

fn run_stream(
    config: MotionConfig,
    stream_id: Uuid,
    debug_dir: Option<PathBuf>,
    source: &mut dyn FrameSource,
    events: &mut Vec<MotionEvent>,
) -> Result<RunSummary> {
    let mut pipeline = MotionPipeline::new(config)?.with_stream_name(short_id(&stream_id));
    if let Some(dir) = debug_dir {
        pipeline = pipeline.with_debug(dir)?;
    }
    Ok(pipeline.run(source, events)?)
}

fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}
