use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use time::format_description;

use motionwatch::runner::run_streams;
use motionwatch::{FrameSource, ImageSequenceSource, MotionConfig};

#[derive(Parser)]
#[command(name = "motionwatch")]
#[command(about = "Turn frame streams into debounced motion events")]
struct Cli {
    /// Path to the JSON config
    #[arg(short, long, value_name = "FILE")]
    conf: PathBuf,

    /// Directories of frames, one stream each
    #[arg(value_name = "FRAMES_DIR", required = true)]
    streams: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = MotionConfig::from_json_file(&args.conf)
        .with_context(|| format!("Failed to load config {}", args.conf.display()))?;

    let mut sources: Vec<Box<dyn FrameSource + Send>> = Vec::with_capacity(args.streams.len());
    for dir in &args.streams {
        let source = ImageSequenceSource::open(dir, config.fps)
            .with_context(|| format!("Failed to open frame directory {}", dir.display()))?;
        if source.is_empty() {
            log::warn!("No frames found in {}", dir.display());
        }
        sources.push(Box::new(source));
    }

    let reports = run_streams(config, sources, args.debug_out).await?;

    let ts_format =
        format_description::parse("[weekday] [day] [month repr:long] [year] [hour repr:12]:[minute]:[second][period]")?;

    for report in &reports {
        println!("\n=== {} ({}) ===", report.source_name, report.stream_id);
        match &report.outcome {
            Ok(summary) => println!(
                "Ticks: {}, skipped frames: {}, background resets: {}",
                summary.ticks, summary.skipped_frames, summary.background_resets
            ),
            Err(err) => println!("Stream failed: {:#}", err),
        }

        if report.events.is_empty() {
            println!("No motion episodes.");
        } else {
            println!("Motion episodes:");
            for event in &report.events {
                println!("  {} - {}", event.timestamp.format(&ts_format)?, event.status.label());
            }
        }
    }

    let failed = reports.iter().filter(|report| !report.is_ok()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} streams failed", failed, reports.len());
    }

    Ok(())
}
