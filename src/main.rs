//! Replay driver: feeds a recorded perception capture through a gesture
//! tracking session and writes the observation document.

use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use face_gestures::config::{Config, Profile};
use face_gestures::events::{CollectingObserver, Hint};
use face_gestures::landmark::Landmark;
use face_gestures::tracker::{FrameInput, GestureTracker, SharedTracker};
use log::info;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Frame capture to replay (JSON lines, one frame per line)
    input: String,

    /// Where to write the observation document
    #[arg(short, long, default_value = "observation.json")]
    output: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Threshold profile when no config file is given (mobile, desktop)
    #[arg(short, long, default_value = "mobile")]
    profile: String,

    /// Media file path recorded in the observation document
    #[arg(short, long)]
    media_path: Option<String>,

    /// Frame width when a capture line carries none
    #[arg(long, default_value = "640")]
    width: f64,

    /// Frame height when a capture line carries none
    #[arg(long, default_value = "480")]
    height: f64,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// One line of a frame capture.
///
/// `landmarks` and `pose_transform` are absent on frames where the
/// perception pipeline found no face.
#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    landmarks: Option<Vec<Landmark>>,
    #[serde(default)]
    pose_transform: Option<Vec<f64>>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    hint: Option<Hint>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = if let Some(config_path) = &args.config {
        info!("loading configuration from {config_path}");
        Config::from_file(config_path)
            .with_context(|| format!("failed to load config {config_path}"))?
    } else {
        let profile = match args.profile.as_str() {
            "desktop" => Profile::Desktop,
            _ => Profile::Mobile,
        };
        Config::for_profile(profile)
    };

    let tracker = SharedTracker::new(GestureTracker::with_observer(
        config,
        CollectingObserver::new(),
    )?);
    tracker.set_media_path(args.media_path.as_deref().unwrap_or(&args.input));

    let reader = BufReader::new(
        File::open(&args.input).with_context(|| format!("failed to open {}", args.input))?,
    );
    let mut frame_count = 0_u64;
    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: FrameRecord = serde_json::from_str(&line)
            .with_context(|| format!("bad frame record on line {}", line_number + 1))?;
        let frame = FrameInput {
            landmarks: record.landmarks.as_deref(),
            pose_transform: record.pose_transform.as_deref(),
            width: record.width.unwrap_or(args.width),
            height: record.height.unwrap_or(args.height),
            hint: record.hint,
        };
        tracker.feed(&frame)?;
        frame_count += 1;
    }

    let (events, warnings, complete) = tracker.with(|t| {
        let observer = t.observer();
        (
            observer.events.len(),
            observer.warnings.len(),
            observer.all_gestures_captured(),
        )
    });
    info!(
        "replayed {frame_count} frames: {events} events, {warnings} warnings, \
         final state {}",
        tracker.current_state()
    );
    if complete {
        info!("all gesture kinds captured");
    }

    let json = tracker.observation_json()?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output))?;
    info!("observation document written to {}", args.output);

    Ok(())
}
