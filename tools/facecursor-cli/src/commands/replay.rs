//! Replay a recorded frame stream through a tracking session.

use std::path::PathBuf;

use anyhow::Context;
use facecursor_common::{AppConfig, SessionClock};
use facecursor_face_model::record::StreamHeader;
use facecursor_session::{
    CursorSink, FrameLoop, JsonlActionSink, NullSink, RecordedDetector, RecordedFrames,
    SessionSettings, TrackingSession,
};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct ReplayOverrides {
    pub speed: Option<f64>,
    pub sensitivity: Option<f64>,
    pub gesture: Option<String>,
    pub click_enabled: Option<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub refractory_secs: Option<f64>,
}

pub async fn run(
    config: &AppConfig,
    frames: PathBuf,
    output: Option<PathBuf>,
    overrides: ReplayOverrides,
) -> anyhow::Result<()> {
    println!("Replaying frames from: {}", frames.display());

    let (content, header) = super::read_recording(&frames)?;
    let source = RecordedFrames::from_jsonl(&content)
        .with_context(|| format!("Failed to parse frames in {}", frames.display()))?;
    println!("  Loaded {} frames", source.remaining());

    let mut config = config.clone();
    if let Some(display) = header.as_ref().and_then(|h| h.display) {
        config.display.width = display.width;
        config.display.height = display.height;
    }
    apply_overrides(&mut config, overrides);
    let settings = SessionSettings::from_config(&config)?;

    println!(
        "  Display: {}x{}",
        settings.bounds.width, settings.bounds.height
    );
    println!(
        "  Speed: {}  Sensitivity: {}",
        settings.params.speed, settings.params.sensitivity
    );
    println!(
        "  Clicks: {} (gesture: {}, refractory: {}s)",
        if settings.click_enabled { "on" } else { "off" },
        settings.gesture_mode,
        settings.refractory_secs
    );

    let sink: Box<dyn CursorSink> = match &output {
        Some(path) => {
            let clock = SessionClock::start();
            let header = StreamHeader {
                schema_version: "1.0".to_string(),
                epoch_wall: clock.epoch_wall().to_string(),
                display: Some(settings.bounds),
            };
            Box::new(
                JsonlActionSink::new(path, &header)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            )
        }
        None => Box::new(NullSink),
    };

    let session = TrackingSession::new(settings, sink);
    let mut frame_loop = FrameLoop::new(session, Box::new(source), Box::new(RecordedDetector));
    let summary = frame_loop.run().await?;

    println!();
    println!("Summary:");
    println!("  Frames: {}", summary.frames);
    println!("  Frames without a face: {}", summary.no_face_frames);
    println!("  Detector failures: {}", summary.detector_failures);
    match &summary.calibration {
        Some(calibration) => println!(
            "  Calibration: reference ({:.3}, {:.3}), ratios ({:.5}, {:.5})",
            calibration.reference_point.x,
            calibration.reference_point.y,
            calibration.thresholds.x,
            calibration.thresholds.y
        ),
        None => println!("  Calibration: not reached"),
    }
    if summary.calibration_rejections > 0 {
        println!(
            "  Calibration windows rejected: {}",
            summary.calibration_rejections
        );
    }
    println!("  Cursor moves: {}", summary.cursor_moves);
    println!("  Clicks: {}", summary.clicks);

    if let Some(path) = output {
        println!("\nActions written to: {}", path.display());
    }

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, overrides: ReplayOverrides) {
    let tracking = &mut config.tracking;
    if let Some(speed) = overrides.speed {
        tracking.speed = speed;
    }
    if let Some(sensitivity) = overrides.sensitivity {
        tracking.sensitivity = sensitivity;
    }
    if let Some(gesture) = overrides.gesture {
        tracking.gesture = gesture;
    }
    if let Some(enabled) = overrides.click_enabled {
        tracking.click_enabled = enabled;
    }
    if let Some(refractory) = overrides.refractory_secs {
        tracking.refractory_secs = refractory;
    }
    if let Some(width) = overrides.width {
        config.display.width = width;
    }
    if let Some(height) = overrides.height {
        config.display.height = height;
    }
}
