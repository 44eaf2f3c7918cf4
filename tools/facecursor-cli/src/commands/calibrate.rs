//! Calibrate from the start of a recorded frame stream.

use std::path::PathBuf;

use anyhow::Context;
use facecursor_common::{AppConfig, FacecursorError};
use facecursor_face_model::record::parse_frames;
use facecursor_gesture_core::{CalibrationProgress, Calibrator, MappingParams, TrackingSelector};

pub fn run(config: &AppConfig, frames: PathBuf, window: Option<usize>) -> anyhow::Result<()> {
    let capacity = window.unwrap_or(config.tracking.calibration_window);
    if capacity < 2 {
        anyhow::bail!("Calibration window must hold at least 2 samples, got {capacity}");
    }

    println!("Calibrating from: {}", frames.display());
    println!("  Window: {capacity} samples");

    let (content, _) = super::read_recording(&frames)?;
    let records = parse_frames(&content)
        .with_context(|| format!("Failed to parse frames in {}", frames.display()))?;

    let mut selector = TrackingSelector::new();
    let mut calibrator = Calibrator::new(capacity);
    let mut rejected = 0usize;
    let mut completed = None;

    for record in records.iter().filter(|r| r.error.is_none()) {
        let Some(face) = selector.select(&record.faces) else {
            continue;
        };
        match calibrator.add_sample(face.mouth_position.x, face.mouth_position.y) {
            Ok(CalibrationProgress::Completed(result)) => {
                completed = Some((record.timestamp_secs, face.tracking_id, result));
                break;
            }
            Ok(_) => {}
            Err(FacecursorError::InvalidCalibrationData { message }) => {
                println!("  Window rejected at t={:.3}s: {message}", record.timestamp_secs);
                rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let Some((at, tracking_id, result)) = completed else {
        println!(
            "\nCalibration not reached: {} of {} samples collected",
            calibrator.window().len(),
            capacity
        );
        return Ok(());
    };

    let params = MappingParams::new(config.tracking.speed, config.tracking.sensitivity);
    println!("\nCalibrated at t={at:.3}s from face {tracking_id}");
    if rejected > 0 {
        println!("  Windows rejected first: {rejected}");
    }
    println!(
        "  Reference point: ({:.4}, {:.4})",
        result.reference_point.x, result.reference_point.y
    );
    println!(
        "  Threshold ratios: x={:.6} y={:.6}",
        result.thresholds.x, result.thresholds.y
    );
    println!(
        "  Dead zones at sensitivity {}: x={:.6} y={:.6}",
        params.sensitivity,
        params.x_dead_zone(&result.thresholds),
        params.y_dead_zone(&result.thresholds)
    );

    Ok(())
}
