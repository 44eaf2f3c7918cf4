//! Baseline calibration.
//!
//! While calibrating, every selected mouth position is appended to a
//! [`SampleWindow`]. Once the window is full, the next sample triggers the
//! computation of a [`CalibrationResult`] from the full window (the
//! triggering sample itself is discarded) and the [`Calibrator`] goes inert
//! until it is reset.
//!
//! # Result
//!
//! - `reference_point` is the per-axis arithmetic mean of the window.
//! - Each threshold ratio is `(max - min) / max` on its axis.
//!
//! A window whose per-axis maximum or mean is zero, or that produces a
//! non-finite ratio, is rejected with `InvalidCalibrationData` and cleared.

use facecursor_common::error::{FacecursorError, FacecursorResult};
use facecursor_face_model::geometry::Point2D;
use serde::{Deserialize, Serialize};

/// Samples collected before calibration completes.
pub const DEFAULT_WINDOW_CAPACITY: usize = 101;

/// Bounded buffer of raw mouth positions.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    capacity: usize,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            xs: Vec::with_capacity(capacity),
            ys: Vec::with_capacity(capacity),
        }
    }

    /// Append a sample. Returns `false` without storing it if the window is full.
    pub fn push(&mut self, x: f64, y: f64) -> bool {
        if self.is_full() {
            return false;
        }
        self.xs.push(x);
        self.ys.push(y);
        true
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.xs.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

/// Per-axis dead-zone ratios, before the sensitivity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRatios {
    pub x: f64,
    pub y: f64,
}

/// Neutral mouth position and dead-zone ratios for one calibration round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub reference_point: Point2D,
    pub thresholds: ThresholdRatios,
}

impl CalibrationResult {
    /// Compute the result from a window of samples.
    pub fn from_window(window: &SampleWindow) -> FacecursorResult<Self> {
        if window.is_empty() {
            return Err(FacecursorError::invalid_calibration(
                "calibration window is empty",
            ));
        }

        let x = AxisStats::of(window.xs());
        let y = AxisStats::of(window.ys());

        let thresholds = ThresholdRatios {
            x: x.ratio("x")?,
            y: y.ratio("y")?,
        };
        let reference_point = Point2D::new(x.mean("x")?, y.mean("y")?);

        Ok(Self {
            reference_point,
            thresholds,
        })
    }
}

struct AxisStats {
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
}

impl AxisStats {
    fn of(values: &[f64]) -> Self {
        let (min, max, sum) = values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
        );
        Self {
            min,
            max,
            sum,
            count: values.len(),
        }
    }

    fn ratio(&self, axis: &str) -> FacecursorResult<f64> {
        if self.max == 0.0 {
            return Err(FacecursorError::invalid_calibration(format!(
                "max({axis}) is zero"
            )));
        }
        let ratio = (self.max - self.min) / self.max;
        if !ratio.is_finite() {
            return Err(FacecursorError::invalid_calibration(format!(
                "{axis} threshold ratio is not finite"
            )));
        }
        Ok(ratio)
    }

    fn mean(&self, axis: &str) -> FacecursorResult<f64> {
        let mean = self.sum / self.count as f64;
        if mean == 0.0 || !mean.is_finite() {
            return Err(FacecursorError::invalid_calibration(format!(
                "mean({axis}) is {mean}; reference point must be non-zero"
            )));
        }
        Ok(mean)
    }
}

/// Outcome of feeding one sample to the [`Calibrator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationProgress {
    /// The sample was stored; the window is not yet complete.
    Collecting { collected: usize, capacity: usize },
    /// This sample completed the round.
    Completed(CalibrationResult),
    /// Calibration already finished; the sample was ignored.
    AlreadyComplete,
}

/// Sample window plus the result it produced, reset together.
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    window: SampleWindow,
    result: Option<CalibrationResult>,
}

impl Calibrator {
    pub fn new(capacity: usize) -> Self {
        Self {
            window: SampleWindow::new(capacity),
            result: None,
        }
    }

    /// Feed one mouth position.
    ///
    /// On `InvalidCalibrationData` the window has already been cleared and
    /// the next sample starts a fresh round.
    pub fn add_sample(&mut self, x: f64, y: f64) -> FacecursorResult<CalibrationProgress> {
        if self.result.is_some() {
            return Ok(CalibrationProgress::AlreadyComplete);
        }

        if self.window.push(x, y) {
            tracing::trace!(x, y, collected = self.window.len(), "Calibration sample");
            return Ok(CalibrationProgress::Collecting {
                collected: self.window.len(),
                capacity: self.window.capacity(),
            });
        }

        match CalibrationResult::from_window(&self.window) {
            Ok(result) => {
                tracing::info!(
                    reference_x = result.reference_point.x,
                    reference_y = result.reference_point.y,
                    ratio_x = result.thresholds.x,
                    ratio_y = result.thresholds.y,
                    samples = self.window.len(),
                    "Calibration complete"
                );
                self.result = Some(result);
                Ok(CalibrationProgress::Completed(result))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejected calibration window, recollecting");
                self.window.clear();
                Err(e)
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&CalibrationResult> {
        self.result.as_ref()
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    /// Discard collected samples and any result.
    pub fn reset(&mut self) {
        self.window.clear();
        self.result = None;
    }
}
