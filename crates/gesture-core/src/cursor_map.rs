//! Mouth-deviation to cursor mapping.
//!
//! # Algorithm
//!
//! 1. **Deviation:** relative offset of the observed mouth position from the
//!    calibrated reference, `dev = (reference - observed) / reference` per axis.
//! 2. **Dead zone:** movement happens only if `|dev.x| > ratio.x * sensitivity`
//!    or `|dev.y| > ratio.y * |1 - sensitivity|`. One open axis opens the gate
//!    for both.
//! 3. **Step:** candidate location is `current + dev * speed` per axis.
//! 4. **Bounds:** each axis accepts its candidate only if it lies strictly
//!    inside the display; otherwise that axis keeps its previous value.
//!
//! The Y dead zone scales with `|1 - sensitivity|` rather than
//! `sensitivity`. The asymmetry may be unintentional; changing it alters
//! how every calibrated user's cursor responds.

use facecursor_face_model::geometry::{DisplayBounds, Point2D};
use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationResult, ThresholdRatios};

/// User-facing tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappingParams {
    /// Cursor displacement per unit of relative deviation.
    pub speed: f64,

    /// Dead-zone multiplier.
    pub sensitivity: f64,
}

impl Default for MappingParams {
    fn default() -> Self {
        Self {
            speed: 40.0,
            sensitivity: 3.0,
        }
    }
}

impl MappingParams {
    pub fn new(speed: f64, sensitivity: f64) -> Self {
        Self { speed, sensitivity }
    }

    /// Deviation magnitude the X axis must exceed to open the gate.
    pub fn x_dead_zone(&self, thresholds: &ThresholdRatios) -> f64 {
        thresholds.x * self.sensitivity
    }

    /// Deviation magnitude the Y axis must exceed to open the gate.
    pub fn y_dead_zone(&self, thresholds: &ThresholdRatios) -> f64 {
        thresholds.y * (self.sensitivity - 1.0).abs()
    }
}

/// Relative deviation of an observation from the reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    pub x: f64,
    pub y: f64,
}

impl Deviation {
    /// `reference` must be non-zero on both axes; calibration guarantees this.
    pub fn between(observed: Point2D, reference: Point2D) -> Self {
        debug_assert!(
            reference.x != 0.0 && reference.y != 0.0,
            "reference point must be non-zero"
        );
        Self {
            x: (reference.x - observed.x) / reference.x,
            y: (reference.y - observed.y) / reference.y,
        }
    }
}

/// Compute the next cursor location, or `None` if the cursor stays put.
///
/// `None` covers both a closed dead-zone gate and a step whose candidate
/// falls outside the display on both axes.
pub fn map_position(
    observed: Point2D,
    calibration: &CalibrationResult,
    current: Point2D,
    bounds: &DisplayBounds,
    params: &MappingParams,
) -> Option<Point2D> {
    let dev = Deviation::between(observed, calibration.reference_point);
    let thresholds = &calibration.thresholds;

    let gate_open = dev.x.abs() > params.x_dead_zone(thresholds)
        || dev.y.abs() > params.y_dead_zone(thresholds);
    if !gate_open {
        return None;
    }

    let candidate_x = current.x + dev.x * params.speed;
    let candidate_y = current.y + dev.y * params.speed;

    let mut next = current;
    if bounds.contains_x(candidate_x) {
        next.x = candidate_x;
    }
    if bounds.contains_y(candidate_y) {
        next.y = candidate_y;
    }

    (next != current).then_some(next)
}

/// Owns the cursor location and applies [`map_position`] frame by frame.
///
/// The mapper never reads the OS cursor; its location is the source of truth.
#[derive(Debug, Clone)]
pub struct CursorMapper {
    bounds: DisplayBounds,
    params: MappingParams,
    location: Point2D,
}

impl CursorMapper {
    /// Create a mapper with the cursor at the center of `bounds`.
    pub fn new(bounds: DisplayBounds, params: MappingParams) -> Self {
        Self {
            bounds,
            params,
            location: bounds.center(),
        }
    }

    /// Map one observation. Returns the new location if the cursor moved.
    pub fn update(&mut self, observed: Point2D, calibration: &CalibrationResult) -> Option<Point2D> {
        let next = map_position(
            observed,
            calibration,
            self.location,
            &self.bounds,
            &self.params,
        )?;
        self.location = next;
        Some(next)
    }

    pub fn location(&self) -> Point2D {
        self.location
    }

    pub fn bounds(&self) -> DisplayBounds {
        self.bounds
    }

    pub fn params(&self) -> MappingParams {
        self.params
    }

    pub fn set_params(&mut self, params: MappingParams) {
        self.params = params;
    }

    /// Move the cursor back to the display center.
    pub fn recenter(&mut self) {
        self.location = self.bounds.center();
    }
}
