//! Face detector seam.
//!
//! Landmark detection runs outside this crate. A detector turns one frame
//! into zero or more [`FaceObservation`]s; a failure skips the frame.

use facecursor_common::error::{FacecursorError, FacecursorResult};
use facecursor_face_model::observation::FaceObservation;
use facecursor_face_model::record::FrameRecord;

/// Trait for face detectors.
pub trait FaceDetector: Send {
    type Frame;

    /// Detect faces in one frame. An empty vec means no face was found.
    fn detect(&mut self, frame: &Self::Frame) -> FacecursorResult<Vec<FaceObservation>>;

    /// Detector name for logging.
    fn name(&self) -> &str;
}

/// Returns the observations stored in a recorded frame.
///
/// A frame recorded with an `error` reproduces the detector failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordedDetector;

impl FaceDetector for RecordedDetector {
    type Frame = FrameRecord;

    fn detect(&mut self, frame: &FrameRecord) -> FacecursorResult<Vec<FaceObservation>> {
        match &frame.error {
            Some(message) => Err(FacecursorError::detector(message.clone())),
            None => Ok(frame.faces.clone()),
        }
    }

    fn name(&self) -> &str {
        "recorded"
    }
}
