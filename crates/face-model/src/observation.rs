//! Per-face detector output.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;
use crate::gesture::GestureKind;

/// Detector-assigned identifier, stable across frames for the same face.
pub type TrackingId = i32;

/// One detected face in one frame.
///
/// Produced by the external detector and discarded once the frame has
/// been processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    #[serde(rename = "id")]
    pub tracking_id: TrackingId,

    /// Mouth position in detector image coordinates.
    #[serde(rename = "mouth")]
    pub mouth_position: Point2D,

    #[serde(default)]
    pub has_smile: bool,

    #[serde(default)]
    pub left_eye_closed: bool,

    #[serde(default)]
    pub right_eye_closed: bool,
}

impl FaceObservation {
    /// A neutral face (no smile, both eyes open) at the given mouth position.
    pub fn new(tracking_id: TrackingId, x: f64, y: f64) -> Self {
        Self {
            tracking_id,
            mouth_position: Point2D::new(x, y),
            has_smile: false,
            left_eye_closed: false,
            right_eye_closed: false,
        }
    }

    pub fn with_smile(mut self, has_smile: bool) -> Self {
        self.has_smile = has_smile;
        self
    }

    pub fn with_eyes_closed(mut self, left: bool, right: bool) -> Self {
        self.left_eye_closed = left;
        self.right_eye_closed = right;
        self
    }

    /// Right eye closed with the left eye open. Both eyes closed is not a blink.
    pub fn is_right_blink(&self) -> bool {
        self.right_eye_closed && !self.left_eye_closed
    }

    /// Whether the flag for `kind` is raised on this observation.
    pub fn gesture_active(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Smile => self.has_smile,
            GestureKind::RightBlink => self.is_right_blink(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_eyes_closed_is_not_a_blink() {
        let face = FaceObservation::new(1, 10.0, 10.0).with_eyes_closed(true, true);
        assert!(!face.is_right_blink());
        assert!(!face.gesture_active(GestureKind::RightBlink));
    }

    #[test]
    fn test_right_eye_only_is_a_blink() {
        let face = FaceObservation::new(1, 10.0, 10.0).with_eyes_closed(false, true);
        assert!(face.gesture_active(GestureKind::RightBlink));
        assert!(!face.gesture_active(GestureKind::Smile));
    }

    #[test]
    fn test_compact_json_fields() {
        let raw = r#"{"id":4,"mouth":{"x":310.5,"y":190.0},"has_smile":true}"#;
        let face: FaceObservation = serde_json::from_str(raw).unwrap();
        assert_eq!(face.tracking_id, 4);
        assert_eq!(face.mouth_position, Point2D::new(310.5, 190.0));
        assert!(face.has_smile);
        assert!(!face.left_eye_closed);
        assert!(!face.right_eye_closed);
    }
}
