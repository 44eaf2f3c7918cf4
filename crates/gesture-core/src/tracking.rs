//! Per-frame face selection.
//!
//! Only the face with the lowest tracking identifier in the current frame
//! drives the cursor. The identifier set is rebuilt from each frame's
//! detector output and cleared after selection.

use facecursor_face_model::observation::{FaceObservation, TrackingId};

#[derive(Debug, Clone, Default)]
pub struct TrackingSelector {
    frame_ids: Vec<TrackingId>,
    last_selected: Option<TrackingId>,
}

impl TrackingSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the observation with the minimum tracking id, or `None` if the
    /// frame has no faces.
    pub fn select<'a>(&mut self, faces: &'a [FaceObservation]) -> Option<&'a FaceObservation> {
        self.frame_ids.extend(faces.iter().map(|f| f.tracking_id));
        let min_id = self.frame_ids.iter().copied().min();
        self.frame_ids.clear();

        let selected = faces.iter().find(|f| Some(f.tracking_id) == min_id)?;
        if self.last_selected != Some(selected.tracking_id) {
            tracing::debug!(
                tracking_id = selected.tracking_id,
                previous = ?self.last_selected,
                faces = faces.len(),
                "Tracking face"
            );
            self.last_selected = Some(selected.tracking_id);
        }
        Some(selected)
    }

    /// Identifier selected on the most recent frame that had a face.
    pub fn last_selected(&self) -> Option<TrackingId> {
        self.last_selected
    }

    /// Identifiers pending selection. Always empty between frames.
    pub fn pending_ids(&self) -> &[TrackingId] {
        &self.frame_ids
    }

    pub fn reset(&mut self) {
        self.frame_ids.clear();
        self.last_selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(ids: &[TrackingId]) -> Vec<FaceObservation> {
        ids.iter()
            .map(|&id| FaceObservation::new(id, 100.0 + id as f64, 100.0))
            .collect()
    }

    #[test]
    fn test_selects_lowest_id() {
        let mut selector = TrackingSelector::new();
        let frame = faces(&[5, 2, 9]);
        let selected = selector.select(&frame).unwrap();
        assert_eq!(selected.tracking_id, 2);
        assert_eq!(selected.mouth_position.x, 102.0);
        assert!(selector.pending_ids().is_empty());
    }

    #[test]
    fn test_empty_frame_selects_nothing() {
        let mut selector = TrackingSelector::new();
        assert!(selector.select(&[]).is_none());
        assert_eq!(selector.last_selected(), None);
    }

    #[test]
    fn test_ids_do_not_accumulate_across_frames() {
        let mut selector = TrackingSelector::new();
        assert_eq!(selector.select(&faces(&[1, 4])).unwrap().tracking_id, 1);
        // Face 1 left; face 4 is now the lowest in this frame.
        assert_eq!(selector.select(&faces(&[4, 7])).unwrap().tracking_id, 4);
        assert_eq!(selector.last_selected(), Some(4));
    }
}
