//! Push-style notifications for UI observers.
//!
//! Each method is called at most once per processed frame.

use facecursor_face_model::geometry::Point2D;
use facecursor_face_model::observation::FaceObservation;
use tokio::sync::mpsc;

/// Observer of session events. All methods default to no-ops.
pub trait SessionObserver: Send {
    /// The internal cursor location changed.
    fn on_cursor_move(&mut self, _position: Point2D) {}

    /// The smile debouncer fired.
    fn on_smile_gesture(&mut self, _observation: &FaceObservation) {}

    /// The right-blink debouncer fired.
    fn on_blink_gesture(&mut self, _observation: &FaceObservation) {}
}

/// Notification delivered by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionNotification {
    CursorMoved(Point2D),
    Smile(FaceObservation),
    Blink(FaceObservation),
}

/// Forwards notifications over an unbounded channel.
///
/// A dropped receiver is not an error; notifications are simply discarded.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<SessionNotification>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, notification: SessionNotification) {
        if self.tx.send(notification).is_err() {
            tracing::trace!("Notification receiver dropped");
        }
    }
}

impl SessionObserver for ChannelObserver {
    fn on_cursor_move(&mut self, position: Point2D) {
        self.send(SessionNotification::CursorMoved(position));
    }

    fn on_smile_gesture(&mut self, observation: &FaceObservation) {
        self.send(SessionNotification::Smile(observation.clone()));
    }

    fn on_blink_gesture(&mut self, observation: &FaceObservation) {
        self.send(SessionNotification::Blink(observation.clone()));
    }
}
