//! Tracking session.
//!
//! A [`TrackingSession`] owns every piece of mutable tracking state for one
//! user session: the calibrator, the cursor location, both gesture
//! debouncers, and the face selector. Each call to
//! [`TrackingSession::process_faces`] handles exactly one frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use facecursor_common::config::AppConfig;
use facecursor_common::error::{FacecursorError, FacecursorResult};
use facecursor_face_model::geometry::{DisplayBounds, Point2D};
use facecursor_face_model::gesture::{GestureKind, GestureMode};
use facecursor_face_model::observation::FaceObservation;
use facecursor_gesture_core::calibration::{
    CalibrationProgress, CalibrationResult, Calibrator, DEFAULT_WINDOW_CAPACITY,
};
use facecursor_gesture_core::cursor_map::{CursorMapper, MappingParams};
use facecursor_gesture_core::debounce::{GestureDebouncer, DEFAULT_REFRACTORY_SECS};
use facecursor_gesture_core::tracking::TrackingSelector;

use crate::observer::SessionObserver;
use crate::sink::CursorSink;

/// Configuration for a tracking session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Display region the cursor is confined to.
    pub bounds: DisplayBounds,

    /// Speed and sensitivity.
    pub params: MappingParams,

    /// Minimum seconds between two clicks of the same gesture.
    pub refractory_secs: f64,

    /// Samples collected before calibration completes.
    pub calibration_window: usize,

    /// Whether gestures produce clicks.
    pub click_enabled: bool,

    /// Gesture that drives clicks.
    pub gesture_mode: GestureMode,

    /// While paused, cursor moves are computed but not sent to the sink.
    pub paused: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            bounds: DisplayBounds::default(),
            params: MappingParams::default(),
            refractory_secs: DEFAULT_REFRACTORY_SECS,
            calibration_window: DEFAULT_WINDOW_CAPACITY,
            click_enabled: true,
            gesture_mode: GestureMode::Smile,
            paused: false,
        }
    }
}

impl SessionSettings {
    /// Build settings from the application config.
    pub fn from_config(config: &AppConfig) -> FacecursorResult<Self> {
        config.validate()?;
        let tracking = &config.tracking;
        let gesture_mode = tracking
            .gesture
            .parse::<GestureMode>()
            .map_err(|e| FacecursorError::config(e.to_string()))?;

        Ok(Self {
            bounds: DisplayBounds::new(config.display.width, config.display.height),
            params: MappingParams::new(tracking.speed, tracking.sensitivity),
            refractory_secs: tracking.refractory_secs,
            calibration_window: tracking.calibration_window,
            click_enabled: tracking.click_enabled,
            gesture_mode,
            paused: false,
        })
    }
}

/// What happened on one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Tracking is stopped; the frame was ignored.
    Inactive,

    /// No face in the frame.
    NoFace,

    /// The selected face was added to the calibration window.
    Calibrating { collected: usize, capacity: usize },

    /// Calibration completed on this frame.
    Calibrated(CalibrationResult),

    /// The calibration window was degenerate and has been cleared.
    CalibrationRejected { reason: String },

    /// The selected face drove the cursor and gesture debouncers.
    Tracked {
        /// New cursor location, if the cursor moved.
        moved_to: Option<Point2D>,
        /// Gesture that produced a click, if any.
        clicked: Option<GestureKind>,
    },
}

/// Explicit owner of all per-session tracking state.
pub struct TrackingSession {
    settings: SessionSettings,
    calibrator: Calibrator,
    mapper: CursorMapper,
    smile: GestureDebouncer,
    blink: GestureDebouncer,
    selector: TrackingSelector,
    sink: Box<dyn CursorSink>,
    observers: Vec<Box<dyn SessionObserver>>,
    tracking: Arc<AtomicBool>,
    frames_processed: u64,
}

impl TrackingSession {
    /// Create an inactive session with the cursor at the display center.
    pub fn new(settings: SessionSettings, sink: Box<dyn CursorSink>) -> Self {
        Self {
            calibrator: Calibrator::new(settings.calibration_window),
            mapper: CursorMapper::new(settings.bounds, settings.params),
            smile: GestureDebouncer::new(GestureKind::Smile, settings.refractory_secs),
            blink: GestureDebouncer::new(GestureKind::RightBlink, settings.refractory_secs),
            selector: TrackingSelector::new(),
            sink,
            observers: Vec::new(),
            tracking: Arc::new(AtomicBool::new(false)),
            frames_processed: 0,
            settings,
        }
    }

    /// Register an observer for cursor and gesture notifications.
    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Begin tracking. Calibration starts from an empty window.
    pub fn start(&mut self) -> FacecursorResult<()> {
        if self.is_tracking() {
            return Err(FacecursorError::session("Session already started"));
        }
        self.calibrator.reset();
        self.selector.reset();
        self.tracking.store(true, Ordering::SeqCst);
        tracing::info!(
            sink = %self.sink.name(),
            gesture = %self.settings.gesture_mode,
            window = self.settings.calibration_window,
            "Tracking session started"
        );
        Ok(())
    }

    /// Stop tracking and discard calibration. The cursor location persists.
    pub fn stop(&mut self) {
        self.tracking.store(false, Ordering::SeqCst);
        self.calibrator.reset();
        self.selector.reset();
        if let Err(e) = self.sink.flush() {
            tracing::warn!(error = %e, "Failed to flush cursor sink");
        }
        tracing::info!(frames = self.frames_processed, "Tracking session stopped");
    }

    /// Process one frame's worth of face observations captured at `now` seconds.
    pub fn process_faces(
        &mut self,
        faces: &[FaceObservation],
        now: f64,
    ) -> FacecursorResult<FrameOutcome> {
        if !self.is_tracking() {
            return Ok(FrameOutcome::Inactive);
        }
        self.frames_processed += 1;

        let Some(face) = self.selector.select(faces) else {
            return Ok(FrameOutcome::NoFace);
        };

        if !self.calibrator.is_complete() {
            return self.calibrate(face);
        }
        self.track(face, now)
    }

    fn calibrate(&mut self, face: &FaceObservation) -> FacecursorResult<FrameOutcome> {
        let mouth = face.mouth_position;
        match self.calibrator.add_sample(mouth.x, mouth.y) {
            Ok(CalibrationProgress::Collecting {
                collected,
                capacity,
            }) => Ok(FrameOutcome::Calibrating {
                collected,
                capacity,
            }),
            Ok(CalibrationProgress::Completed(result)) => Ok(FrameOutcome::Calibrated(result)),
            Ok(CalibrationProgress::AlreadyComplete) => Err(FacecursorError::session(
                "calibrator completed without reporting a result",
            )),
            Err(FacecursorError::InvalidCalibrationData { message }) => {
                Ok(FrameOutcome::CalibrationRejected { reason: message })
            }
            Err(e) => Err(e),
        }
    }

    fn track(&mut self, face: &FaceObservation, now: f64) -> FacecursorResult<FrameOutcome> {
        let Some(calibration) = self.calibrator.result().copied() else {
            return Err(FacecursorError::session("tracking without calibration"));
        };

        let moved_to = self.mapper.update(face.mouth_position, &calibration);
        if let Some(position) = moved_to {
            for observer in &mut self.observers {
                observer.on_cursor_move(position);
            }
            if !self.settings.paused {
                self.sink.move_cursor_to(now, position)?;
            }
        }

        let enabled = self.settings.click_enabled;
        let smile_fired = self.smile.update(face.has_smile, now, enabled);
        let blink_fired = self.blink.update(face.is_right_blink(), now, enabled);

        if smile_fired {
            for observer in &mut self.observers {
                observer.on_smile_gesture(face);
            }
        }
        if blink_fired {
            for observer in &mut self.observers {
                observer.on_blink_gesture(face);
            }
        }

        let clicked = match self.settings.gesture_mode {
            GestureMode::Smile if smile_fired => Some(GestureKind::Smile),
            GestureMode::Blink if blink_fired => Some(GestureKind::RightBlink),
            _ => None,
        };
        if let Some(gesture) = clicked {
            let at = self.mapper.location();
            tracing::debug!(?gesture, x = at.x, y = at.y, "Click");
            self.sink.click(now, gesture, at)?;
        }

        Ok(FrameOutcome::Tracked { moved_to, clicked })
    }

    /// Update speed and sensitivity.
    pub fn set_sensitivity(&mut self, sensitivity: f64, speed: f64) -> FacecursorResult<()> {
        if !sensitivity.is_finite() || !speed.is_finite() || speed < 0.0 {
            return Err(FacecursorError::config(format!(
                "invalid sensitivity {sensitivity} / speed {speed}"
            )));
        }
        self.settings.params = MappingParams::new(speed, sensitivity);
        self.mapper.set_params(self.settings.params);
        tracing::debug!(sensitivity, speed, "Updated mapping parameters");
        Ok(())
    }

    pub fn set_click_enabled(&mut self, enabled: bool) {
        self.settings.click_enabled = enabled;
    }

    pub fn set_gesture_selection(&mut self, mode: GestureMode) {
        self.settings.gesture_mode = mode;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.settings.paused = paused;
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.load(Ordering::SeqCst)
    }

    /// Shared tracking flag, checked once per completed frame by the loop.
    pub fn tracking_flag(&self) -> Arc<AtomicBool> {
        self.tracking.clone()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrator.is_complete()
    }

    pub fn calibration(&self) -> Option<&CalibrationResult> {
        self.calibrator.result()
    }

    pub fn cursor_location(&self) -> Point2D {
        self.mapper.location()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{ChannelObserver, SessionNotification};
    use crate::sink::RecordingSink;
    use facecursor_face_model::record::ActionKind;

    fn settings(window: usize) -> SessionSettings {
        SessionSettings {
            calibration_window: window,
            ..SessionSettings::default()
        }
    }

    /// Start a session and calibrate it around (100, 100) with ratios 0.02.
    fn calibrated_session(sink: RecordingSink) -> TrackingSession {
        let mut session = TrackingSession::new(settings(3), Box::new(sink));
        session.start().unwrap();
        for (i, x) in [99.0, 101.0, 100.0, 100.0].into_iter().enumerate() {
            session
                .process_faces(&[FaceObservation::new(1, x, x)], i as f64 * 0.03)
                .unwrap();
        }
        assert!(session.is_calibrated());
        session
    }

    #[test]
    fn test_inactive_session_ignores_frames() {
        let mut session = TrackingSession::new(settings(3), Box::new(RecordingSink::new()));
        let outcome = session
            .process_faces(&[FaceObservation::new(1, 1.0, 1.0)], 0.0)
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Inactive);
        assert_eq!(session.frames_processed(), 0);
    }

    #[test]
    fn test_double_start_is_an_error() {
        let mut session = TrackingSession::new(settings(3), Box::new(RecordingSink::new()));
        session.start().unwrap();
        assert!(matches!(
            session.start(),
            Err(FacecursorError::Session { .. })
        ));
    }

    #[test]
    fn test_calibration_uses_selected_face_only() {
        let mut session = TrackingSession::new(settings(2), Box::new(RecordingSink::new()));
        session.start().unwrap();

        let frame = [
            FaceObservation::new(7, 900.0, 900.0),
            FaceObservation::new(3, 100.0, 50.0),
        ];
        assert_eq!(
            session.process_faces(&frame, 0.0).unwrap(),
            FrameOutcome::Calibrating {
                collected: 1,
                capacity: 2
            }
        );
        session.process_faces(&frame, 0.1).unwrap();
        let FrameOutcome::Calibrated(result) = session.process_faces(&frame, 0.2).unwrap() else {
            panic!("expected calibration to complete");
        };
        assert_eq!(result.reference_point, Point2D::new(100.0, 50.0));
    }

    #[test]
    fn test_no_face_frame_does_nothing() {
        let sink = RecordingSink::new();
        let mut session = calibrated_session(sink.clone());
        assert_eq!(session.process_faces(&[], 1.0).unwrap(), FrameOutcome::NoFace);
        assert!(sink.actions().is_empty());
    }

    #[test]
    fn test_degenerate_window_is_rejected_and_recollected() {
        let mut session = TrackingSession::new(settings(2), Box::new(RecordingSink::new()));
        session.start().unwrap();
        let zero = [FaceObservation::new(1, 0.0, 10.0)];

        session.process_faces(&zero, 0.0).unwrap();
        session.process_faces(&zero, 0.1).unwrap();
        let outcome = session.process_faces(&zero, 0.2).unwrap();
        assert!(matches!(outcome, FrameOutcome::CalibrationRejected { .. }));
        assert!(!session.is_calibrated());

        assert_eq!(
            session
                .process_faces(&[FaceObservation::new(1, 5.0, 5.0)], 0.3)
                .unwrap(),
            FrameOutcome::Calibrating {
                collected: 1,
                capacity: 2
            }
        );
    }

    #[test]
    fn test_cursor_moves_and_notifies() {
        let sink = RecordingSink::new();
        let mut session = calibrated_session(sink.clone());
        let (observer, mut rx) = ChannelObserver::new();
        session.add_observer(Box::new(observer));

        // dev.x = 0.5 opens the gate; default speed 40 moves x by +20.
        let outcome = session
            .process_faces(&[FaceObservation::new(1, 50.0, 100.0)], 1.0)
            .unwrap();
        let expected = Point2D::new(340.0, 240.0);
        assert_eq!(
            outcome,
            FrameOutcome::Tracked {
                moved_to: Some(expected),
                clicked: None
            }
        );
        assert_eq!(session.cursor_location(), expected);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionNotification::CursorMoved(expected)
        );
        assert_eq!(
            sink.actions()[0].kind,
            ActionKind::Move {
                x: 340.0,
                y: 240.0
            }
        );
    }

    #[test]
    fn test_paused_session_does_not_send_moves() {
        let sink = RecordingSink::new();
        let mut session = calibrated_session(sink.clone());
        session.set_paused(true);

        let outcome = session
            .process_faces(&[FaceObservation::new(1, 50.0, 100.0)], 1.0)
            .unwrap();
        assert!(matches!(
            outcome,
            FrameOutcome::Tracked {
                moved_to: Some(_),
                ..
            }
        ));
        assert!(sink.actions().is_empty());
    }

    #[test]
    fn test_smile_clicks_after_refractory_interval() {
        let sink = RecordingSink::new();
        let mut session = calibrated_session(sink.clone());
        let smiling = [FaceObservation::new(1, 100.0, 100.0).with_smile(true)];

        let clicked: Vec<f64> = [1.0, 1.1, 1.35, 1.36]
            .into_iter()
            .filter(|&t| {
                matches!(
                    session.process_faces(&smiling, t).unwrap(),
                    FrameOutcome::Tracked {
                        clicked: Some(GestureKind::Smile),
                        ..
                    }
                )
            })
            .collect();

        assert_eq!(clicked, vec![1.35]);
        assert_eq!(sink.clicks().len(), 1);
    }

    #[test]
    fn test_both_eyes_closed_never_clicks_in_blink_mode() {
        let sink = RecordingSink::new();
        let mut session = calibrated_session(sink.clone());
        session.set_gesture_selection(GestureMode::Blink);
        let closed = [FaceObservation::new(1, 100.0, 100.0).with_eyes_closed(true, true)];

        for i in 0..20 {
            session.process_faces(&closed, 1.0 + i as f64 * 0.1).unwrap();
        }
        assert!(sink.clicks().is_empty());

        let wink = [FaceObservation::new(1, 100.0, 100.0).with_eyes_closed(false, true)];
        session.process_faces(&wink, 5.0).unwrap();
        session.process_faces(&wink, 5.4).unwrap();
        assert_eq!(sink.clicks().len(), 1);
    }

    #[test]
    fn test_unselected_gesture_notifies_without_clicking() {
        let sink = RecordingSink::new();
        let mut session = calibrated_session(sink.clone());
        let (observer, mut rx) = ChannelObserver::new();
        session.add_observer(Box::new(observer));

        let wink = [FaceObservation::new(1, 100.0, 100.0).with_eyes_closed(false, true)];
        session.process_faces(&wink, 1.0).unwrap();
        session.process_faces(&wink, 1.5).unwrap();

        assert!(sink.clicks().is_empty());
        assert!(matches!(rx.try_recv().unwrap(), SessionNotification::Blink(_)));
    }

    #[test]
    fn test_click_disabled_suppresses_clicks() {
        let sink = RecordingSink::new();
        let mut session = calibrated_session(sink.clone());
        session.set_click_enabled(false);
        let smiling = [FaceObservation::new(1, 100.0, 100.0).with_smile(true)];
        for i in 0..10 {
            session.process_faces(&smiling, 1.0 + i as f64 * 0.2).unwrap();
        }
        assert!(sink.clicks().is_empty());
    }

    #[test]
    fn test_stop_resets_calibration_but_keeps_cursor() {
        let sink = RecordingSink::new();
        let mut session = calibrated_session(sink);
        session
            .process_faces(&[FaceObservation::new(1, 50.0, 100.0)], 1.0)
            .unwrap();
        let location = session.cursor_location();

        session.stop();
        assert!(!session.is_tracking());
        assert!(!session.is_calibrated());
        assert_eq!(session.cursor_location(), location);

        session.start().unwrap();
        assert!(matches!(
            session
                .process_faces(&[FaceObservation::new(1, 100.0, 100.0)], 2.0)
                .unwrap(),
            FrameOutcome::Calibrating { collected: 1, .. }
        ));
    }

    #[test]
    fn test_set_sensitivity_rejects_non_finite() {
        let mut session = TrackingSession::new(settings(3), Box::new(RecordingSink::new()));
        assert!(session.set_sensitivity(f64::NAN, 40.0).is_err());
        session.set_sensitivity(2.0, 10.0).unwrap();
        assert_eq!(session.settings().params, MappingParams::new(10.0, 2.0));
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = AppConfig::default();
        config.tracking.gesture = "blink".to_string();
        config.display.width = 1920.0;
        let settings = SessionSettings::from_config(&config).unwrap();
        assert_eq!(settings.gesture_mode, GestureMode::Blink);
        assert_eq!(settings.bounds.width, 1920.0);

        config.tracking.gesture = "frown".to_string();
        assert!(matches!(
            SessionSettings::from_config(&config),
            Err(FacecursorError::Config { .. })
        ));
    }
}
