//! Cooperative frame loop.
//!
//! One frame is in flight at a time: poll the source, detect, process, then
//! check the tracking flag before the next iteration. Control commands
//! from a [`SessionHandle`] are applied between frames, so session state is
//! only ever mutated by the loop itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use facecursor_common::error::{FacecursorError, FacecursorResult};
use facecursor_face_model::gesture::GestureMode;
use facecursor_gesture_core::calibration::CalibrationResult;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::detector::FaceDetector;
use crate::session::{FrameOutcome, TrackingSession};
use crate::source::{FramePoll, FrameSource};

/// Control request applied by the loop between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    SetSensitivity { sensitivity: f64, speed: f64 },
    SetClickEnabled(bool),
    SetGestureSelection(GestureMode),
    SetPaused(bool),
    Stop,
}

/// Cloneable control surface for a running [`FrameLoop`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    tracking: Arc<AtomicBool>,
}

impl SessionHandle {
    pub fn set_sensitivity(&self, sensitivity: f64, speed: f64) -> FacecursorResult<()> {
        self.send(SessionCommand::SetSensitivity { sensitivity, speed })
    }

    pub fn set_click_enabled(&self, enabled: bool) -> FacecursorResult<()> {
        self.send(SessionCommand::SetClickEnabled(enabled))
    }

    pub fn set_gesture_selection(&self, mode: GestureMode) -> FacecursorResult<()> {
        self.send(SessionCommand::SetGestureSelection(mode))
    }

    pub fn set_paused(&self, paused: bool) -> FacecursorResult<()> {
        self.send(SessionCommand::SetPaused(paused))
    }

    /// Clear the tracking flag. The loop exits after the frame in flight.
    pub fn stop(&self) {
        self.tracking.store(false, Ordering::SeqCst);
        // The loop may already have exited.
        let _ = self.commands.send(SessionCommand::Stop);
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.load(Ordering::SeqCst)
    }

    fn send(&self, command: SessionCommand) -> FacecursorResult<()> {
        self.commands
            .send(command)
            .map_err(|_| FacecursorError::session("frame loop is no longer running"))
    }
}

/// Counters collected over one run of the loop.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoopSummary {
    pub frames: u64,
    pub dropped_frames: u64,
    pub detector_failures: u64,
    pub source_errors: u64,
    pub no_face_frames: u64,
    pub calibration_rejections: u64,
    pub cursor_moves: u64,
    pub clicks: u64,
    pub calibration: Option<CalibrationResult>,
}

impl LoopSummary {
    fn record(&mut self, outcome: &FrameOutcome) {
        match outcome {
            FrameOutcome::Inactive | FrameOutcome::Calibrating { .. } => {}
            FrameOutcome::NoFace => self.no_face_frames += 1,
            FrameOutcome::Calibrated(result) => self.calibration = Some(*result),
            FrameOutcome::CalibrationRejected { .. } => self.calibration_rejections += 1,
            FrameOutcome::Tracked { moved_to, clicked } => {
                self.cursor_moves += u64::from(moved_to.is_some());
                self.clicks += u64::from(clicked.is_some());
            }
        }
    }
}

/// Drives a [`TrackingSession`] from a frame source and a detector.
pub struct FrameLoop<F> {
    session: TrackingSession,
    source: Box<dyn FrameSource<Frame = F>>,
    detector: Box<dyn FaceDetector<Frame = F>>,
    commands_tx: mpsc::UnboundedSender<SessionCommand>,
    commands_rx: mpsc::UnboundedReceiver<SessionCommand>,
    idle_backoff: Duration,
}

impl<F: Send> FrameLoop<F> {
    pub fn new(
        session: TrackingSession,
        source: Box<dyn FrameSource<Frame = F>>,
        detector: Box<dyn FaceDetector<Frame = F>>,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        Self {
            session,
            source,
            detector,
            commands_tx,
            commands_rx,
            idle_backoff: Duration::from_millis(1),
        }
    }

    /// How long to sleep when the source has no new frame.
    pub fn with_idle_backoff(mut self, idle_backoff: Duration) -> Self {
        self.idle_backoff = idle_backoff;
        self
    }

    /// Control handle sharing this loop's tracking flag.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            commands: self.commands_tx.clone(),
            tracking: self.session.tracking_flag(),
        }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn into_session(self) -> TrackingSession {
        self.session
    }

    /// Run until the tracking flag clears or the source is exhausted.
    ///
    /// Detector failures and source errors skip the frame. Sink errors end
    /// the run. The session is stopped (and calibration discarded) on exit.
    pub async fn run(&mut self) -> FacecursorResult<LoopSummary> {
        if !self.session.is_tracking() {
            self.session.start()?;
        }
        tracing::info!(
            source = %self.source.name(),
            detector = %self.detector.name(),
            "Frame loop started"
        );

        let result = self.run_frames().await;
        self.session.stop();

        let summary = result?;
        tracing::info!(
            frames = summary.frames,
            dropped = summary.dropped_frames,
            detector_failures = summary.detector_failures,
            clicks = summary.clicks,
            "Frame loop stopped"
        );
        Ok(summary)
    }

    async fn run_frames(&mut self) -> FacecursorResult<LoopSummary> {
        let mut summary = LoopSummary::default();

        loop {
            self.apply_commands();
            if !self.session.is_tracking() {
                break;
            }

            match self.source.next_frame() {
                Ok(FramePoll::Ready(captured)) => {
                    summary.frames += 1;
                    summary.dropped_frames += captured.dropped_before;

                    match self.detector.detect(&captured.frame) {
                        Ok(faces) => {
                            let outcome = self
                                .session
                                .process_faces(&faces, captured.timestamp_secs)?;
                            tracing::trace!(?outcome, t = captured.timestamp_secs, "Frame processed");
                            summary.record(&outcome);
                        }
                        Err(e) if e.is_frame_local() => {
                            tracing::warn!(error = %e, t = captured.timestamp_secs, "Skipping frame");
                            summary.detector_failures += 1;
                        }
                        Err(e) => return Err(e),
                    }
                    tokio::task::yield_now().await;
                }
                Ok(FramePoll::Pending) => {
                    tokio::time::sleep(self.idle_backoff).await;
                }
                Ok(FramePoll::Exhausted) => {
                    tracing::debug!(source = %self.source.name(), "Frame source exhausted");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Frame source error");
                    summary.source_errors += 1;
                    tokio::time::sleep(self.idle_backoff).await;
                }
            }
        }

        Ok(summary)
    }

    fn apply_commands(&mut self) {
        while let Ok(command) = self.commands_rx.try_recv() {
            tracing::debug!(?command, "Applying session command");
            match command {
                SessionCommand::SetSensitivity { sensitivity, speed } => {
                    if let Err(e) = self.session.set_sensitivity(sensitivity, speed) {
                        tracing::warn!(error = %e, "Ignoring invalid sensitivity");
                    }
                }
                SessionCommand::SetClickEnabled(enabled) => self.session.set_click_enabled(enabled),
                SessionCommand::SetGestureSelection(mode) => {
                    self.session.set_gesture_selection(mode)
                }
                SessionCommand::SetPaused(paused) => self.session.set_paused(paused),
                SessionCommand::Stop => {
                    self.session.tracking_flag().store(false, Ordering::SeqCst);
                }
            }
        }
    }
}
