//! Facecursor Session
//!
//! Wires the gesture core into a running session:
//! - **Session:** [`TrackingSession`] owns calibration, cursor, and gesture state
//! - **Sources:** Frames arrive from a [`FrameSource`]; live capture uses a
//!   [`LatestFrameSlot`] that drops stale frames
//! - **Detectors:** A [`FaceDetector`] turns each frame into face observations
//! - **Sinks:** Cursor moves and clicks go to a [`CursorSink`]
//! - **Observers:** UI layers subscribe through [`SessionObserver`]
//!
//! [`FrameLoop`] runs the pipeline with exactly one frame in flight and
//! stops when its tracking flag clears.

pub mod detector;
pub mod observer;
pub mod runner;
pub mod session;
pub mod sink;
pub mod source;

pub use detector::{FaceDetector, RecordedDetector};
pub use observer::{ChannelObserver, SessionNotification, SessionObserver};
pub use runner::{FrameLoop, LoopSummary, SessionCommand, SessionHandle};
pub use session::{FrameOutcome, SessionSettings, TrackingSession};
pub use sink::{CursorSink, JsonlActionSink, NullSink, RecordingSink};
pub use source::{
    latest_frame_slot, CapturedFrame, FramePoll, FramePublisher, FrameSource, LatestFrameSlot,
    RecordedFrames,
};
