//! Frame sources.
//!
//! A [`FrameSource`] hands the frame loop one opaque frame at a time. Live
//! capture feeds a [`LatestFrameSlot`], which keeps only the newest frame:
//! frames published while the loop is busy are dropped, never queued.

use std::collections::VecDeque;
use std::path::Path;

use facecursor_common::clock::SessionClock;
use facecursor_common::error::{FacecursorError, FacecursorResult};
use facecursor_face_model::record::{parse_frames, FrameRecord};
use tokio::sync::watch;

/// A frame plus the time it was captured.
#[derive(Debug, Clone)]
pub struct CapturedFrame<F> {
    /// Seconds since the session (or recording) started.
    pub timestamp_secs: f64,

    /// Frames discarded by the source since the previous delivered frame.
    pub dropped_before: u64,

    pub frame: F,
}

/// Result of polling a source.
#[derive(Debug)]
pub enum FramePoll<F> {
    Ready(CapturedFrame<F>),
    /// Nothing new yet.
    Pending,
    /// The source will never produce another frame.
    Exhausted,
}

/// Trait for frame sources.
pub trait FrameSource: Send {
    type Frame: Send;

    /// Poll for the next frame without blocking.
    fn next_frame(&mut self) -> FacecursorResult<FramePoll<Self::Frame>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Replays recorded detector output in order.
#[derive(Debug, Default)]
pub struct RecordedFrames {
    frames: VecDeque<FrameRecord>,
}

impl RecordedFrames {
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// Parse a JSONL recording.
    pub fn from_jsonl(jsonl: &str) -> FacecursorResult<Self> {
        Ok(Self::new(parse_frames(jsonl)?))
    }

    /// Load a JSONL recording from disk.
    pub fn load(path: &Path) -> FacecursorResult<Self> {
        if !path.exists() {
            return Err(FacecursorError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_jsonl(&content)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for RecordedFrames {
    type Frame = FrameRecord;

    fn next_frame(&mut self) -> FacecursorResult<FramePoll<FrameRecord>> {
        Ok(match self.frames.pop_front() {
            Some(record) => FramePoll::Ready(CapturedFrame {
                timestamp_secs: record.timestamp_secs,
                dropped_before: 0,
                frame: record,
            }),
            None => FramePoll::Exhausted,
        })
    }

    fn name(&self) -> &str {
        "recorded"
    }
}

#[derive(Debug, Clone)]
struct Published<F> {
    sequence: u64,
    frame: CapturedFrame<F>,
}

/// Capture side of a [`LatestFrameSlot`].
pub struct FramePublisher<F> {
    tx: watch::Sender<Option<Published<F>>>,
    clock: SessionClock,
    sequence: u64,
}

impl<F> FramePublisher<F> {
    /// Publish a frame stamped with the publisher's clock.
    pub fn publish(&mut self, frame: F) {
        let timestamp_secs = self.clock.elapsed_secs();
        self.publish_at(timestamp_secs, frame);
    }

    /// Publish a frame with an explicit timestamp, replacing any unread frame.
    pub fn publish_at(&mut self, timestamp_secs: f64, frame: F) {
        self.sequence += 1;
        self.tx.send_replace(Some(Published {
            sequence: self.sequence,
            frame: CapturedFrame {
                timestamp_secs,
                dropped_before: 0,
                frame,
            },
        }));
    }

    /// Number of frames published so far.
    pub fn published(&self) -> u64 {
        self.sequence
    }
}

/// Single-slot mailbox holding only the newest captured frame.
pub struct LatestFrameSlot<F> {
    rx: watch::Receiver<Option<Published<F>>>,
    last_sequence: u64,
}

/// Create a publisher/slot pair. Dropping the publisher exhausts the slot
/// once its last frame has been taken.
pub fn latest_frame_slot<F>(clock: SessionClock) -> (FramePublisher<F>, LatestFrameSlot<F>) {
    let (tx, rx) = watch::channel(None);
    (
        FramePublisher {
            tx,
            clock,
            sequence: 0,
        },
        LatestFrameSlot {
            rx,
            last_sequence: 0,
        },
    )
}

impl<F: Clone> LatestFrameSlot<F> {
    fn take_unseen(&mut self) -> Option<CapturedFrame<F>> {
        let current = self.rx.borrow_and_update();
        let published = current.as_ref()?;
        if published.sequence <= self.last_sequence {
            return None;
        }
        let dropped = published.sequence - self.last_sequence - 1;
        self.last_sequence = published.sequence;
        if dropped > 0 {
            tracing::trace!(dropped, "Dropped stale frames");
        }
        let mut frame = published.frame.clone();
        frame.dropped_before = dropped;
        Some(frame)
    }
}

impl<F> FrameSource for LatestFrameSlot<F>
where
    F: Clone + Send + Sync,
{
    type Frame = F;

    fn next_frame(&mut self) -> FacecursorResult<FramePoll<F>> {
        Ok(match self.rx.has_changed() {
            Ok(true) => self
                .take_unseen()
                .map_or(FramePoll::Pending, FramePoll::Ready),
            Ok(false) => FramePoll::Pending,
            // Publisher gone: deliver a final unseen frame, then report exhaustion.
            Err(_) => self
                .take_unseen()
                .map_or(FramePoll::Exhausted, FramePoll::Ready),
        })
    }

    fn name(&self) -> &str {
        "latest-frame"
    }
}
