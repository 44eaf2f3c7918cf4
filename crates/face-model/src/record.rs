//! Replay records.
//!
//! Detector output can be recorded as JSONL: a `# ` prefixed header line
//! followed by one [`FrameRecord`] per line. Cursor actions produced while
//! replaying are written in the same layout as [`ActionRecord`]s.

use serde::{Deserialize, Serialize};

use crate::geometry::DisplayBounds;
use crate::gesture::GestureKind;
use crate::observation::FaceObservation;

/// Seconds since the recording (or session) started.
pub type TimestampSecs = f64;

/// Header line of a frame recording or action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at recording start (RFC 3339).
    pub epoch_wall: String,

    /// Display region the cursor was confined to, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayBounds>,
}

/// Detector output for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(rename = "t")]
    pub timestamp_secs: TimestampSecs,

    #[serde(default)]
    pub faces: Vec<FaceObservation>,

    /// Set when the detector failed on this frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FrameRecord {
    pub fn new(timestamp_secs: TimestampSecs, faces: Vec<FaceObservation>) -> Self {
        Self {
            timestamp_secs,
            faces,
            error: None,
        }
    }

    pub fn failed(timestamp_secs: TimestampSecs, error: impl Into<String>) -> Self {
        Self {
            timestamp_secs,
            faces: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// A cursor action emitted to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "t")]
    pub timestamp_secs: TimestampSecs,

    #[serde(flatten)]
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Cursor moved to an absolute display position.
    Move { x: f64, y: f64 },

    /// Click at the current cursor position.
    Click { gesture: GestureKind, x: f64, y: f64 },
}

impl ActionRecord {
    pub fn movement(timestamp_secs: TimestampSecs, x: f64, y: f64) -> Self {
        Self {
            timestamp_secs,
            kind: ActionKind::Move { x, y },
        }
    }

    pub fn click(timestamp_secs: TimestampSecs, gesture: GestureKind, x: f64, y: f64) -> Self {
        Self {
            timestamp_secs,
            kind: ActionKind::Click { gesture, x, y },
        }
    }

    pub fn is_click(&self) -> bool {
        matches!(self.kind, ActionKind::Click { .. })
    }
}

/// Parse frame records from JSONL content, skipping `#` header lines.
pub fn parse_frames(jsonl: &str) -> Result<Vec<FrameRecord>, serde_json::Error> {
    parse_records(jsonl)
}

/// Parse action records from JSONL content, skipping `#` header lines.
pub fn parse_actions(jsonl: &str) -> Result<Vec<ActionRecord>, serde_json::Error> {
    parse_records(jsonl)
}

/// Read the `# {...}` header from the first non-empty line, if present.
pub fn parse_header(jsonl: &str) -> Option<Result<StreamHeader, serde_json::Error>> {
    let first = jsonl.lines().map(str::trim).find(|line| !line.is_empty())?;
    let header = first.strip_prefix('#')?;
    Some(serde_json::from_str(header.trim()))
}

/// Serialize frame records to JSONL.
pub fn serialize_frames(frames: &[FrameRecord]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

fn parse_records<T: serde::de::DeserializeOwned>(jsonl: &str) -> Result<Vec<T>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}
