//! Cursor and click sinks.
//!
//! The session pushes absolute cursor positions and clicks into a
//! [`CursorSink`]. Platform injection lives outside this crate; the sinks
//! here record actions in memory or append them to a JSONL log.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use facecursor_common::error::{FacecursorError, FacecursorResult};
use facecursor_face_model::geometry::Point2D;
use facecursor_face_model::gesture::GestureKind;
use facecursor_face_model::record::{ActionRecord, StreamHeader};

/// Receives cursor actions from a tracking session.
pub trait CursorSink: Send {
    /// Move the cursor to an absolute display position.
    fn move_cursor_to(&mut self, at_secs: f64, position: Point2D) -> FacecursorResult<()>;

    /// Click at the given display position.
    fn click(&mut self, at_secs: f64, gesture: GestureKind, position: Point2D)
        -> FacecursorResult<()>;

    /// Flush any buffered actions.
    fn flush(&mut self) -> FacecursorResult<()> {
        Ok(())
    }

    /// Sink name for logging.
    fn name(&self) -> &str;
}

/// Discards every action.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CursorSink for NullSink {
    fn move_cursor_to(&mut self, _at_secs: f64, _position: Point2D) -> FacecursorResult<()> {
        Ok(())
    }

    fn click(
        &mut self,
        _at_secs: f64,
        _gesture: GestureKind,
        _position: Point2D,
    ) -> FacecursorResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Keeps actions in memory. Clones share the same buffer, so a test can
/// hand one clone to the session and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    actions: Arc<Mutex<Vec<ActionRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded actions.
    pub fn actions(&self) -> Vec<ActionRecord> {
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clicks(&self) -> Vec<ActionRecord> {
        self.actions().into_iter().filter(ActionRecord::is_click).collect()
    }

    fn push(&self, action: ActionRecord) -> FacecursorResult<()> {
        self.actions
            .lock()
            .map_err(|_| FacecursorError::session("recording sink lock poisoned"))?
            .push(action);
        Ok(())
    }
}

impl CursorSink for RecordingSink {
    fn move_cursor_to(&mut self, at_secs: f64, position: Point2D) -> FacecursorResult<()> {
        self.push(ActionRecord::movement(at_secs, position.x, position.y))
    }

    fn click(
        &mut self,
        at_secs: f64,
        gesture: GestureKind,
        position: Point2D,
    ) -> FacecursorResult<()> {
        self.push(ActionRecord::click(at_secs, gesture, position.x, position.y))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Writes actions to a JSONL file in append-only mode.
pub struct JsonlActionSink {
    writer: BufWriter<File>,
    path: PathBuf,
    actions_written: u64,
}

impl JsonlActionSink {
    /// Create the log, writing the header as a `# ` prefixed first line.
    pub fn new(path: impl AsRef<Path>, header: &StreamHeader) -> FacecursorResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);
        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| FacecursorError::session(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            actions_written: 0,
        })
    }

    /// Write a single action as a JSONL line.
    pub fn write_action(&mut self, action: &ActionRecord) -> FacecursorResult<()> {
        let json = serde_json::to_string(action)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| FacecursorError::session(format!("Failed to write action: {e}")))?;
        self.actions_written += 1;

        // Clicks are rare and worth persisting immediately.
        if action.is_click() || self.actions_written % 500 == 0 {
            self.flush_writer()?;
        }
        Ok(())
    }

    pub fn actions_written(&self) -> u64 {
        self.actions_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush_writer(&mut self) -> FacecursorResult<()> {
        self.writer
            .flush()
            .map_err(|e| FacecursorError::session(format!("Failed to flush actions: {e}")))
    }
}

impl CursorSink for JsonlActionSink {
    fn move_cursor_to(&mut self, at_secs: f64, position: Point2D) -> FacecursorResult<()> {
        self.write_action(&ActionRecord::movement(at_secs, position.x, position.y))
    }

    fn click(
        &mut self,
        at_secs: f64,
        gesture: GestureKind,
        position: Point2D,
    ) -> FacecursorResult<()> {
        self.write_action(&ActionRecord::click(at_secs, gesture, position.x, position.y))
    }

    fn flush(&mut self) -> FacecursorResult<()> {
        self.flush_writer()
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}

impl Drop for JsonlActionSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facecursor_face_model::record::{parse_actions, parse_header, ActionKind};

    #[test]
    fn test_recording_sink_clones_share_buffer() {
        let sink = RecordingSink::new();
        let mut handle: Box<dyn CursorSink> = Box::new(sink.clone());
        handle
            .move_cursor_to(0.5, Point2D::new(10.0, 20.0))
            .unwrap();
        handle
            .click(0.6, GestureKind::Smile, Point2D::new(10.0, 20.0))
            .unwrap();

        assert_eq!(sink.actions().len(), 2);
        assert_eq!(sink.clicks().len(), 1);
    }

    #[test]
    fn test_jsonl_sink_writes_header_and_actions() {
        let dir = std::env::temp_dir().join("facecursor_test_action_sink");
        let _ = std::fs::remove_dir_all(&dir);

        let path = dir.join("actions.jsonl");
        let header = StreamHeader {
            schema_version: "1.0".to_string(),
            epoch_wall: "2026-01-01T00:00:00Z".to_string(),
            display: None,
        };

        {
            let mut sink = JsonlActionSink::new(&path, &header).unwrap();
            sink.move_cursor_to(1.0, Point2D::new(321.0, 240.0)).unwrap();
            sink.click(1.5, GestureKind::RightBlink, Point2D::new(321.0, 240.0))
                .unwrap();
            assert_eq!(sink.actions_written(), 2);
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# "));
        assert_eq!(parse_header(&content).unwrap().unwrap(), header);

        let actions = parse_actions(&content).unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[1].kind,
            ActionKind::Click {
                gesture: GestureKind::RightBlink,
                x: 321.0,
                y: 240.0
            }
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
