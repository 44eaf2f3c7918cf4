use std::path::PathBuf;

use facecursor_face_model::geometry::DisplayBounds;
use facecursor_face_model::gesture::{GestureKind, GestureMode};
use facecursor_face_model::record::{parse_header, ActionKind};
use facecursor_session::{
    ChannelObserver, FrameLoop, LoopSummary, RecordedDetector, RecordedFrames, RecordingSink,
    SessionNotification, SessionSettings, TrackingSession,
};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-session")
        .join("frames.jsonl")
}

async fn replay(settings: SessionSettings, sink: RecordingSink) -> LoopSummary {
    let source = RecordedFrames::load(&fixture_path()).expect("fixture frames should load");
    let session = TrackingSession::new(settings, Box::new(sink));
    let mut frame_loop = FrameLoop::new(session, Box::new(source), Box::new(RecordedDetector));
    frame_loop.run().await.expect("replay should succeed")
}

#[test]
fn fixture_header_declares_display() {
    let content = std::fs::read_to_string(fixture_path()).unwrap();
    let header = parse_header(&content).unwrap().unwrap();
    assert_eq!(header.display, Some(DisplayBounds::new(640.0, 480.0)));
}

#[tokio::test]
async fn smile_mode_replay_calibrates_moves_and_clicks_once() {
    let sink = RecordingSink::new();
    let summary = replay(SessionSettings::default(), sink.clone()).await;

    assert_eq!(summary.frames, 244);
    assert_eq!(summary.detector_failures, 1);
    assert_eq!(summary.no_face_frames, 1);
    assert_eq!(summary.calibration_rejections, 0);

    let calibration = summary.calibration.expect("fixture should calibrate");
    assert!((calibration.reference_point.x - 320.0).abs() < 0.1);
    assert!((calibration.reference_point.y - 200.0).abs() < 0.1);
    assert!((calibration.thresholds.x - 4.0 / 322.0).abs() < 1e-12);
    assert!((calibration.thresholds.y - 4.0 / 202.0).abs() < 1e-12);

    let clicks = sink.clicks();
    assert_eq!(summary.clicks, 1);
    assert_eq!(clicks.len(), 1);
    assert!((clicks[0].timestamp_secs - 7.68).abs() < 1e-9);
    assert!(matches!(
        clicks[0].kind,
        ActionKind::Click {
            gesture: GestureKind::Smile,
            ..
        }
    ));
}

#[tokio::test]
async fn blink_mode_replay_clicks_on_wink_only() {
    let sink = RecordingSink::new();
    let settings = SessionSettings {
        gesture_mode: GestureMode::Blink,
        ..SessionSettings::default()
    };
    let summary = replay(settings, sink.clone()).await;

    let clicks = sink.clicks();
    assert_eq!(summary.clicks, 1);
    assert_eq!(clicks.len(), 1);
    assert!((clicks[0].timestamp_secs - 8.48).abs() < 1e-9);
    assert!(matches!(
        clicks[0].kind,
        ActionKind::Click {
            gesture: GestureKind::RightBlink,
            ..
        }
    ));
}

#[tokio::test]
async fn cursor_stays_strictly_inside_display() {
    let sink = RecordingSink::new();
    let settings = SessionSettings::default();
    let bounds = settings.bounds;
    let summary = replay(settings, sink.clone()).await;

    let moves: Vec<(f64, f64)> = sink
        .actions()
        .into_iter()
        .filter_map(|a| match a.kind {
            ActionKind::Move { x, y } => Some((x, y)),
            ActionKind::Click { .. } => None,
        })
        .collect();

    assert_eq!(summary.cursor_moves as usize, moves.len());
    assert!(!moves.is_empty());
    for &(x, y) in &moves {
        assert!(x > 0.0 && x < bounds.width, "x={x} escaped the display");
        assert!(y > 0.0 && y < bounds.height, "y={y} escaped the display");
    }

    // Looking left pushes the cursor right; looking down-frame pushes it up
    // until the top edge stops the Y axis.
    let max_x = moves.iter().map(|m| m.0).fold(f64::MIN, f64::max);
    let min_y = moves.iter().map(|m| m.1).fold(f64::MAX, f64::min);
    assert!(max_x > 400.0);
    assert!(min_y < 8.0);
}

#[tokio::test]
async fn disabled_clicks_produce_no_clicks_or_gesture_notifications() {
    let sink = RecordingSink::new();
    let settings = SessionSettings {
        click_enabled: false,
        ..SessionSettings::default()
    };
    let summary = replay(settings, sink.clone()).await;
    assert_eq!(summary.clicks, 0);
    assert!(sink.clicks().is_empty());
}

#[tokio::test]
async fn observers_see_both_gestures_once() {
    let source = RecordedFrames::load(&fixture_path()).unwrap();
    let mut session = TrackingSession::new(SessionSettings::default(), Box::new(RecordingSink::new()));
    let (observer, mut rx) = ChannelObserver::new();
    session.add_observer(Box::new(observer));

    let mut frame_loop = FrameLoop::new(session, Box::new(source), Box::new(RecordedDetector));
    let summary = frame_loop.run().await.unwrap();

    let mut smiles = 0;
    let mut blinks = 0;
    let mut moves = 0u64;
    while let Ok(notification) = rx.try_recv() {
        match notification {
            SessionNotification::Smile(face) => {
                assert!(face.has_smile);
                smiles += 1;
            }
            SessionNotification::Blink(face) => {
                assert!(face.right_eye_closed && !face.left_eye_closed);
                blinks += 1;
            }
            SessionNotification::CursorMoved(_) => moves += 1,
        }
    }

    assert_eq!(smiles, 1);
    assert_eq!(blinks, 1);
    assert_eq!(moves, summary.cursor_moves);
}
