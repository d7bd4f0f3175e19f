//! Playback Session Integration Test
//!
//! Drives sessions end to end through JSON commands:
//! - Session registry connect / disconnect
//! - Tick driver under paused tokio time
//! - Frame stream (state, tick, complete, error)
//! - Event markers and bed changes crossed by ticks

use chrono::{NaiveDate, NaiveDateTime};
use std::time::Duration;
use tokio::sync::broadcast;
use wardops_runner::{
    BedChange, BedStatus, EventMarker, MarkerTrack, PlaybackCommand, PlaybackFrame, SessionConfig, SessionRegistry,
    load_config_from_str, load_default_config,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn command(json: &str) -> PlaybackCommand {
    PlaybackCommand::from_json(json).unwrap()
}

fn drain(rx: &mut broadcast::Receiver<PlaybackFrame>) -> Vec<PlaybackFrame> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}

/// Scenario: seek to 08:00, 5x, play, three ticks -> 08:15
#[tokio::test(start_paused = true)]
async fn test_json_driven_playback() {
    init_logging();
    let registry = SessionRegistry::new();
    let session = registry
        .connect(load_default_config().unwrap(), MarkerTrack::default())
        .unwrap();
    let mut rx = session.subscribe();

    session
        .apply(command(r#"{"action": "seek", "time": "2026-01-15T08:00:00"}"#))
        .await
        .unwrap();
    session
        .apply(command(r#"{"action": "speed", "value": 5}"#))
        .await
        .unwrap();
    session.apply(command(r#"{"action": "play"}"#)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(3500)).await;

    let state = session
        .apply(command(r#"{"action": "pause"}"#))
        .await
        .unwrap();
    assert_eq!(state.current_time, at(8, 15));
    assert!(!state.is_playing);

    let frames = drain(&mut rx);
    let ticks = frames
        .iter()
        .filter(|f| matches!(f, PlaybackFrame::Tick { .. }))
        .count();
    assert_eq!(ticks, 3);
    assert!(frames.iter().all(|f| f.session_id() == session.id()));
}

/// Scenario: four steps forward from 08:00 -> 09:00, then scrub to midday
#[tokio::test]
async fn test_step_and_scrub_commands() {
    init_logging();
    let config = load_config_from_str(r#"{ "replay_start": "2026-01-15T08:00:00" }"#).unwrap();
    let registry = SessionRegistry::new();
    let session = registry.connect(config, MarkerTrack::default()).unwrap();

    for _ in 0..4 {
        session
            .apply(command(r#"{"action": "step_forward"}"#))
            .await
            .unwrap();
    }
    assert_eq!(session.snapshot().await.current_time, at(9, 0));

    session
        .apply(command(r#"{"action": "seek", "time": "2026-01-15T13:30:00"}"#))
        .await
        .unwrap();
    let state = session
        .apply(command(r#"{"action": "scrub", "fraction": 0.5}"#))
        .await
        .unwrap();
    assert_eq!(state.current_time, at(12, 0));
}

/// A full replay at 10x with markers ends with a complete frame
#[tokio::test(start_paused = true)]
async fn test_replay_to_completion_with_markers() {
    init_logging();
    let markers = MarkerTrack::new(vec![
        EventMarker::new(1, "arrival", at(0, 25)).with_patient(1),
        EventMarker::new(2, "bed_assignment", at(0, 40))
            .with_patient(1)
            .with_bed(3),
        EventMarker::new(3, "discharge", at(1, 30)).with_patient(1).with_bed(3),
    ]);
    let config = load_config_from_str(
        r#"{ "replay_length_hours": 2, "initial_speed": 10, "tick_interval_ms": 500 }"#,
    )
    .unwrap();

    let registry = SessionRegistry::new();
    let session = registry.connect(config, markers).unwrap();
    let mut rx = session.subscribe();

    session.play().await.unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;

    let frames = drain(&mut rx);
    let crossed: Vec<u64> = frames
        .iter()
        .filter_map(|f| match f {
            PlaybackFrame::Tick { delta, .. } => Some(delta.event_markers.iter().map(|m| m.id)),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(crossed, vec![1, 2, 3]);

    let bed_changes: Vec<BedChange> = frames
        .iter()
        .filter_map(|f| match f {
            PlaybackFrame::Tick { delta, .. } => Some(delta.bed_changes.clone()),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(
        bed_changes,
        vec![
            BedChange {
                bed_id: 3,
                status: BedStatus::Occupied,
                patient_id: Some(1),
            },
            BedChange {
                bed_id: 3,
                status: BedStatus::Empty,
                patient_id: None,
            },
        ]
    );

    let complete = frames
        .iter()
        .filter(|f| matches!(f, PlaybackFrame::Complete { .. }))
        .count();
    assert_eq!(complete, 1);

    let state = session.snapshot().await;
    assert_eq!(state.current_time, at(2, 0));
    assert!(!state.is_playing);
    assert!(!session.is_ticking().await);
}

/// Disconnecting a playing session releases its ticker
#[tokio::test(start_paused = true)]
async fn test_disconnect_while_playing() {
    init_logging();
    let registry = SessionRegistry::new();
    let session = registry
        .connect(SessionConfig::default(), MarkerTrack::default())
        .unwrap();

    session.play().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(registry.disconnect(&session.id()).await);

    let stopped_at = session.snapshot().await.current_time;
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(stopped_at, at(0, 2));
    assert_eq!(session.snapshot().await.current_time, stopped_at);
    assert!(session.apply(PlaybackCommand::Play).await.is_err());
}

/// Frames serialize to the replay wire shape
#[tokio::test(start_paused = true)]
async fn test_frames_serialize() {
    init_logging();
    let registry = SessionRegistry::new();
    let session = registry
        .connect(SessionConfig::default(), MarkerTrack::default())
        .unwrap();
    let mut rx = session.subscribe();

    session.play().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let frames = drain(&mut rx);
    let json: Vec<serde_json::Value> = frames
        .iter()
        .map(|f| serde_json::from_str(&f.to_json().unwrap()).unwrap())
        .collect();

    assert_eq!(json[0]["type"], "state");
    assert_eq!(json[0]["state"]["is_playing"], true);
    assert_eq!(json[0]["state"]["playback_speed"], 1);
    assert_eq!(json[1]["type"], "tick");
    assert_eq!(json[1]["timestamp"], "2026-01-15T00:01:00");
}

/// Browser-style timestamps seek, and a failing tick reports an error frame
#[tokio::test(start_paused = true)]
async fn test_browser_seek_and_tick_error() {
    init_logging();
    let registry = SessionRegistry::new();
    let session = registry
        .connect(SessionConfig::default(), MarkerTrack::default())
        .unwrap();
    let mut rx = session.subscribe();

    let state = session
        .apply(command(r#"{"action": "seek", "time": "2026-01-15T06:30:00.000Z"}"#))
        .await
        .unwrap();
    assert_eq!(state.current_time, at(6, 30));

    session
        .apply(command(r#"{"action": "speed", "value": 10000000000000000000000000}"#))
        .await
        .unwrap();
    session.apply(command(r#"{"action": "play"}"#)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let json: Vec<serde_json::Value> = drain(&mut rx)
        .iter()
        .map(|f| serde_json::to_value(f).unwrap())
        .collect();
    let error = json
        .iter()
        .find(|frame| frame["type"] == "error")
        .expect("error frame");
    assert!(error["message"].as_str().unwrap().contains("out of range"));
    assert_eq!(json.last().unwrap()["state"]["is_playing"], false);
    assert!(!session.is_ticking().await);
}
