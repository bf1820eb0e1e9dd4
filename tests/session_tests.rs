use rsensorlog::core::calculator::segments::derive_segments;
use rsensorlog::core::session::RecordingSession;
use rsensorlog::errors::AppError;
use rsensorlog::models::event_action::EventAction;
use rsensorlog::storage::checkpoint::CheckpointStore;
use rsensorlog::storage::segment_store::SegmentStore;
use std::path::Path;

mod common;
use common::{ManualClock, setup_test_dir, t0};

fn open<'a>(dir: &Path, clock: &'a ManualClock) -> RecordingSession<&'a ManualClock> {
    RecordingSession::open(
        CheckpointStore::new(dir.join("session.checkpoint.json")),
        SegmentStore::new(dir),
        clock,
    )
}

#[test]
fn test_walking_toggle_pair_yields_one_segment() {
    let dir = setup_test_dir("session_walking");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    session.start_recording().expect("start");

    clock.advance_secs(5);
    let first = session.toggle_activity("Walking", None).expect("toggle on");
    assert_eq!(first.event.action, EventAction::Started);
    assert_eq!(first.event.elapsed_seconds, 5.0);

    clock.advance_secs(7);
    let second = session.toggle_activity("Walking", None).expect("toggle off");
    assert_eq!(second.event.action, EventAction::Stopped);
    assert_eq!(second.event.elapsed_seconds, 12.0);

    let segs = session.derive_segments(20.0);
    assert_eq!(segs.len(), 1);
    assert_eq!((segs[0].start_seconds, segs[0].end_seconds), (5.0, 12.0));
    assert_eq!(segs[0].tags, vec!["Walking".to_string()]);
    assert!(session.active_labels().is_empty());
}

#[test]
fn test_stop_auto_closes_open_activity() {
    let dir = setup_test_dir("session_autoclose");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    session.start_recording().expect("start");
    clock.advance_secs(3);
    session.toggle_activity("Running", None).expect("toggle");
    clock.advance_secs(27);

    let events = session.stop_recording(None).expect("stop").events;

    assert_eq!(events.len(), 2);
    let last = events.last().expect("auto-close event");
    assert_eq!(last.activity_label, "Running");
    assert_eq!(last.action, EventAction::Stopped);
    assert_eq!(last.elapsed_seconds, 30.0);

    let segs = derive_segments(&events, 30.0);
    assert_eq!(segs.len(), 1);
    assert_eq!((segs[0].start_seconds, segs[0].end_seconds), (3.0, 30.0));

    assert!(!session.is_recording());
    assert!(session.active_labels().is_empty());
    assert!(session.events().is_empty());
}

#[test]
fn test_stop_event_count_includes_auto_closed_labels() {
    let dir = setup_test_dir("session_stop_count");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    session.start_recording().expect("start");
    for label in ["Walking", "Talking", "Eating"] {
        clock.advance_secs(1);
        session.toggle_activity(label, None).expect("toggle");
    }
    clock.advance_secs(1);
    session.toggle_activity("Talking", None).expect("toggle off");

    let before = session.events().len();
    let open_labels = session.active_labels().len();
    assert_eq!(open_labels, 2);

    let events = session.stop_recording(None).expect("stop").events;

    assert_eq!(events.len(), before + open_labels);
    assert!(session.active_labels().is_empty());
}

#[test]
fn test_toggle_while_idle_is_rejected_without_side_effects() {
    let dir = setup_test_dir("session_idle_toggle");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    let err = session
        .toggle_activity("Walking", Some("walk.csv"))
        .expect_err("idle toggle must fail");

    assert!(matches!(err, AppError::NotRecording(ref l) if l == "Walking"));
    assert!(err.is_soft());
    assert!(session.events().is_empty());
    assert!(!dir.join("session.checkpoint.json").exists());
    assert!(!dir.join("walk.segments.json").exists());
}

#[test]
fn test_blank_label_is_rejected() {
    let dir = setup_test_dir("session_blank_label");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);
    session.start_recording().expect("start");

    let err = session.toggle_activity("   ", None).expect_err("blank label");
    assert!(matches!(err, AppError::InvalidLabel(_)));
    assert!(session.events().is_empty());
}

#[test]
fn test_checkpoint_survives_reopen() {
    let dir = setup_test_dir("session_reopen");
    let clock = ManualClock::new(t0());

    {
        let mut session = open(&dir, &clock);
        session.start_recording().expect("start");
        clock.advance_secs(4);
        session.toggle_activity("Cycling", None).expect("toggle");
    }

    // Simulated process restart
    clock.advance_secs(6);
    let mut resumed = open(&dir, &clock);

    assert!(resumed.is_recording());
    assert_eq!(resumed.events().len(), 1);
    assert!(resumed.active_labels().contains("Cycling"));
    assert_eq!(resumed.elapsed_seconds(), 10.0);

    let out = resumed.toggle_activity("Cycling", None).expect("toggle off");
    assert_eq!(out.event.action, EventAction::Stopped);
    assert_eq!(out.event.elapsed_seconds, 10.0);

    resumed.stop_recording(None).expect("stop");
    assert!(!dir.join("session.checkpoint.json").exists());

    let fresh = open(&dir, &clock);
    assert!(!fresh.is_recording());
}

#[test]
fn test_unreadable_checkpoint_starts_idle() {
    let dir = setup_test_dir("session_bad_checkpoint");
    std::fs::write(dir.join("session.checkpoint.json"), "{ not json").expect("write");
    let clock = ManualClock::new(t0());

    let session = open(&dir, &clock);

    assert!(!session.is_recording());
    assert!(session.events().is_empty());
}

#[test]
fn test_start_while_recording_rearms() {
    let dir = setup_test_dir("session_rearm");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    session.start_recording().expect("start");
    clock.advance_secs(2);
    session.toggle_activity("Walking", None).expect("toggle");

    clock.advance_secs(10);
    let restarted_at = session.start_recording().expect("restart");

    assert_eq!(restarted_at, clock_now(&clock));
    assert!(session.is_recording());
    assert!(session.events().is_empty());
    assert!(session.active_labels().is_empty());
    assert_eq!(session.elapsed_seconds(), 0.0);
}

fn clock_now(clock: &ManualClock) -> chrono::DateTime<chrono::Local> {
    use rsensorlog::utils::Clock;
    clock.now()
}

#[test]
fn test_toggle_writes_segments_for_current_file() {
    let dir = setup_test_dir("session_writes_sidecar");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    session.start_recording().expect("start");
    clock.advance_secs(5);
    let out = session
        .toggle_activity("Walking", Some("rec_001.csv"))
        .expect("toggle on");
    assert_eq!(out.segments_written, Some(1));

    // The open segment is written up to "now"
    let store = SegmentStore::new(&dir);
    let segs = store.load("rec_001.csv");
    assert_eq!(segs.len(), 1);
    assert_eq!((segs[0].start_seconds, segs[0].end_seconds), (5.0, 5.0));

    clock.advance_secs(7);
    session
        .toggle_activity("Walking", Some("rec_001.csv"))
        .expect("toggle off");
    clock.advance_secs(3);
    session.toggle_activity("Lying", Some("rec_001.csv")).expect("toggle on");
    clock.advance_secs(5);
    let stopped = session.stop_recording(Some("rec_001.csv")).expect("stop");
    assert_eq!(stopped.segments_written, Some(2));

    let segs = store.load("rec_001.csv");
    assert_eq!(segs.len(), 2);
    assert_eq!((segs[0].start_seconds, segs[0].end_seconds), (5.0, 12.0));
    assert_eq!(segs[1].tags, vec!["Lying".to_string()]);
    assert_eq!((segs[1].start_seconds, segs[1].end_seconds), (15.0, 20.0));
    assert!(dir.join("rec_001.segments.json").exists());
}

#[test]
fn test_toggle_without_file_writes_no_sidecar() {
    let dir = setup_test_dir("session_no_file");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    session.start_recording().expect("start");
    let out = session.toggle_activity("Walking", None).expect("toggle");

    assert_eq!(out.segments_written, None);
    assert!(SegmentStore::new(&dir).list_file_ids().expect("list").is_empty());
}

#[test]
fn test_stop_while_idle_returns_empty_log() {
    let dir = setup_test_dir("session_idle_stop");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    let outcome = session.stop_recording(Some("x.csv")).expect("stop idle");
    let events = outcome.events;
    assert_eq!(outcome.segments_written, None);

    assert!(events.is_empty());
    assert!(!dir.join("x.segments.json").exists());
}

#[test]
fn test_elapsed_keeps_millisecond_precision() {
    let dir = setup_test_dir("session_millis");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    session.start_recording().expect("start");
    clock.advance_millis(1_250);
    session.toggle_activity("Standing", None).expect("on");
    clock.advance_millis(2_500);
    let off = session.toggle_activity("Standing", None).expect("off");

    assert_eq!(off.event.elapsed_seconds, 3.75);
    let segs = session.derive_segments(session.elapsed_seconds());
    assert_eq!((segs[0].start_seconds, segs[0].end_seconds), (1.25, 3.75));
}

/// Occupy the sidecar path with a non-empty directory so writes fail.
fn block_sidecar(dir: &Path, stem: &str) {
    let blocked = dir.join(format!("{stem}.segments.json"));
    std::fs::create_dir_all(blocked.join("occupied")).expect("block sidecar");
}

#[test]
fn test_toggle_reports_failed_segment_write() {
    let dir = setup_test_dir("session_toggle_write_fails");
    block_sidecar(&dir, "rec");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    session.start_recording().expect("start");
    clock.advance_secs(3);
    let out = session
        .toggle_activity("Running", Some("rec.csv"))
        .expect("toggle still succeeds");

    assert_eq!(out.segments_written, None);
    assert!(session.active_labels().contains("Running"));
    assert_eq!(session.events().len(), 1);
}

#[test]
fn test_stop_reports_failed_final_segment_write() {
    let dir = setup_test_dir("session_stop_write_fails");
    let clock = ManualClock::new(t0());
    let mut session = open(&dir, &clock);

    session.start_recording().expect("start");
    clock.advance_secs(3);
    session.toggle_activity("Running", None).expect("toggle");
    block_sidecar(&dir, "rec");
    clock.advance_secs(27);

    let outcome = session.stop_recording(Some("rec.csv")).expect("stop");

    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.segments_written, None);
    assert!(!session.is_recording());
}
