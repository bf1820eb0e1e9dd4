//! Turns an activity event log into labelled segments.

use crate::models::activity_event::ActivityEvent;
use crate::models::event_action::EventAction;
use crate::models::segment::Segment;
use crate::models::session_state::sorted_by_elapsed;
use std::collections::BTreeMap;

/// Derive segments from `events`.
///
/// - events are processed by elapsed time, insertion order on ties
/// - a second `Started` for an already open label replaces the open start
/// - a `Stopped` with no open start is dropped
/// - labels still open at the end close at `total_duration_seconds`
///
/// A segment reuses the id and wall-clock time of the `Started` event that
/// opened it, so deriving the same log twice yields identical output.
pub fn derive_segments(events: &[ActivityEvent], total_duration_seconds: f64) -> Vec<Segment> {
    if events.is_empty() {
        return Vec::new();
    }

    let mut open: BTreeMap<&str, &ActivityEvent> = BTreeMap::new();
    let mut segments = Vec::new();

    for ev in sorted_by_elapsed(events) {
        let label = ev.activity_label.as_str();

        match ev.action {
            EventAction::Started => {
                open.insert(label, ev);
            }
            EventAction::Stopped => {
                if let Some(start_ev) = open.remove(label) {
                    segments.push(segment_from(start_ev, ev.elapsed_seconds));
                }
            }
        }
    }

    // Terminal segments for labels never stopped
    for start_ev in open.into_values() {
        segments.push(segment_from(start_ev, total_duration_seconds));
    }

    segments
}

fn segment_from(start_ev: &ActivityEvent, end_seconds: f64) -> Segment {
    Segment {
        id: start_ev.id.clone(),
        start_seconds: start_ev.elapsed_seconds,
        end_seconds,
        tags: vec![start_ev.activity_label.clone()],
        created_at: start_ev.wall_clock_time,
    }
}

/// Total labelled seconds per tag, summed over `segments`.
pub fn seconds_per_tag(segments: &[Segment]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for seg in segments {
        for tag in &seg.tags {
            *totals.entry(tag.clone()).or_insert(0.0) += seg.duration_seconds();
        }
    }
    totals
}
