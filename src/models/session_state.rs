use super::activity_event::ActivityEvent;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Checkpointed state of one recording session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSessionState {
    pub is_recording: bool,
    pub start_time: Option<DateTime<Local>>,
    #[serde(default)]
    pub events: Vec<ActivityEvent>,
    #[serde(default)]
    pub active_labels: BTreeSet<String>,
}

impl RecordingSessionState {
    /// Fresh Active state anchored at `start`.
    pub fn started_at(start: DateTime<Local>) -> Self {
        Self {
            is_recording: true,
            start_time: Some(start),
            events: Vec::new(),
            active_labels: BTreeSet::new(),
        }
    }

    /// Labels whose most recent event (by elapsed time, insertion order on
    /// ties) is a `Started`.
    pub fn compute_active_labels(events: &[ActivityEvent]) -> BTreeSet<String> {
        let mut last: BTreeMap<&str, &ActivityEvent> = BTreeMap::new();

        for ev in sorted_by_elapsed(events) {
            last.insert(ev.activity_label.as_str(), ev);
        }

        last.into_iter()
            .filter(|(_, ev)| ev.action.is_started())
            .map(|(label, _)| label.to_string())
            .collect()
    }

    /// Re-derive `active_labels` from the event log.
    pub fn repair_active_labels(&mut self) -> bool {
        let computed = Self::compute_active_labels(&self.events);
        if computed != self.active_labels {
            self.active_labels = computed;
            return true;
        }
        false
    }
}

/// Stable sort by `elapsed_seconds`: events with equal elapsed time keep
/// their insertion order.
pub fn sorted_by_elapsed(events: &[ActivityEvent]) -> Vec<&ActivityEvent> {
    let mut sorted: Vec<&ActivityEvent> = events.iter().collect();
    sorted.sort_by(|a, b| {
        a.elapsed_seconds
            .partial_cmp(&b.elapsed_seconds)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}
