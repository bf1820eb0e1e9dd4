use super::event_action::EventAction;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user-marked toggle during a recording.
///
/// Events are ordered by `elapsed_seconds`; `wall_clock_time` is informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: String,
    pub activity_label: String,
    pub action: EventAction,
    pub elapsed_seconds: f64,
    pub wall_clock_time: DateTime<Local>,
}

impl ActivityEvent {
    /// Build a new event with a fresh id. Negative elapsed values are clamped to 0.
    pub fn new(
        label: impl Into<String>,
        action: EventAction,
        elapsed_seconds: f64,
        wall_clock_time: DateTime<Local>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            activity_label: label.into(),
            action,
            elapsed_seconds: elapsed_seconds.max(0.0),
            wall_clock_time,
        }
    }

    pub fn started(label: impl Into<String>, elapsed_seconds: f64, at: DateTime<Local>) -> Self {
        Self::new(label, EventAction::Started, elapsed_seconds, at)
    }

    pub fn stopped(label: impl Into<String>, elapsed_seconds: f64, at: DateTime<Local>) -> Self {
        Self::new(label, EventAction::Stopped, elapsed_seconds, at)
    }
}
