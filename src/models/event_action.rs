use serde::{Deserialize, Serialize};

/// Direction of an activity toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Started,
    Stopped,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Started => "started",
            EventAction::Stopped => "stopped",
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, EventAction::Started)
    }
}
