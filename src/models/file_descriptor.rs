use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Transfer lifecycle of a raw file from the wearable to local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Pending,
    Transferring,
    Synced,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Pending => "pending",
            SyncState::Transferring => "transferring",
            SyncState::Synced => "synced",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SyncState::Pending => "⌛",
            SyncState::Transferring => "🔄",
            SyncState::Synced => "✅",
        }
    }
}

/// One raw data file as shown to the user. Rebuilt on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub creation_time: Option<DateTime<Local>>,
    #[serde(default)]
    pub modification_time: Option<DateTime<Local>>,
    pub sync_state: SyncState,
    #[serde(default)]
    pub source_device: String,
}

impl FileDescriptor {
    pub fn synced(
        name: impl Into<String>,
        size: u64,
        creation_time: Option<DateTime<Local>>,
        modification_time: Option<DateTime<Local>>,
        source_device: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            creation_time,
            modification_time,
            sync_state: SyncState::Synced,
            source_device: source_device.into(),
        }
    }

    pub fn pending(
        name: impl Into<String>,
        size: u64,
        creation_time: Option<DateTime<Local>>,
        source_device: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            creation_time,
            modification_time: None,
            sync_state: SyncState::Pending,
            source_device: source_device.into(),
        }
    }
}
