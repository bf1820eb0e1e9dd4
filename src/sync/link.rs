//! Opaque link to the wearable: reachability, pending files, requests.

use crate::errors::{AppError, AppResult};
use crate::models::file_descriptor::FileDescriptor;
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// What the core needs from the device transport. Requests are
/// fire-and-forget: `Ok` only means the request was handed over.
pub trait RemoteLink {
    fn is_reachable(&self) -> bool;

    /// Files the device still holds, with possibly partial metadata.
    fn pending_files(&self) -> Vec<FileDescriptor>;

    fn request_file(&mut self, name: &str) -> AppResult<()>;
    fn request_metadata_update(&mut self) -> AppResult<()>;
    fn request_sync_from_device(&mut self) -> AppResult<()>;
    fn request_delete_synced_on_device(&mut self) -> AppResult<()>;
    fn request_delete_all_on_device(&mut self) -> AppResult<()>;
    fn send_data_collection_state(&mut self, enabled: bool) -> AppResult<()>;
}

/// A request handed to a [`ManifestLink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRequest {
    File(String),
    MetadataUpdate,
    SyncFromDevice,
    DeleteSyncedOnDevice,
    DeleteAllOnDevice,
    DataCollection(bool),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PendingEntry {
    name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    creation_time: Option<DateTime<Local>>,
}

fn default_reachable() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(default = "default_reachable")]
    reachable: bool,
    #[serde(default)]
    device: String,
    #[serde(default)]
    pending_files: Vec<PendingEntry>,
}

/// Link backed by a JSON manifest describing what the device reported:
///
/// ```json
/// { "reachable": true, "device": "watch-01",
///   "pendingFiles": [ { "name": "walk.csv", "size": 2048,
///                       "creationTime": "2025-05-01T10:00:00+02:00" } ] }
/// ```
///
/// Requests are recorded in memory instead of being transmitted.
#[derive(Debug, Clone, Default)]
pub struct ManifestLink {
    reachable: bool,
    device: String,
    pending: Vec<FileDescriptor>,
    requests: Vec<LinkRequest>,
}

impl ManifestLink {
    /// Unreachable link with nothing pending.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let pending = manifest
            .pending_files
            .into_iter()
            .map(|p| FileDescriptor::pending(p.name, p.size, p.creation_time, &manifest.device))
            .collect();

        Ok(Self {
            reachable: manifest.reachable,
            device: manifest.device,
            pending,
            requests: Vec::new(),
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn requests(&self) -> &[LinkRequest] {
        &self.requests
    }

    fn send(&mut self, request: LinkRequest) -> AppResult<()> {
        if !self.reachable {
            return Err(AppError::LinkUnavailable(format!(
                "device not reachable, dropping {request:?}"
            )));
        }
        log::info!("link request: {request:?}");
        self.requests.push(request);
        Ok(())
    }
}

impl RemoteLink for ManifestLink {
    fn is_reachable(&self) -> bool {
        self.reachable
    }

    fn pending_files(&self) -> Vec<FileDescriptor> {
        self.pending.clone()
    }

    fn request_file(&mut self, name: &str) -> AppResult<()> {
        self.send(LinkRequest::File(name.to_string()))
    }

    fn request_metadata_update(&mut self) -> AppResult<()> {
        self.send(LinkRequest::MetadataUpdate)
    }

    fn request_sync_from_device(&mut self) -> AppResult<()> {
        self.send(LinkRequest::SyncFromDevice)
    }

    fn request_delete_synced_on_device(&mut self) -> AppResult<()> {
        self.send(LinkRequest::DeleteSyncedOnDevice)
    }

    fn request_delete_all_on_device(&mut self) -> AppResult<()> {
        self.send(LinkRequest::DeleteAllOnDevice)
    }

    fn send_data_collection_state(&mut self, enabled: bool) -> AppResult<()> {
        self.send(LinkRequest::DataCollection(enabled))
    }
}
