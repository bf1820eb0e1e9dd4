//! Three-way merge of synced, pending and in-flight raw files.

use crate::errors::AppResult;
use crate::models::file_descriptor::{FileDescriptor, SyncState};
use crate::sync::link::RemoteLink;
use chrono::{DateTime, Duration, Local};
use std::collections::{BTreeMap, BTreeSet};

/// Names the caller has asked the device to send, with the time of the
/// request. Lives in memory only.
#[derive(Debug, Clone, Default)]
pub struct TransferTracker {
    in_flight: BTreeMap<String, DateTime<Local>>,
}

impl TransferTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when `name` was already in flight (the original
    /// request time is kept).
    pub fn mark(&mut self, name: impl Into<String>, at: DateTime<Local>) -> bool {
        let name = name.into();
        if self.in_flight.contains_key(&name) {
            return false;
        }
        self.in_flight.insert(name, at);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.in_flight.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.in_flight.remove(name).is_some()
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.in_flight.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Drop entries requested more than `timeout` before `now`, except names
    /// in `keep`. Returns the dropped names.
    fn expire(
        &mut self,
        now: DateTime<Local>,
        timeout: Duration,
        keep: &BTreeSet<&str>,
    ) -> Vec<String> {
        let stale: Vec<String> = self
            .in_flight
            .iter()
            .filter(|(name, at)| !keep.contains(name.as_str()) && now - **at > timeout)
            .map(|(name, _)| name.clone())
            .collect();

        for name in &stale {
            self.in_flight.remove(name);
        }
        stale
    }
}

/// Merge without touching any tracker.
///
/// Synced entries come first (input order), then pending entries whose name
/// is not synced. Local evidence of a completed transfer always wins.
/// Names in `transferring` are forced to [`SyncState::Transferring`].
pub fn merge_files(
    synced: &[FileDescriptor],
    pending: &[FileDescriptor],
    transferring: &BTreeSet<String>,
) -> Vec<FileDescriptor> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut merged = Vec::with_capacity(synced.len() + pending.len());

    for f in synced {
        if seen.insert(f.name.as_str()) {
            merged.push(FileDescriptor {
                sync_state: SyncState::Synced,
                ..f.clone()
            });
        }
    }

    for f in pending {
        if seen.insert(f.name.as_str()) {
            merged.push(FileDescriptor {
                sync_state: SyncState::Pending,
                ..f.clone()
            });
        }
    }

    for f in merged.iter_mut() {
        if transferring.contains(&f.name) {
            f.sync_state = SyncState::Transferring;
        }
    }

    merged
}

#[derive(Debug, Clone, Default)]
pub struct FileSyncReconciler {
    tracker: TransferTracker,
    transfer_timeout: Option<Duration>,
}

impl FileSyncReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// With a timeout, in-flight requests older than it fall back to pending.
    pub fn with_timeout(transfer_timeout: Option<Duration>) -> Self {
        Self {
            tracker: TransferTracker::new(),
            transfer_timeout,
        }
    }

    pub fn tracker(&self) -> &TransferTracker {
        &self.tracker
    }

    pub fn mark_transferring(&mut self, name: impl Into<String>, at: DateTime<Local>) -> bool {
        self.tracker.mark(name, at)
    }

    /// Optimistically mark `name` in flight and ask the device for it. The
    /// mark is rolled back if the request cannot be sent.
    pub fn request_transfer(
        &mut self,
        link: &mut dyn RemoteLink,
        name: &str,
        at: DateTime<Local>,
    ) -> AppResult<()> {
        let newly = self.tracker.mark(name, at);
        if let Err(e) = link.request_file(name) {
            if newly {
                self.tracker.remove(name);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Build the annotated file list.
    ///
    /// Entries in flight show as transferring for this call; the ones that
    /// have shown up in `synced` are then considered complete and dropped
    /// from the tracker. Repeated calls with unchanged inputs give the same
    /// list.
    pub fn reconcile(
        &mut self,
        synced: &[FileDescriptor],
        pending: &[FileDescriptor],
        now: DateTime<Local>,
    ) -> Vec<FileDescriptor> {
        let synced_names: BTreeSet<&str> = synced.iter().map(|f| f.name.as_str()).collect();

        if let Some(timeout) = self.transfer_timeout {
            for name in self.tracker.expire(now, timeout, &synced_names) {
                log::warn!("transfer of {name} timed out, showing it as pending again");
            }
        }

        let merged = merge_files(synced, pending, &self.tracker.names());

        let completed: Vec<String> = self
            .tracker
            .names()
            .into_iter()
            .filter(|n| synced_names.contains(n.as_str()))
            .collect();
        for name in completed {
            log::info!("transfer of {name} completed");
            self.tracker.remove(&name);
        }

        merged
    }
}
