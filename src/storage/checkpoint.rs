//! Durable checkpoint of the in-progress recording session.

use crate::errors::AppResult;
use crate::models::session_state::RecordingSessionState;
use crate::storage::sidecar::atomic_write;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the full state. Called after every mutation.
    pub fn save(&self, state: &RecordingSessionState) -> AppResult<()> {
        let json = serde_json::to_string_pretty(state)?;
        atomic_write(&self.path, &json)?;
        Ok(())
    }

    /// `Ok(None)` when no checkpoint exists.
    pub fn load(&self) -> AppResult<Option<RecordingSessionState>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
