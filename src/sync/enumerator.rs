//! Enumeration of raw data files already synced to local storage.

use crate::errors::AppResult;
use crate::models::file_descriptor::FileDescriptor;
use crate::storage::sidecar::is_sidecar;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub trait RawFileEnumerator {
    /// Every locally synced raw file, with full metadata.
    fn synced_files(&self) -> AppResult<Vec<FileDescriptor>>;
}

/// Raw files are the files of one directory whose extension is listed in
/// `extensions`. Sidecars and temp files are never raw files.
#[derive(Debug, Clone)]
pub struct DirectoryEnumerator {
    dir: PathBuf,
    extensions: Vec<String>,
    source_device: String,
}

impl DirectoryEnumerator {
    pub fn new(dir: impl Into<PathBuf>, extensions: &[String], source_device: &str) -> Self {
        Self {
            dir: dir.into(),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            source_device: source_device.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_raw_file(&self, path: &Path) -> bool {
        if is_sidecar(path) {
            return false;
        }
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }

    /// Most recently created raw file, ties broken by name.
    pub fn newest(&self) -> AppResult<Option<FileDescriptor>> {
        Ok(self
            .synced_files()?
            .into_iter()
            .max_by(|a, b| {
                a.creation_time
                    .cmp(&b.creation_time)
                    .then_with(|| a.name.cmp(&b.name))
            }))
    }
}

fn to_local(t: std::io::Result<SystemTime>) -> Option<DateTime<Local>> {
    t.ok().map(DateTime::<Local>::from)
}

impl RawFileEnumerator for DirectoryEnumerator {
    fn synced_files(&self) -> AppResult<Vec<FileDescriptor>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !self.is_raw_file(&path) {
                continue;
            }

            let meta = entry.metadata()?;
            let modified = to_local(meta.modified());
            // Not every filesystem records creation time
            let created = to_local(meta.created()).or(modified);

            files.push(FileDescriptor::synced(
                entry.file_name().to_string_lossy().to_string(),
                meta.len(),
                created,
                modified,
                &self.source_device,
            ));
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}
