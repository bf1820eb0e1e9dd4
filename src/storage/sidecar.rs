//! Sidecar files: one `<stem>.segments.json` next to each raw data file.

use crate::models::segment::{SCHEMA_VERSION, SegmentRecord};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SIDECAR_SUFFIX: &str = ".segments.json";

/// Why a sidecar could not be read.
#[derive(Error, Debug)]
pub enum SidecarError {
    #[error("no sidecar at {0}")]
    Absent(PathBuf),

    #[error("sidecar {path} is unreadable: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("sidecar {path} has unsupported schema version {version}")]
    UnsupportedVersion { path: PathBuf, version: u32 },

    /// Raw files sharing a stem share a sidecar path; the record on disk
    /// belongs to `owner`.
    #[error("sidecar {path} belongs to {owner}")]
    ForeignRecord { path: PathBuf, owner: String },
}

impl SidecarError {
    pub fn is_absent(&self) -> bool {
        matches!(self, SidecarError::Absent(_))
    }
}

/// Sidecar file name for a raw data file: extension stripped, suffix appended.
///
/// `walk_0412.csv` → `walk_0412.segments.json`
pub fn sidecar_name(file_id: &str) -> String {
    let stem = Path::new(file_id)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_id.to_string());
    format!("{stem}{SIDECAR_SUFFIX}")
}

pub fn sidecar_path(dir: &Path, file_id: &str) -> PathBuf {
    dir.join(sidecar_name(file_id))
}

pub fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(SIDECAR_SUFFIX))
        .unwrap_or(false)
}

/// Read and validate a sidecar.
pub fn read_record(path: &Path) -> Result<SegmentRecord, SidecarError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SidecarError::Absent(path.to_path_buf()));
        }
        Err(e) => {
            return Err(SidecarError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let record: SegmentRecord =
        serde_json::from_str(&content).map_err(|e| SidecarError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if record.version != SCHEMA_VERSION {
        return Err(SidecarError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: record.version,
        });
    }

    Ok(record)
}

/// Write a sidecar through a `.tmp` sibling and rename it into place, so a
/// crash mid-write never leaves a truncated record.
pub fn write_record(path: &Path, record: &SegmentRecord) -> io::Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    atomic_write(path, &json)
}

pub(crate) fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}
