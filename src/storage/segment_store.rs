//! Durable per-raw-file segment store backed by JSON sidecars.

use crate::errors::{AppError, AppResult};
use crate::export::csv::segments_to_csv;
use crate::models::segment::{Segment, SegmentRecord};
use crate::storage::sidecar::{self, SidecarError};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Segment sidecars living next to the raw data files of one directory.
#[derive(Debug, Clone)]
pub struct SegmentStore {
    dir: PathBuf,
}

impl SegmentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn sidecar_path(&self, file_id: &str) -> PathBuf {
        sidecar::sidecar_path(&self.dir, file_id)
    }

    /// Read the record for `file_id`, telling absent, corrupt,
    /// unsupported-version and foreign sidecars apart.
    pub fn try_load(&self, file_id: &str) -> Result<SegmentRecord, SidecarError> {
        let path = self.sidecar_path(file_id);
        let record = sidecar::read_record(&path)?;
        if record.file_id != file_id {
            return Err(SidecarError::ForeignRecord {
                path,
                owner: record.file_id,
            });
        }
        Ok(record)
    }

    /// Segments for `file_id`; empty when there is no usable sidecar.
    pub fn load(&self, file_id: &str) -> Vec<Segment> {
        match self.try_load(file_id) {
            Ok(record) => record.segments,
            Err(e) => {
                if !e.is_absent() {
                    log::warn!("ignoring sidecar for {file_id}: {e}");
                }
                Vec::new()
            }
        }
    }

    /// Overwrite the whole record for `file_id`. Records of a newer schema
    /// or of another raw file are never replaced.
    pub fn save(&self, file_id: &str, segments: &[Segment]) -> AppResult<()> {
        self.check_writable(file_id)?;
        self.write(file_id, segments)
    }

    fn write(&self, file_id: &str, segments: &[Segment]) -> AppResult<()> {
        let record = SegmentRecord::new(file_id, segments.to_vec());
        sidecar::write_record(&self.sidecar_path(file_id), &record)?;
        log::debug!("saved {} segment(s) for {file_id}", segments.len());
        Ok(())
    }

    /// Load for a read-modify-write cycle. A corrupt record is replaced,
    /// a record written by a newer schema or for another raw file is left alone.
    fn load_for_update(&self, file_id: &str) -> AppResult<Vec<Segment>> {
        match self.try_load(file_id) {
            Ok(record) => Ok(record.segments),
            Err(SidecarError::Absent(_)) => Ok(Vec::new()),
            Err(SidecarError::UnsupportedVersion { version, .. }) => {
                Err(AppError::UnsupportedSchema {
                    file_id: file_id.to_string(),
                    version,
                })
            }
            Err(SidecarError::ForeignRecord { owner, .. }) => Err(AppError::SidecarConflict {
                file_id: file_id.to_string(),
                owner,
            }),
            Err(e @ SidecarError::Corrupt { .. }) => {
                log::warn!("overwriting unreadable sidecar: {e}");
                Ok(Vec::new())
            }
        }
    }

    fn check_writable(&self, file_id: &str) -> AppResult<()> {
        self.load_for_update(file_id).map(|_| ())
    }

    pub fn add(&self, file_id: &str, segment: Segment) -> AppResult<()> {
        self.add_many(file_id, vec![segment])
    }

    pub fn add_many(&self, file_id: &str, segments: Vec<Segment>) -> AppResult<()> {
        segments.iter().try_for_each(check_tags)?;

        let mut current = self.load_for_update(file_id)?;
        current.extend(segments);
        self.write(file_id, &current)
    }

    /// Replace the segment with the same id. Returns `false` (and writes
    /// nothing) when no segment matches.
    pub fn update(&self, file_id: &str, segment: Segment) -> AppResult<bool> {
        check_tags(&segment)?;
        let mut current = self.load_for_update(file_id)?;

        let Some(slot) = current.iter_mut().find(|s| s.id == segment.id) else {
            return Ok(false);
        };
        *slot = segment;

        self.write(file_id, &current)?;
        Ok(true)
    }

    /// Remove the segment with `id`. Returns whether something was removed.
    pub fn delete(&self, file_id: &str, id: &str) -> AppResult<bool> {
        let mut current = self.load_for_update(file_id)?;
        let before = current.len();
        current.retain(|s| s.id != id);

        if current.len() == before {
            return Ok(false);
        }

        self.write(file_id, &current)?;
        Ok(true)
    }

    /// Remove the whole sidecar. Returns `false` if there was none.
    pub fn delete_all(&self, file_id: &str) -> AppResult<bool> {
        self.check_writable(file_id)?;
        match fs::remove_file(self.sidecar_path(file_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Segments carrying `tag` (exact, case-sensitive).
    pub fn query_by_tag(&self, file_id: &str, tag: &str) -> Vec<Segment> {
        self.load(file_id)
            .into_iter()
            .filter(|s| s.has_tag(tag))
            .collect()
    }

    /// Segments overlapping `[start, end]`; touching endpoints do not overlap.
    pub fn query_by_range(&self, file_id: &str, start: f64, end: f64) -> Vec<Segment> {
        self.load(file_id)
            .into_iter()
            .filter(|s| s.overlaps(start, end))
            .collect()
    }

    /// File ids of every readable sidecar in the directory, sorted.
    pub fn list_file_ids(&self) -> AppResult<Vec<String>> {
        Ok(self
            .all_records()?
            .into_iter()
            .map(|r| r.file_id)
            .collect())
    }

    fn all_records(&self) -> AppResult<Vec<SegmentRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !sidecar::is_sidecar(&path) {
                continue;
            }
            match sidecar::read_record(&path) {
                Ok(r) => records.push(r),
                Err(e) => log::warn!("skipping sidecar: {e}"),
            }
        }

        records.sort_by(|a, b| a.file_id.cmp(&b.file_id));
        Ok(records)
    }

    pub fn export_csv(&self, file_id: &str) -> AppResult<String> {
        let record = SegmentRecord::new(file_id, self.load(file_id));
        segments_to_csv(&[record])
    }

    pub fn export_all_csv(&self) -> AppResult<String> {
        segments_to_csv(&self.all_records()?)
    }

    pub fn export_all_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.all_records()?)?)
    }
}

/// Stored segments carry at least one tag and no blank ones.
fn check_tags(segment: &Segment) -> AppResult<()> {
    if segment.tags.is_empty() {
        return Err(AppError::InvalidLabel(format!(
            "segment {} has no tags",
            segment.id
        )));
    }
    if segment.tags.iter().any(|t| t.trim().is_empty()) {
        return Err(AppError::InvalidLabel(format!(
            "segment {} has a blank tag",
            segment.id
        )));
    }
    Ok(())
}
