// src/export/logic.rs

use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::models::segment::SegmentRecord;
use crate::storage::segment_store::SegmentStore;
use crate::ui::messages::warning;
use std::path::Path;

/// High-level export of segment sidecars.
pub struct ExportLogic;

impl ExportLogic {
    /// Export segments.
    ///
    /// - `source`: a single raw file id, or `None` for every sidecar in the store
    /// - `file`: output path
    /// - `force`: overwrite without asking
    pub fn export(
        store: &SegmentStore,
        format: ExportFormat,
        file: &str,
        source: Option<&str>,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        let empty = match source {
            Some(id) => store.load(id).is_empty(),
            None => store.list_file_ids()?.is_empty(),
        };
        if empty {
            warning("No segments found for the selected source. Nothing to export.");
            return Ok(());
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => {
                let text = match source {
                    Some(id) => store.export_csv(id)?,
                    None => store.export_all_csv()?,
                };
                export_csv(&text, path)?
            }
            ExportFormat::Json => {
                let json = match source {
                    Some(id) => serde_json::to_string_pretty(&[SegmentRecord::new(
                        id,
                        store.load(id),
                    )])?,
                    None => store.export_all_json()?,
                };
                export_json(&json, path)?
            }
        }

        Ok(())
    }
}
