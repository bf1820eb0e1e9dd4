// src/export/model.rs

use crate::models::segment::SegmentRecord;
use serde::Serialize;

/// One denormalized (segment × tag) row.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SegmentRow {
    pub filename: String,
    pub start_time: String,
    pub end_time: String,
    pub tag: String,
}

/// Fixed CSV header.
pub(crate) fn get_headers() -> [&'static str; 4] {
    ["filename", "start_time", "end_time", "tag"]
}

/// Seconds rendered with millisecond precision.
pub(crate) fn format_seconds(secs: f64) -> String {
    format!("{secs:.3}")
}

/// Flatten records: a segment with N tags yields N rows.
pub fn rows_from_records(records: &[SegmentRecord]) -> Vec<SegmentRow> {
    let mut rows = Vec::new();
    for record in records {
        for seg in &record.segments {
            for tag in &seg.tags {
                rows.push(SegmentRow {
                    filename: record.file_id.clone(),
                    start_time: format_seconds(seg.start_seconds),
                    end_time: format_seconds(seg.end_seconds),
                    tag: tag.clone(),
                });
            }
        }
    }
    rows
}
