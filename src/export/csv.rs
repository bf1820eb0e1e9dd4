use crate::errors::{AppError, AppResult};
use crate::export::model::{get_headers, rows_from_records};
use crate::models::segment::SegmentRecord;
use csv::Writer;

/// Render records as CSV text: header `filename,start_time,end_time,tag`,
/// then one row per (segment, tag) pair.
pub fn segments_to_csv(records: &[SegmentRecord]) -> AppResult<String> {
    let mut wtr = Writer::from_writer(Vec::new());

    wtr.write_record(get_headers())?;

    for row in rows_from_records(records) {
        wtr.write_record([&row.filename, &row.start_time, &row.end_time, &row.tag])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))?;

    String::from_utf8(bytes).map_err(|e| AppError::Export(format!("CSV encoding error: {e}")))
}
