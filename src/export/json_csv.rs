// src/export/json_csv.rs

use crate::errors::AppResult;
use crate::export::notify_export_success;
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write already-rendered JSON to `path`.
pub(crate) fn export_json(json: &str, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Write already-rendered CSV to `path`.
pub(crate) fn export_csv(csv_text: &str, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut file = File::create(path)?;
    file.write_all(csv_text.as_bytes())?;
    file.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
