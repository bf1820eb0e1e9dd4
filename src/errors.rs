//! Unified application error type.
//! All modules (core, storage, sync, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Session errors
    // ---------------------------
    #[error("No recording in progress: start a recording before toggling '{0}'")]
    NotRecording(String),

    #[error("Invalid activity label: {0:?}")]
    InvalidLabel(String),

    // ---------------------------
    // Segment store errors
    // ---------------------------
    #[error("Sidecar for '{file_id}' uses unsupported schema version {version}")]
    UnsupportedSchema { file_id: String, version: u32 },

    #[error("Sidecar for '{file_id}' already holds the segments of '{owner}'")]
    SidecarConflict { file_id: String, owner: String },

    #[error("Segment {0} not found")]
    SegmentNotFound(String),

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    // ---------------------------
    // Sync
    // ---------------------------
    #[error("Remote link unavailable: {0}")]
    LinkUnavailable(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// Sequencing mistakes (like toggling while idle) are reported as
    /// warnings rather than hard failures.
    pub fn is_soft(&self) -> bool {
        matches!(self, AppError::NotRecording(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
