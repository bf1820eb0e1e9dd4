use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current sidecar schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// A labelled interval `[start, end]` in recording-elapsed seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    #[serde(rename = "startTime")]
    pub start_seconds: f64,
    #[serde(rename = "endTime")]
    pub end_seconds: f64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Local>,
}

impl Segment {
    /// Create a segment with a fresh id.
    ///
    /// - `end` is raised to `start` if smaller
    /// - duplicate tags are dropped, first occurrence wins
    pub fn new<I, S>(start: f64, end: f64, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_id(Uuid::new_v4().to_string(), start, end, tags, Local::now())
    }

    pub fn with_id<I, S>(
        id: impl Into<String>,
        start: f64,
        end: f64,
        tags: I,
        created_at: DateTime<Local>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut uniq: Vec<String> = Vec::new();
        for t in tags {
            let t = t.into();
            if !uniq.contains(&t) {
                uniq.push(t);
            }
        }

        Self {
            id: id.into(),
            start_seconds: start,
            end_seconds: end.max(start),
            tags: uniq,
            created_at,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Touching endpoints do not count as overlap.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        !(self.end_seconds <= start || self.start_seconds >= end)
    }
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

/// On-disk sidecar content: all segments labelling one raw data file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    pub file_id: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl SegmentRecord {
    pub fn new(file_id: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            file_id: file_id.into(),
            version: SCHEMA_VERSION,
            segments,
        }
    }

    pub fn empty(file_id: impl Into<String>) -> Self {
        Self::new(file_id, Vec::new())
    }
}
