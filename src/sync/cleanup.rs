//! Bulk deletion of local raw files and their sidecars.

use crate::errors::AppError;
use crate::storage::segment_store::SegmentStore;
use crate::sync::enumerator::DirectoryEnumerator;
use std::fs;
use std::path::{Component, Path};

/// Outcome of a bulk delete; failures never abort the loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub requested: usize,
    pub deleted: usize,
    pub failures: Vec<(String, String)>,
}

impl CleanupReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A bare file name (no directories, no `..`) naming a raw file.
fn is_deletable(raw_files: &DirectoryEnumerator, name: &str) -> bool {
    let mut components = Path::new(name).components();
    let bare = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    bare && raw_files.is_raw_file(Path::new(name)) && raw_files.dir().join(name).is_file()
}

/// Delete each named raw file of `raw_files.dir()` together with its sidecar.
///
/// Names that are not raw files of that directory are refused and reported.
/// An item counts as deleted when its raw file is gone; a missing sidecar
/// is fine, a sidecar that cannot be removed is reported as a failure.
pub fn delete_raw_files(raw_files: &DirectoryEnumerator, names: &[String]) -> CleanupReport {
    let dir = raw_files.dir();
    let store = SegmentStore::new(dir);
    let mut report = CleanupReport {
        requested: names.len(),
        ..Default::default()
    };

    for name in names {
        if !is_deletable(raw_files, name) {
            log::warn!("refusing to delete {name}: not a raw file in {}", dir.display());
            report
                .failures
                .push((name.clone(), format!("not a raw file in {}", dir.display())));
            continue;
        }

        if let Err(e) = fs::remove_file(dir.join(name)) {
            log::warn!("failed to delete {name}: {e}");
            report.failures.push((name.clone(), e.to_string()));
            continue;
        }
        report.deleted += 1;

        match store.delete_all(name) {
            Ok(_) => {}
            // Same-stem sibling owns the sidecar
            Err(AppError::SidecarConflict { owner, .. }) => {
                log::info!("kept sidecar of {owner} while deleting {name}");
            }
            Err(e) => {
                log::warn!("deleted {name} but not its sidecar: {e}");
                report
                    .failures
                    .push((name.clone(), format!("sidecar: {e}")));
            }
        }
    }

    report
}
