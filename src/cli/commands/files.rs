use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::file_descriptor::FileDescriptor;
use crate::sync::enumerator::{DirectoryEnumerator, RawFileEnumerator};
use crate::sync::link::{ManifestLink, RemoteLink};
use crate::sync::reconciler::FileSyncReconciler;
use crate::ui::messages::{header, info, warning};
use crate::utils::formatting::human_size;
use crate::utils::path::expand_tilde;
use crate::utils::table::{Column, Table};
use chrono::Local;

pub(crate) fn open_link(manifest: Option<&String>) -> AppResult<ManifestLink> {
    match manifest {
        Some(m) => ManifestLink::load(&expand_tilde(m)),
        None => Ok(ManifestLink::offline()),
    }
}

fn render(files: &[FileDescriptor], separator: &str) -> String {
    let mut table = Table::new(vec![
        Column::new("STATE", 14),
        Column::new("NAME", 24),
        Column::new("SIZE", 10),
        Column::new("CREATED", 19),
        Column::new("DEVICE", 10),
    ])
    .with_separator(separator);
    for f in files {
        table.add_row(vec![
            format!("{} {}", f.sync_state.icon(), f.sync_state.as_str()),
            f.name.clone(),
            human_size(f.size),
            f.creation_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "--".into()),
            f.source_device.clone(),
        ]);
    }
    table.render()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Files { manifest, request } = cmd else {
        return Ok(());
    };

    let enumerator =
        DirectoryEnumerator::new(cfg.data_path(), &cfg.raw_extensions, &cfg.source_device);
    let mut link = open_link(manifest.as_ref())?;
    let mut reconciler = FileSyncReconciler::with_timeout(cfg.transfer_timeout());

    if manifest.is_some() && !link.is_reachable() {
        warning("Device not reachable: pending list may be stale.");
    }

    for name in request {
        match reconciler.request_transfer(&mut link, name, Local::now()) {
            Ok(()) => info(format!("Requested {} from the device.", name)),
            Err(e) => warning(e),
        }
    }

    let synced = enumerator.synced_files()?;
    let files = reconciler.reconcile(&synced, &link.pending_files(), Local::now());

    if files.is_empty() {
        info("No raw files found.");
        return Ok(());
    }

    header(format!("Raw files in {}", enumerator.dir().display()));
    println!("{}", render(&files, &cfg.separator_char));
    Ok(())
}
