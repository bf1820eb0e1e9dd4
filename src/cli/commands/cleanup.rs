use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::sync::cleanup::delete_raw_files;
use crate::sync::enumerator::{DirectoryEnumerator, RawFileEnumerator};
use crate::ui::messages::{error, info, success, warning};
use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Cleanup { files, all, yes } = cmd else {
        return Ok(());
    };

    let raw_files =
        DirectoryEnumerator::new(cfg.data_path(), &cfg.raw_extensions, &cfg.source_device);

    let names: Vec<String> = if *all {
        raw_files
            .synced_files()?
            .into_iter()
            .map(|f| f.name)
            .collect()
    } else {
        files.clone()
    };

    if names.is_empty() {
        info("Nothing to delete.");
        return Ok(());
    }

    let prompt = format!(
        "Delete {} raw file(s) and their segments? This action is irreversible.",
        names.len()
    );
    if !*yes && !ask_confirmation(&prompt) {
        info("Cleanup cancelled.");
        return Ok(());
    }

    let report = delete_raw_files(&raw_files, &names);

    for (name, reason) in &report.failures {
        error(format!("{}: {}", name, reason));
    }
    if report.all_succeeded() {
        success(format!("Deleted {} of {} file(s).", report.deleted, report.requested));
    } else {
        warning(format!(
            "Deleted {} of {} file(s), {} problem(s).",
            report.deleted,
            report.requested,
            report.failures.len()
        ));
    }

    Ok(())
}
