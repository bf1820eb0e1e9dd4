use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::RecordingSession;
use crate::errors::AppResult;
use crate::storage::checkpoint::CheckpointStore;
use crate::storage::segment_store::SegmentStore;
use crate::sync::enumerator::DirectoryEnumerator;
use crate::ui::messages::{field, info, recording, success, warning};
use crate::utils::formatting::join_tags;
use crate::utils::time::{SystemClock, format_elapsed};
use crate::utils::table::{Column, Table};

pub(crate) fn open_session(cfg: &Config) -> RecordingSession<SystemClock> {
    RecordingSession::open(
        CheckpointStore::new(cfg.checkpoint_path()),
        SegmentStore::new(cfg.data_path()),
        SystemClock,
    )
}

/// Raw file to attach segments to: the explicit one, or the newest synced file.
fn resolve_target(cfg: &Config, file: &Option<String>, no_file: bool) -> AppResult<Option<String>> {
    if no_file {
        return Ok(None);
    }
    if let Some(f) = file {
        return Ok(Some(f.clone()));
    }

    let enumerator =
        DirectoryEnumerator::new(cfg.data_path(), &cfg.raw_extensions, &cfg.source_device);
    Ok(enumerator.newest()?.map(|f| f.name))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut session = open_session(cfg);

    match cmd {
        Commands::Start => {
            let was_recording = session.is_recording();
            let at = session.start_recording()?;
            if was_recording {
                warning("A session was already running: it has been restarted.");
            }
            recording(format!("Recording started at {}", at.format("%Y-%m-%d %H:%M:%S")));
        }

        Commands::Toggle {
            label,
            file,
            no_file,
        } => {
            let target = resolve_target(cfg, file, *no_file)?;

            match session.toggle_activity(label, target.as_deref()) {
                Ok(outcome) => {
                    success(format!(
                        "{} '{}' at {}",
                        if outcome.event.action.is_started() {
                            "Started"
                        } else {
                            "Stopped"
                        },
                        outcome.event.activity_label,
                        format_elapsed(outcome.event.elapsed_seconds)
                    ));
                    match (&target, outcome.segments_written) {
                        (Some(f), Some(n)) => info(format!("{} segment(s) saved for {}", n, f)),
                        (Some(f), None) => warning(format!("Segments for {} were not saved", f)),
                        (None, _) => {}
                    }
                }
                Err(e) if e.is_soft() => warning(e),
                Err(e) => return Err(e),
            }
        }

        Commands::Stop { file, no_file } => {
            if !session.is_recording() {
                warning("No recording in progress.");
                return Ok(());
            }

            let target = resolve_target(cfg, file, *no_file)?;
            let elapsed = session.elapsed_seconds();
            let open = session.active_labels().len();
            let outcome = session.stop_recording(target.as_deref())?;

            success(format!(
                "Recording stopped after {} ({} event(s), {} activity(ies) auto-closed)",
                format_elapsed(elapsed),
                outcome.events.len(),
                open
            ));
            match (&target, outcome.segments_written) {
                (Some(f), Some(n)) => info(format!("{} segment(s) saved for {}", n, f)),
                (Some(f), None) => warning(format!("Final segments for {} were not saved", f)),
                (None, _) => {}
            }
        }

        Commands::Status => {
            if !session.is_recording() {
                info("Idle: no recording in progress.");
                return Ok(());
            }

            let state = session.state();
            recording("Recording");
            if let Some(start) = state.start_time {
                field("started", start.format("%Y-%m-%d %H:%M:%S"));
            }
            field("elapsed", format_elapsed(session.elapsed_seconds()));
            let active: Vec<String> = state.active_labels.iter().cloned().collect();
            field(
                "active",
                if active.is_empty() {
                    "-".to_string()
                } else {
                    join_tags(&active)
                },
            );
            field("events", state.events.len());

            if !state.events.is_empty() {
                let mut table = Table::new(vec![
                    Column::new("ELAPSED", 12),
                    Column::new("ACTION", 8),
                    Column::new("LABEL", 12),
                ])
                .with_separator(&cfg.separator_char);
                for ev in &state.events {
                    table.add_row(vec![
                        format_elapsed(ev.elapsed_seconds),
                        ev.action.as_str().to_string(),
                        ev.activity_label.clone(),
                    ]);
                }
                println!("\n{}", table.render());
            }
        }

        _ => {}
    }

    Ok(())
}
