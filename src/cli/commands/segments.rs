use crate::cli::parser::{Commands, SegmentAction};
use crate::config::Config;
use crate::core::calculator::segments::seconds_per_tag;
use crate::errors::{AppError, AppResult};
use crate::models::segment::Segment;
use crate::storage::segment_store::SegmentStore;
use crate::ui::messages::{field, header, info, success, warning};
use crate::utils::formatting::join_tags;
use crate::utils::table::{Column, Table};
use crate::utils::time::{format_elapsed, parse_seconds, parse_seconds_range};
use chrono::Local;

fn print_segments(segments: &[Segment], separator: &str) {
    let mut table = Table::new(vec![
        Column::new("ID", 36),
        Column::new("START", 12),
        Column::new("END", 12),
        Column::new("TAGS", 16),
    ])
    .with_separator(separator);
    for s in segments {
        table.add_row(vec![
            s.id.clone(),
            format_elapsed(s.start_seconds),
            format_elapsed(s.end_seconds),
            join_tags(&s.tags),
        ]);
    }
    println!("{}", table.render());
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn report_sidecar_problem(store: &SegmentStore, file: &str) {
    if let Err(e) = store.try_load(file)
        && !e.is_absent()
    {
        warning(e);
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Segments { action } = cmd else {
        return Ok(());
    };

    let store = SegmentStore::new(cfg.data_path());

    match action {
        SegmentAction::List {
            file,
            tag,
            range,
            totals,
        } => {
            report_sidecar_problem(&store, file);

            let mut segments = match tag {
                Some(t) => store.query_by_tag(file, t),
                None => store.load(file),
            };
            if let Some(r) = range {
                let (start, end) = parse_seconds_range(r)?;
                segments.retain(|s| s.overlaps(start, end));
            }

            if segments.is_empty() {
                info(format!("No segments for {}.", file));
                return Ok(());
            }

            header(format!("Segments for {}", file));
            print_segments(&segments, &cfg.separator_char);

            if *totals {
                for (tag, secs) in seconds_per_tag(&segments) {
                    field(tag, format_elapsed(secs));
                }
            }
        }

        SegmentAction::Add {
            file,
            start,
            end,
            tags,
        } => {
            let start = parse_seconds(start)?;
            let end = parse_seconds(end)?;
            if end < start {
                return Err(AppError::InvalidRange(format!(
                    "end {end} is before start {start}"
                )));
            }

            let segment = Segment::new(start, end, clean_tags(tags));
            let id = segment.id.clone();
            store.add(file, segment)?;
            success(format!("Added segment {} to {}.", id, file));
        }

        SegmentAction::Update {
            file,
            id,
            start,
            end,
            tags,
        } => {
            let Some(current) = store.load(file).into_iter().find(|s| &s.id == id) else {
                return Err(AppError::SegmentNotFound(id.clone()));
            };

            let new_start = match start {
                Some(s) => parse_seconds(s)?,
                None => current.start_seconds,
            };
            let new_end = match end {
                Some(e) => parse_seconds(e)?,
                None => current.end_seconds,
            };
            if new_end < new_start {
                return Err(AppError::InvalidRange(format!(
                    "end {new_end} is before start {new_start}"
                )));
            }
            let new_tags: Vec<String> = if tags.is_empty() {
                current.tags.clone()
            } else {
                clean_tags(tags)
            };

            let updated = Segment::with_id(
                current.id.clone(),
                new_start,
                new_end,
                new_tags,
                Local::now(),
            );
            if store.update(file, updated)? {
                success(format!("Updated segment {}.", id));
            } else {
                return Err(AppError::SegmentNotFound(id.clone()));
            }
        }

        SegmentAction::Delete { file, id } => {
            if store.delete(file, id)? {
                success(format!("Deleted segment {} from {}.", id, file));
            } else {
                warning(format!("No segment {} in {}.", id, file));
            }
        }

        SegmentAction::Clear { file } => {
            if store.delete_all(file)? {
                success(format!("Removed all segments of {}.", file));
            } else {
                info(format!("{} had no segments.", file));
            }
        }
    }

    Ok(())
}
