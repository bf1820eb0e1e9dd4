//! Recording session state machine.
//!
//! Two states: Idle (no checkpoint) and Active (recording). Every mutation
//! is written through to the checkpoint before segments are re-derived and
//! pushed to the segment store, so a killed process resumes where it left off.

use crate::core::calculator::segments::derive_segments;
use crate::errors::{AppError, AppResult};
use crate::models::activity_event::ActivityEvent;
use crate::models::event_action::EventAction;
use crate::models::segment::Segment;
use crate::models::session_state::RecordingSessionState;
use crate::storage::checkpoint::CheckpointStore;
use crate::storage::segment_store::SegmentStore;
use crate::utils::time::{Clock, SystemClock, elapsed_seconds};
use chrono::{DateTime, Local};
use std::collections::BTreeSet;

/// Result of a successful toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub event: ActivityEvent,
    /// Number of segments written for the current file, `None` when no file
    /// was given or the write failed.
    pub segments_written: Option<usize>,
}

/// Result of stopping a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct StopOutcome {
    /// Full event log, auto-closed labels included. Empty when stopped while idle.
    pub events: Vec<ActivityEvent>,
    /// Number of final segments written, `None` when no file was given or
    /// the write failed.
    pub segments_written: Option<usize>,
}

pub struct RecordingSession<C: Clock = SystemClock> {
    state: RecordingSessionState,
    checkpoint: CheckpointStore,
    store: SegmentStore,
    clock: C,
}

impl<C: Clock> RecordingSession<C> {
    /// Build a session, resuming from the checkpoint when one exists.
    pub fn open(checkpoint: CheckpointStore, store: SegmentStore, clock: C) -> Self {
        let state = match checkpoint.load() {
            Ok(Some(mut state)) => {
                if state.repair_active_labels() {
                    log::warn!(
                        "checkpoint {} had inconsistent active labels, recomputed",
                        checkpoint.path().display()
                    );
                }
                log::info!(
                    "resumed session with {} event(s) from {}",
                    state.events.len(),
                    checkpoint.path().display()
                );
                state
            }
            Ok(None) => RecordingSessionState::default(),
            Err(e) => {
                log::warn!(
                    "ignoring unreadable checkpoint {}: {e}",
                    checkpoint.path().display()
                );
                RecordingSessionState::default()
            }
        };

        Self {
            state,
            checkpoint,
            store,
            clock,
        }
    }

    pub fn state(&self) -> &RecordingSessionState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording
    }

    pub fn active_labels(&self) -> &BTreeSet<String> {
        &self.state.active_labels
    }

    pub fn events(&self) -> &[ActivityEvent] {
        &self.state.events
    }

    /// Seconds since the recording started; 0 when idle.
    pub fn elapsed_seconds(&self) -> f64 {
        match self.state.start_time {
            Some(start) if self.state.is_recording => elapsed_seconds(start, self.clock.now()),
            _ => 0.0,
        }
    }

    /// Idle → Active. Calling it while Active re-arms the session from scratch.
    pub fn start_recording(&mut self) -> AppResult<DateTime<Local>> {
        if self.state.is_recording {
            log::info!(
                "start requested while recording; discarding {} event(s)",
                self.state.events.len()
            );
        }

        let now = self.clock.now();
        let next = RecordingSessionState::started_at(now);
        self.checkpoint.save(&next)?;
        self.state = next;

        Ok(now)
    }

    /// Flip `label` between started and stopped.
    ///
    /// Fails with [`AppError::NotRecording`] while idle, leaving all state
    /// untouched. When `current_file_id` is given, the full derived segment
    /// set is saved for that raw file after the checkpoint is written.
    pub fn toggle_activity(
        &mut self,
        label: &str,
        current_file_id: Option<&str>,
    ) -> AppResult<ToggleOutcome> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AppError::InvalidLabel(label.to_string()));
        }
        if !self.state.is_recording {
            return Err(AppError::NotRecording(label.to_string()));
        }

        let now = self.clock.now();
        let elapsed = self.elapsed_at(now);

        let mut next = self.state.clone();
        let event = if next.active_labels.remove(label) {
            ActivityEvent::stopped(label, elapsed, now)
        } else {
            next.active_labels.insert(label.to_string());
            ActivityEvent::started(label, elapsed, now)
        };
        next.events.push(event.clone());

        self.checkpoint.save(&next)?;
        self.state = next;

        log::debug!(
            "{} '{}' at {:.3}s",
            event.action.as_str(),
            event.activity_label,
            event.elapsed_seconds
        );

        let segments_written =
            current_file_id.and_then(|file_id| self.persist_segments(file_id, elapsed));

        Ok(ToggleOutcome {
            event,
            segments_written,
        })
    }

    /// Active → Idle.
    ///
    /// Labels still open get a synthesized `Stopped` at the current elapsed
    /// time, the final segment set is saved for `current_file_id` (if any),
    /// and the checkpoint is deleted.
    pub fn stop_recording(&mut self, current_file_id: Option<&str>) -> AppResult<StopOutcome> {
        if !self.state.is_recording {
            self.checkpoint.clear()?;
            return Ok(StopOutcome {
                events: Vec::new(),
                segments_written: None,
            });
        }

        let now = self.clock.now();
        let elapsed = self.elapsed_at(now);

        let open: Vec<String> = self.state.active_labels.iter().cloned().collect();
        for label in open {
            self.state
                .events
                .push(ActivityEvent::new(label, EventAction::Stopped, elapsed, now));
        }
        self.state.active_labels.clear();

        let segments_written =
            current_file_id.and_then(|file_id| self.persist_segments(file_id, elapsed));

        self.checkpoint.clear()?;
        let finished = std::mem::take(&mut self.state);

        Ok(StopOutcome {
            events: finished.events,
            segments_written,
        })
    }

    /// Segments for the current log, open labels closing at `total_duration_seconds`.
    pub fn derive_segments(&self, total_duration_seconds: f64) -> Vec<Segment> {
        derive_segments(&self.state.events, total_duration_seconds)
    }

    fn elapsed_at(&self, now: DateTime<Local>) -> f64 {
        self.state
            .start_time
            .map(|start| elapsed_seconds(start, now))
            .unwrap_or(0.0)
    }

    fn persist_segments(&self, file_id: &str, total: f64) -> Option<usize> {
        let segments = self.derive_segments(total);
        match self.store.save(file_id, &segments) {
            Ok(()) => Some(segments.len()),
            Err(e) => {
                log::warn!("failed to save segments for {file_id}: {e}");
                None
            }
        }
    }
}
