//! Progress snapshot derivation.
//!
//! A snapshot is a pure read over the run state: it never mutates anything
//! and is safe to derive from the control-surface task while the pipeline
//! task is mid-step or blocked inside a review gate. Readers accept a few
//! milliseconds of staleness in exchange for that simplicity.

use chrono::{DateTime, Utc};
use ugc_protocol::{PendingReviewInfo, StatusSnapshot, StepId};

use crate::state::RunState;

/// Derive a point-in-time status snapshot from the run state.
///
/// `progress_percent` counts only terminal step outcomes (`done`/`error`);
/// a step that is merely running or under review contributes nothing until
/// it settles.
pub fn snapshot(run: &RunState, now: DateTime<Utc>) -> StatusSnapshot {
    let total_steps = StepId::ALL.len();
    let progress = run.registry.terminal_count() as f64 / total_steps as f64 * 100.0;

    let elapsed = run
        .started_at
        .map(|start| (now - start).num_milliseconds() as f64 / 1000.0)
        .unwrap_or(0.0);

    let pending_review = run.pending_review.as_ref().map(|pending| {
        let remaining = (pending.deadline - now).num_milliseconds() as f64 / 1000.0;
        PendingReviewInfo {
            step: pending.step,
            timeout_remaining: round1(remaining.max(0.0)),
        }
    });

    StatusSnapshot {
        session_id: run.session_id.clone(),
        status: run.status,
        current_step: run.current_step,
        current_step_index: run.current_step.map(StepId::index).unwrap_or(0),
        total_steps,
        progress_percent: round2(progress),
        started_at: run.started_at,
        elapsed_seconds: round1(elapsed.max(0.0)),
        pending_review,
        output_path: run.session_path.clone(),
        steps: run.registry.snapshots(now),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
