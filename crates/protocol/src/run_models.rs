//! Pipeline-level run status and the point-in-time status snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::steps::{StepId, StepSnapshot};

/// Lifecycle status of the pipeline as a whole.
///
/// Exactly one run may be active per engine instance; requesting a new run
/// while `Running` is rejected rather than queued. `Paused` is entered only
/// through an explicit cancel and takes effect between steps.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// No run has been started since the engine was created.
    Idle,

    /// A run is actively executing steps (review windows included).
    Running,

    /// Cancelled by the operator; the in-flight step finishes first.
    Paused,

    /// The last run finished all steps and wrote its manifest.
    Completed,

    /// The last run stopped on a step error.
    Failed,
}

/// Review-window information included in a status snapshot while a gate is
/// open.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PendingReviewInfo {
    pub step: StepId,
    /// Seconds until the window auto-continues; clamped at zero.
    pub timeout_remaining: f64,
}

/// Point-in-time view of a run, derived without mutating any state.
///
/// `progress_percent` counts only steps in a terminal state (`done` or
/// `error`); running and review steps contribute nothing until they settle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub status: PipelineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<StepId>,
    pub current_step_index: usize,
    pub total_steps: usize,
    pub progress_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_review: Option<PendingReviewInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Per-step snapshots in canonical step order.
    pub steps: Vec<StepSnapshot>,
}
