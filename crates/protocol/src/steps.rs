//! The fixed pipeline step sequence and per-step lifecycle state.
//!
//! The step list is the only compile-time-known topology of the pipeline:
//! fourteen named steps executed strictly in order, three of which are
//! review gates that block for a human decision instead of invoking a
//! collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one named unit of the fixed pipeline sequence.
///
/// The declaration order is the execution order; [`StepId::ALL`] exposes it
/// as a slice. Serialized under stable snake_case wire names
/// (e.g. `"review_research"`, `"avatar_clips"`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Research,
    ReviewResearch,
    Ideation,
    Scripting,
    ReviewScript,
    QaLoop,
    ReviewQa,
    Voiceover,
    AvatarClips,
    Images,
    Assembly,
    QaVideo,
    Metadata,
    Finalize,
}

impl StepId {
    /// The canonical execution order of the pipeline.
    pub const ALL: [StepId; 14] = [
        StepId::Research,
        StepId::ReviewResearch,
        StepId::Ideation,
        StepId::Scripting,
        StepId::ReviewScript,
        StepId::QaLoop,
        StepId::ReviewQa,
        StepId::Voiceover,
        StepId::AvatarClips,
        StepId::Images,
        StepId::Assembly,
        StepId::QaVideo,
        StepId::Metadata,
        StepId::Finalize,
    ];

    /// The snake_case wire name of this step.
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Research => "research",
            StepId::ReviewResearch => "review_research",
            StepId::Ideation => "ideation",
            StepId::Scripting => "scripting",
            StepId::ReviewScript => "review_script",
            StepId::QaLoop => "qa_loop",
            StepId::ReviewQa => "review_qa",
            StepId::Voiceover => "voiceover",
            StepId::AvatarClips => "avatar_clips",
            StepId::Images => "images",
            StepId::Assembly => "assembly",
            StepId::QaVideo => "qa_video",
            StepId::Metadata => "metadata",
            StepId::Finalize => "finalize",
        }
    }

    /// Zero-based position of this step in the canonical order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this step blocks for a human decision instead of calling an
    /// automated collaborator.
    pub fn is_review_gate(self) -> bool {
        matches!(
            self,
            StepId::ReviewResearch | StepId::ReviewScript | StepId::ReviewQa
        )
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a single step.
///
/// Per step the transitions are:
/// `Pending -> Running -> {Done | Error}` for collaborator steps and
/// `Pending -> Review -> Done` for review gates. A gate timeout is not a
/// failure; a review step never ends in `Error`. Steps re-entered by the
/// refinement loop revisit `Running` from `Done`/`Error`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step has not started yet.
    Pending,

    /// A collaborator call is in flight for this step.
    Running,

    /// A review window is open for this step.
    Review,

    /// Step finished successfully (including review timeouts).
    Done,

    /// The collaborator call failed. Terminal for the step; the run stops.
    Error,
}

/// Immutable point-in-time view of one step's state.
///
/// While a step is `Running` or `Review`, `duration_s` is computed live
/// against the snapshot time; once the step is terminal it is the stored
/// `ended_at - started_at` value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StepSnapshot {
    pub step: StepId,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<f64>,
}
