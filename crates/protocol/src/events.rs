//! Events emitted by the control core to observers.
//!
//! The core emits these over an async channel while a run is in flight; any
//! UI or transport layer consumes them. Emission is fire-and-forget: a full
//! or dropped channel never affects pipeline execution.
//!
//! Uses tagged enum serialization so the wire format is self-describing:
//! ```json
//! {
//!   "type": "stepStart",
//!   "payload": {
//!     "step": "research",
//!     "session_id": "2026-08-30-101500",
//!     "start_ts": "2026-08-30T10:15:00Z"
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ReviewPayload;
use crate::steps::StepId;

/// Status updates sent from the core to observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A new run has started and its session storage exists.
    PipelineStarted { session_id: String },

    /// A step has entered the `running` state.
    StepStart {
        step: StepId,
        session_id: String,
        start_ts: DateTime<Utc>,
    },

    /// A step finished successfully.
    ///
    /// `result_summary` is a truncated JSON rendering of the stored result.
    StepComplete {
        step: StepId,
        result_summary: String,
        duration_s: f64,
        end_ts: DateTime<Utc>,
    },

    /// A step's collaborator call failed; the run stops here.
    StepError { step: StepId, error: String },

    /// A review window opened and is blocking the run.
    ReviewWindowOpen {
        step: StepId,
        data: ReviewPayload,
        timeout_s: u64,
        start_ts: DateTime<Utc>,
    },

    /// A human override was accepted for the open review window.
    OverrideReceived { step: StepId },

    /// The review window elapsed with no override; the run continues with
    /// the original payload.
    ReviewWindowTimeout { step: StepId },

    /// One review round of the refinement loop finished.
    QaRound {
        iteration: u32,
        score: f64,
        approved: bool,
    },

    /// The run completed all steps and wrote its manifest.
    PipelineCompleted { session_id: String },

    /// The run stopped on a failure.
    PipelineFailed { session_id: String, error: String },

    /// A log line was appended to the run's log.
    Log { message: String },
}
