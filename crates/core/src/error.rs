//! Error taxonomy for the pipeline control core.
//!
//! Review-gate timeouts are deliberately absent: a window that elapses is a
//! designed outcome that continues the run with the original payload, never
//! an error.

use thiserror::Error;
use ugc_protocol::StepId;

/// Errors surfaced by the pipeline engine and its components.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A new run was requested while one is active. Non-fatal to the
    /// existing run.
    #[error("a pipeline run is already in progress")]
    Busy,

    /// A collaborator call failed. Fatal to the run: the step sequence
    /// stops immediately and no later step is attempted.
    #[error("step {step} failed: {source}")]
    StepFailed {
        step: StepId,
        #[source]
        source: anyhow::Error,
    },

    /// The run was cancelled between steps.
    #[error("run cancelled before step {step}")]
    Cancelled { step: StepId },

    /// A step id outside the fixed step list was used. Should not occur
    /// with the closed step enum; modeled explicitly all the same.
    #[error("unknown step id: {0}")]
    UnknownStep(String),

    /// A second review gate was opened while one is already blocking.
    /// The sequential step order makes this an internal invariant breach.
    #[error("a review gate is already open for step {0}")]
    GateAlreadyOpen(StepId),

    /// Run-scoped storage could not be created or written.
    #[error("session storage error: {0}")]
    Session(#[from] std::io::Error),

    /// Malformed configuration; fails fast at engine construction.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Type alias for Result with PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Rejections of a human-override submission.
///
/// Overrides are tied to the gate instance that is currently open, not to a
/// step id: submitting against a closed gate is refused rather than cached
/// for a later window.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverrideError {
    /// No review window is currently open for the given step.
    #[error("no review window is open for step {0}")]
    NoOpenReview(StepId),

    /// The payload kind does not match what the open window carries.
    #[error("override payload does not match the review window for step {0}")]
    PayloadMismatch(StepId),
}
