//! The single active run's state and its transition helpers.
//!
//! One `RunState` exists per engine instance and is reused across runs: a new
//! run resets the mutable fields in place rather than allocating a new state.
//! The transition helpers mutate state and emit the matching observer event
//! in one place so the two never drift apart.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::mpsc::Sender;
use ugc_protocol::{Event, PipelineStatus, ReviewPayload, StepId, StepOutput};

use crate::state::registry::StepRegistry;

/// Review-window bookkeeping, present only while a gate is open.
#[derive(Debug, Clone)]
pub struct PendingReview {
    pub step: StepId,
    pub deadline: DateTime<Utc>,
}

/// Mutable state of the engine's single run.
#[derive(Debug)]
pub struct RunState {
    /// Creation-time identifier of the current run.
    pub session_id: Option<String>,

    /// Run-scoped storage directory, owned by the run for its lifetime.
    pub session_path: Option<PathBuf>,

    pub status: PipelineStatus,

    /// Id of the step most recently entered.
    pub current_step: Option<StepId>,

    pub started_at: Option<DateTime<Utc>>,

    /// Step results, keyed by step id. Append-only within a run.
    pub results: HashMap<StepId, StepOutput>,

    /// Overrides accepted by review gates, written only by the override
    /// entry point.
    pub overrides: HashMap<StepId, ReviewPayload>,

    /// Non-null exactly while a review gate is open.
    pub pending_review: Option<PendingReview>,

    pub registry: StepRegistry,

    /// Accumulated log lines for this run.
    pub logs: Vec<String>,
}

impl RunState {
    /// Create an idle state with every step pending.
    pub fn new() -> Self {
        Self {
            session_id: None,
            session_path: None,
            status: PipelineStatus::Idle,
            current_step: None,
            started_at: None,
            results: HashMap::new(),
            overrides: HashMap::new(),
            pending_review: None,
            registry: StepRegistry::new(),
            logs: Vec::new(),
        }
    }

    /// Reset the mutable fields for a fresh run and mark it running.
    pub fn reset_for(&mut self, session_id: String, session_path: PathBuf, now: DateTime<Utc>) {
        self.session_id = Some(session_id);
        self.session_path = Some(session_path);
        self.status = PipelineStatus::Running;
        self.current_step = None;
        self.started_at = Some(now);
        self.results.clear();
        self.overrides.clear();
        self.pending_review = None;
        self.registry.reset();
        self.logs.clear();
    }

    /// The session id, or empty if no run has started. Event payloads use
    /// this form.
    pub fn session_id_or_empty(&self) -> String {
        self.session_id.clone().unwrap_or_default()
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Append a log line to the run and emit it as an event.
pub async fn log_to_run(run: &mut RunState, events_tx: &Sender<Event>, message: String) {
    run.logs.push(message.clone());
    let _ = events_tx.send(Event::Log { message }).await;
}

/// Mark the run completed and emit the completion event.
pub async fn complete_run(run: &mut RunState, events_tx: &Sender<Event>) {
    run.status = PipelineStatus::Completed;
    let _ = events_tx
        .send(Event::PipelineCompleted {
            session_id: run.session_id_or_empty(),
        })
        .await;
}

/// Mark the run failed and emit the failure event.
pub async fn fail_run(run: &mut RunState, events_tx: &Sender<Event>, error: String) {
    run.status = PipelineStatus::Failed;
    let _ = events_tx
        .send(Event::PipelineFailed {
            session_id: run.session_id_or_empty(),
            error,
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_new_state_is_idle() {
        let run = RunState::new();
        assert_eq!(run.status, PipelineStatus::Idle);
        assert!(run.session_id.is_none());
        assert!(run.results.is_empty());
        assert!(run.pending_review.is_none());
    }

    #[test]
    fn test_reset_for_clears_previous_run() {
        let mut run = RunState::new();
        let now = Utc::now();
        run.reset_for("first".to_string(), PathBuf::from("/tmp/first"), now);
        run.logs.push("old line".to_string());
        run.registry.mark_running(StepId::Research, now).unwrap();
        run.registry.mark_done(StepId::Research, now).unwrap();

        run.reset_for("second".to_string(), PathBuf::from("/tmp/second"), now);
        assert_eq!(run.session_id.as_deref(), Some("second"));
        assert_eq!(run.status, PipelineStatus::Running);
        assert!(run.logs.is_empty());
        assert_eq!(run.registry.terminal_count(), 0);
    }

    #[tokio::test]
    async fn test_log_to_run_appends_and_emits() {
        let mut run = RunState::new();
        let (tx, mut rx) = mpsc::channel(10);

        log_to_run(&mut run, &tx, "hello".to_string()).await;

        assert_eq!(run.logs, vec!["hello".to_string()]);
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::Log { message } if message == "hello"));
    }

    #[tokio::test]
    async fn test_fail_run_emits_error() {
        let mut run = RunState::new();
        run.session_id = Some("s1".to_string());
        let (tx, mut rx) = mpsc::channel(10);

        fail_run(&mut run, &tx, "boom".to_string()).await;

        assert_eq!(run.status, PipelineStatus::Failed);
        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            Event::PipelineFailed { session_id, error } if session_id == "s1" && error == "boom"
        ));
    }
}
