//! The review-gate rendezvous primitive.
//!
//! A gate opens a bounded-time human checkpoint: it publishes the pending
//! review, marks the step `review`, and blocks the pipeline task until an
//! override arrives or the wall-clock deadline passes. The control-surface
//! task submits overrides concurrently through [`ReviewGate::submit_override`].
//!
//! Overrides belong to the gate instance that is open, not to a step id:
//! submitting against a step with no open window is refused instead of being
//! cached for a window that may open later, so a stale submission can never
//! leak into a future window.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::sync::{Mutex, Notify, RwLock};
use ugc_protocol::{Event, ReviewPayload, StepId};

use crate::error::{OverrideError, PipelineError, PipelineResult};
use crate::state::run::{log_to_run, RunState};
use crate::state::PendingReview;

/// What a resolved gate hands back to the engine.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub payload: ReviewPayload,
    /// True when a human override replaced the original payload.
    pub overridden: bool,
}

/// The open window's override slot. Present exactly while a gate blocks.
#[derive(Debug)]
struct OpenGate {
    step: StepId,
    override_payload: Option<ReviewPayload>,
}

/// Suspend/resume primitive for human-review checkpoints.
///
/// One instance is shared across all gates of an engine; the fixed,
/// non-parallel step order means at most one window is ever open, and
/// [`ReviewGate::open`] enforces that with an explicit guard.
pub struct ReviewGate {
    state: Arc<RwLock<RunState>>,
    events_tx: Sender<Event>,
    notify: Notify,
    slot: Mutex<Option<OpenGate>>,
}

impl ReviewGate {
    pub fn new(state: Arc<RwLock<RunState>>, events_tx: Sender<Event>) -> Self {
        Self {
            state,
            events_tx,
            notify: Notify::new(),
            slot: Mutex::new(None),
        }
    }

    /// Open a review window for `step` and block until it resolves.
    ///
    /// Resolution is deterministic: either an override arrives through
    /// [`ReviewGate::submit_override`] (the override payload is returned),
    /// or the deadline passes (the original payload is returned unchanged).
    /// Both paths clear the pending review and mark the step `done`; a
    /// timeout is never an error.
    pub async fn open(
        &self,
        step: StepId,
        payload: ReviewPayload,
        timeout: Duration,
        now: DateTime<Utc>,
    ) -> PipelineResult<GateOutcome> {
        {
            let mut slot = self.slot.lock().await;
            if let Some(open) = slot.as_ref() {
                return Err(PipelineError::GateAlreadyOpen(open.step));
            }
            *slot = Some(OpenGate {
                step,
                override_payload: None,
            });
        }

        let deadline = ChronoDuration::from_std(timeout)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        {
            let mut run = self.state.write().await;
            run.pending_review = Some(PendingReview { step, deadline });
            run.registry.mark_review(step, now)?;
            log_to_run(
                &mut run,
                &self.events_tx,
                format!(
                    "WAITING FOR HUMAN REVIEW: {step} (timeout: {}s)",
                    timeout.as_secs()
                ),
            )
            .await;
        }

        let _ = self
            .events_tx
            .send(Event::ReviewWindowOpen {
                step,
                data: payload.clone(),
                timeout_s: timeout.as_secs(),
                start_ts: now,
            })
            .await;

        let override_payload = self.wait_for_override(timeout).await;

        let ended_at = Utc::now();
        {
            let mut slot = self.slot.lock().await;
            *slot = None;
        }
        {
            let mut run = self.state.write().await;
            run.pending_review = None;
            run.registry.mark_done(step, ended_at)?;
        }

        match override_payload {
            Some(replacement) => {
                let mut run = self.state.write().await;
                log_to_run(
                    &mut run,
                    &self.events_tx,
                    format!("Human review received for {step}"),
                )
                .await;
                Ok(GateOutcome {
                    payload: replacement,
                    overridden: true,
                })
            }
            None => {
                let _ = self
                    .events_tx
                    .send(Event::ReviewWindowTimeout { step })
                    .await;
                let mut run = self.state.write().await;
                log_to_run(
                    &mut run,
                    &self.events_tx,
                    format!("Review window timeout for {step}. Auto-continuing with original data."),
                )
                .await;
                Ok(GateOutcome {
                    payload,
                    overridden: false,
                })
            }
        }
    }

    /// Block until an override lands in the slot or the deadline passes.
    ///
    /// Re-arms on spurious wakeups (a stale permit from a just-closed gate)
    /// and honors an override that lands in the same instant the timer
    /// fires, so resolution is deterministic either way.
    async fn wait_for_override(&self, timeout: Duration) -> Option<ReviewPayload> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.notify.notified();
            if let Some(payload) = self.take_override().await {
                return Some(payload);
            }
            match tokio::time::timeout_at(deadline, notified).await {
                Ok(()) => {
                    if let Some(payload) = self.take_override().await {
                        return Some(payload);
                    }
                    // stale permit; keep waiting
                }
                Err(_) => return self.take_override().await,
            }
        }
    }

    async fn take_override(&self) -> Option<ReviewPayload> {
        let mut slot = self.slot.lock().await;
        slot.as_mut().and_then(|open| open.override_payload.take())
    }

    /// Accept a human override for the currently open review window.
    ///
    /// Rejected when no window is open for `step` or when the payload kind
    /// does not match what that window carries. On success the override is
    /// recorded on the run, the `override_received` event fires, and the
    /// blocked gate wakes.
    pub async fn submit_override(
        &self,
        step: StepId,
        payload: ReviewPayload,
    ) -> Result<(), OverrideError> {
        if !payload.matches_step(step) {
            return Err(OverrideError::PayloadMismatch(step));
        }

        {
            let mut slot = self.slot.lock().await;
            match slot.as_mut() {
                Some(open) if open.step == step => {
                    open.override_payload = Some(payload.clone());
                }
                _ => return Err(OverrideError::NoOpenReview(step)),
            }
        }

        {
            let mut run = self.state.write().await;
            run.overrides.insert(step, payload);
        }
        let _ = self.events_tx.send(Event::OverrideReceived { step }).await;
        self.notify.notify_one();
        Ok(())
    }
}
