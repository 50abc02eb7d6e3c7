//! Pipeline execution engine.
//!
//! The engine executes the fixed fourteen-step sequence exactly once per
//! run, wrapping every collaborator call in state tracking and event
//! emission. Three steps are review gates; the `qa_loop` step delegates to
//! the refinement loop. A step failure stops the run immediately: there is
//! no partial continuation and no retry at this layer.
//!
//! Two execution contexts touch an engine: the pipeline-driving task blocks
//! inside [`PipelineEngine::run`] (possibly for long wall-clock periods
//! inside a gate or a slow collaborator), while the control-surface task
//! calls [`PipelineEngine::submit_override`], [`PipelineEngine::status`],
//! and [`PipelineEngine::cancel`] concurrently.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::sync::RwLock;
use ugc_protocol::{
    Event, PipelineStatus, ResearchResult, ReviewPayload, RunManifest, Script, StatusSnapshot,
    StepId, StepOutput,
};

use crate::collaborators::Collaborators;
use crate::config::PipelineConfig;
use crate::error::{OverrideError, PipelineError, PipelineResult};
use crate::gate::ReviewGate;
use crate::refine::RefinementLoop;
use crate::report;
use crate::session;
use crate::state::run::{complete_run, fail_run, log_to_run};
use crate::state::RunState;

/// Caller-supplied parameters for one run.
#[derive(Debug, Clone, Default)]
pub struct RunParams {
    /// Optional topic hint recorded with the run. Research derives its own
    /// focus; the hint is logged for the operator.
    pub topic_override: Option<String>,
}

/// The pipeline execution engine.
///
/// Owns the single run state; exactly one run may be active at a time and a
/// second `run` call while one is in flight is rejected with
/// [`PipelineError::Busy`], not queued.
pub struct PipelineEngine {
    collaborators: Collaborators,
    config: PipelineConfig,
    state: Arc<RwLock<RunState>>,
    gate: Arc<ReviewGate>,
    events_tx: Sender<Event>,
}

impl PipelineEngine {
    /// Create an engine over a collaborator set.
    ///
    /// # Errors
    ///
    /// Fails fast with a configuration error when the config carries
    /// unusable values.
    pub fn new(
        collaborators: Collaborators,
        config: PipelineConfig,
        events_tx: Sender<Event>,
    ) -> PipelineResult<Self> {
        config.validate()?;
        let state = Arc::new(RwLock::new(RunState::new()));
        let gate = Arc::new(ReviewGate::new(Arc::clone(&state), events_tx.clone()));
        Ok(Self {
            collaborators,
            config,
            state,
            gate,
            events_tx,
        })
    }

    /// Execute the full step sequence and return the final manifest.
    ///
    /// Blocks the calling task until the run completes, fails, or is
    /// cancelled between steps. The engine is reusable: a completed or
    /// failed engine accepts a new run, resetting the run state in place.
    pub async fn run(&self, params: RunParams) -> PipelineResult<RunManifest> {
        let run_started = Utc::now();
        let (session_id, session_path) = {
            let mut run = self.state.write().await;
            if run.status == PipelineStatus::Running {
                return Err(PipelineError::Busy);
            }
            let (session_id, session_path) =
                session::create_session(&self.config.output_dir, run_started)?;
            run.reset_for(session_id.clone(), session_path.clone(), run_started);
            log_to_run(
                &mut run,
                &self.events_tx,
                format!("Pipeline started. Session: {session_id}"),
            )
            .await;
            if let Some(topic) = &params.topic_override {
                log_to_run(
                    &mut run,
                    &self.events_tx,
                    format!("Topic hint supplied: {topic}"),
                )
                .await;
            }
            (session_id, session_path)
        };

        let _ = self
            .events_tx
            .send(Event::PipelineStarted {
                session_id: session_id.clone(),
            })
            .await;

        match self.drive(&session_id, &session_path, run_started).await {
            Ok(manifest) => {
                let mut run = self.state.write().await;
                log_to_run(
                    &mut run,
                    &self.events_tx,
                    "Pipeline completed successfully.".to_string(),
                )
                .await;
                complete_run(&mut run, &self.events_tx).await;
                Ok(manifest)
            }
            Err(err) => {
                let mut run = self.state.write().await;
                if matches!(err, PipelineError::Cancelled { .. }) {
                    // cancel already flipped the status; just record it
                    log_to_run(&mut run, &self.events_tx, err.to_string()).await;
                } else {
                    fail_run(&mut run, &self.events_tx, err.to_string()).await;
                }
                Err(err)
            }
        }
    }

    /// The ordered step sequence. Each helper call below is one step of the
    /// fixed list; the order here is the pipeline.
    async fn drive(
        &self,
        session_id: &str,
        session_path: &Path,
        run_started: DateTime<Utc>,
    ) -> PipelineResult<RunManifest> {
        // 1. Research
        let research = self
            .execute_step(
                StepId::Research,
                || async {
                    self.collaborators
                        .researcher
                        .trending_pain_points(session_id)
                        .await
                },
                |r| StepOutput::Research(r.clone()),
            )
            .await?;

        // 2. Review research
        let research = match self
            .review_step(StepId::ReviewResearch, ReviewPayload::Research(research))
            .await?
        {
            ReviewPayload::Research(r) => r,
            other => return Err(unexpected_payload(StepId::ReviewResearch, &other)),
        };

        // 3. Ideation
        let ideation = self
            .execute_step(
                StepId::Ideation,
                || async { self.collaborators.writer.content_idea(&research).await },
                |i| StepOutput::Ideation(i.clone()),
            )
            .await?;

        // 4. Scripting
        let script = self
            .execute_step(
                StepId::Scripting,
                || async {
                    self.collaborators
                        .writer
                        .write_script(&ideation.selected_idea, session_id)
                        .await
                },
                |s| StepOutput::Script(s.clone()),
            )
            .await?;

        // 5. Review script
        let script = match self
            .review_step(StepId::ReviewScript, ReviewPayload::Script(script))
            .await?
        {
            ReviewPayload::Script(s) => s,
            other => return Err(unexpected_payload(StepId::ReviewScript, &other)),
        };

        // 6. QA loop (self-correction)
        let refinement =
            RefinementLoop::new(self.config.approval_threshold, self.config.max_qa_iterations);
        let qa = self
            .execute_step(
                StepId::QaLoop,
                || async {
                    refinement
                        .run(
                            script.clone(),
                            &research,
                            self.collaborators.qa.as_ref(),
                            self.collaborators.writer.as_ref(),
                            session_id,
                            &self.events_tx,
                        )
                        .await
                },
                |o| StepOutput::Qa(o.clone()),
            )
            .await?;

        // 7. Review QA (final script approval)
        let final_script = match self
            .review_step(
                StepId::ReviewQa,
                ReviewPayload::QaSummary {
                    script: qa.final_script.clone(),
                    qa_score: Some(qa.final_review.overall_score),
                    auto_approved: qa.auto_approved,
                },
            )
            .await?
        {
            ReviewPayload::QaSummary { script, .. } => script,
            other => return Err(unexpected_payload(StepId::ReviewQa, &other)),
        };

        // 8. Voiceover
        let audio = self
            .execute_step(
                StepId::Voiceover,
                || async {
                    self.collaborators
                        .media
                        .voiceover(&final_script.segments, session_path)
                        .await
                },
                |a| StepOutput::AudioFiles(a.clone()),
            )
            .await?;

        // 9. Avatar clips
        let clips = self
            .execute_step(
                StepId::AvatarClips,
                || async {
                    self.collaborators
                        .media
                        .avatar_clips(&final_script.segments, &audio, session_path)
                        .await
                },
                |c| StepOutput::ClipFiles(c.clone()),
            )
            .await?;

        // 10. Background images
        let images = self
            .execute_step(
                StepId::Images,
                || async {
                    self.collaborators
                        .media
                        .background_images(&final_script.segments, session_path)
                        .await
                },
                |i| StepOutput::ImageFiles(i.clone()),
            )
            .await?;

        // 11. Assembly
        let video = self
            .execute_step(
                StepId::Assembly,
                || async {
                    self.collaborators
                        .media
                        .assemble(&clips, &images, &final_script, session_path)
                        .await
                },
                |m| StepOutput::Media(m.clone()),
            )
            .await?;

        // 12. QA video (technical check)
        let _tech = self
            .execute_step(
                StepId::QaVideo,
                || async {
                    self.collaborators
                        .qa
                        .review_technical(&video.vertical_720p)
                        .await
                },
                |t| StepOutput::Technical(t.clone()),
            )
            .await?;

        // 13. Metadata
        let social = self
            .execute_step(
                StepId::Metadata,
                || async { self.collaborators.writer.social_metadata(&final_script).await },
                |s| StepOutput::Social(s.clone()),
            )
            .await?;

        // 14. Finalize: pure assembly of stored results, written once
        let manifest = self
            .execute_step(
                StepId::Finalize,
                || async {
                    let manifest = build_manifest(
                        session_id,
                        run_started,
                        &research,
                        &final_script,
                        &qa.final_review,
                        qa.iterations_taken,
                        &video,
                        &social,
                    );
                    session::write_manifest(session_path, &manifest)?;
                    Ok(manifest)
                },
                |m| StepOutput::Manifest(m.clone()),
            )
            .await?;

        Ok(manifest)
    }

    /// Uniform wrapper for every non-review step: state tracking, event
    /// emission, result storage, and failure propagation.
    async fn execute_step<T, F, Fut, G>(
        &self,
        step: StepId,
        op: F,
        to_output: G,
    ) -> PipelineResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
        G: FnOnce(&T) -> StepOutput,
    {
        self.check_cancelled(step).await?;

        let start_ts = Utc::now();
        let session_id = {
            let mut run = self.state.write().await;
            run.current_step = Some(step);
            run.registry.mark_running(step, start_ts)?;
            log_to_run(
                &mut run,
                &self.events_tx,
                format!(">>> Executing step: {step}"),
            )
            .await;
            run.session_id_or_empty()
        };
        let _ = self
            .events_tx
            .send(Event::StepStart {
                step,
                session_id,
                start_ts,
            })
            .await;

        match op().await {
            Ok(value) => {
                let end_ts = Utc::now();
                let output = to_output(&value);
                let result_summary = output.summary();
                let duration_s = {
                    let mut run = self.state.write().await;
                    run.registry.mark_done(step, end_ts)?;
                    run.results.insert(step, output);
                    run.registry
                        .snapshot(step, end_ts)?
                        .duration_s
                        .unwrap_or(0.0)
                };
                let _ = self
                    .events_tx
                    .send(Event::StepComplete {
                        step,
                        result_summary,
                        duration_s,
                        end_ts,
                    })
                    .await;
                Ok(value)
            }
            Err(source) => {
                let end_ts = Utc::now();
                {
                    let mut run = self.state.write().await;
                    run.registry.mark_error(step, end_ts)?;
                    run.status = PipelineStatus::Failed;
                    log_to_run(
                        &mut run,
                        &self.events_tx,
                        format!("Step {step} failed: {source}"),
                    )
                    .await;
                }
                let _ = self
                    .events_tx
                    .send(Event::StepError {
                        step,
                        error: source.to_string(),
                    })
                    .await;
                Err(PipelineError::StepFailed { step, source })
            }
        }
    }

    /// Route a review-gate step through the shared gate.
    async fn review_step(
        &self,
        step: StepId,
        payload: ReviewPayload,
    ) -> PipelineResult<ReviewPayload> {
        self.check_cancelled(step).await?;
        {
            let mut run = self.state.write().await;
            run.current_step = Some(step);
        }
        let timeout = Duration::from_secs(self.config.review_timeout_secs);
        let outcome = self.gate.open(step, payload, timeout, Utc::now()).await?;
        Ok(outcome.payload)
    }

    async fn check_cancelled(&self, step: StepId) -> PipelineResult<()> {
        let run = self.state.read().await;
        if run.status == PipelineStatus::Paused {
            return Err(PipelineError::Cancelled { step });
        }
        Ok(())
    }

    /// Accept a human override for the currently open review window.
    pub async fn submit_override(
        &self,
        step: StepId,
        payload: ReviewPayload,
    ) -> Result<(), OverrideError> {
        self.gate.submit_override(step, payload).await
    }

    /// Point-in-time status snapshot; safe to call from any task while a
    /// run is in flight.
    pub async fn status(&self, now: DateTime<Utc>) -> StatusSnapshot {
        let run = self.state.read().await;
        report::snapshot(&run, now)
    }

    /// Request cancellation of the active run.
    ///
    /// Takes effect between steps; an in-flight collaborator call or open
    /// review window is not interrupted.
    pub async fn cancel(&self) {
        let mut run = self.state.write().await;
        if run.status == PipelineStatus::Running {
            run.status = PipelineStatus::Paused;
            log_to_run(
                &mut run,
                &self.events_tx,
                "Pipeline cancelled by user.".to_string(),
            )
            .await;
        }
    }

    /// The session directory of the current (or last) run, if any.
    pub async fn session_path(&self) -> Option<PathBuf> {
        self.state.read().await.session_path.clone()
    }
}

fn unexpected_payload(step: StepId, payload: &ReviewPayload) -> PipelineError {
    PipelineError::StepFailed {
        step,
        source: anyhow!("review gate returned a payload of the wrong kind: {payload:?}"),
    }
}

#[allow(clippy::too_many_arguments)]
fn build_manifest(
    session_id: &str,
    run_started: DateTime<Utc>,
    research: &ResearchResult,
    final_script: &Script,
    final_review: &ugc_protocol::Verdict,
    iterations_taken: u32,
    video: &ugc_protocol::MediaManifest,
    social: &ugc_protocol::SocialMetadata,
) -> RunManifest {
    let created_at = Utc::now();
    RunManifest {
        session_id: session_id.to_string(),
        created_at,
        pipeline_duration_seconds: report::round2(
            (created_at - run_started).num_milliseconds() as f64 / 1000.0,
        ),
        research_summary: research.pain_points.clone(),
        script: final_script.clone(),
        qa_scores: final_review.clone(),
        media_files: video.clone(),
        social_metadata: social.clone(),
        iterations_taken,
    }
}
