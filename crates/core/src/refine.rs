//! The bounded generate-review-revise loop.
//!
//! Drives repeated reviewer/writer rounds against a numeric approval
//! threshold. The loop is the sole authority on pass/fail: it recomputes
//! approval from the score regardless of what the reviewer's own flag says.
//! It always terminates; an exhausted iteration cap auto-approves the last
//! artifact rather than blocking the pipeline on unreachable quality.

use anyhow::Result;
use tokio::sync::mpsc::Sender;
use ugc_protocol::{Event, QaOutcome, ResearchResult, Script};

use crate::collaborators::{QaReviewer, Writer};

/// Bounded, score-gated review-and-revise driver.
#[derive(Debug, Clone, Copy)]
pub struct RefinementLoop {
    approval_threshold: f64,
    max_iterations: u32,
}

impl RefinementLoop {
    pub fn new(approval_threshold: f64, max_iterations: u32) -> Self {
        Self {
            approval_threshold,
            max_iterations,
        }
    }

    /// Run review rounds until the script passes the threshold or the cap
    /// is hit.
    ///
    /// Per round: review, recompute approval from the score, emit a
    /// [`Event::QaRound`] notification, then either stop (approved), revise
    /// (rejected, rounds remaining), or auto-approve (rejected on the last
    /// round). With a cap of 1 the writer is never called.
    ///
    /// # Errors
    ///
    /// A reviewer or writer failure propagates immediately; no partial
    /// round is counted and nothing is swallowed.
    pub async fn run(
        &self,
        script: Script,
        research: &ResearchResult,
        qa: &dyn QaReviewer,
        writer: &dyn Writer,
        session_id: &str,
        events_tx: &Sender<Event>,
    ) -> Result<QaOutcome> {
        // A cap of zero is rejected at config validation; treat it as one
        // review here so the loop still terminates with a verdict.
        let cap = self.max_iterations.max(1);
        let mut current = script;

        for iteration in 1..=cap {
            let mut verdict = qa.review_script(&current, research, iteration).await?;
            verdict.iteration = iteration;
            verdict.approved = verdict.overall_score >= self.approval_threshold;

            let _ = events_tx
                .send(Event::QaRound {
                    iteration,
                    score: verdict.overall_score,
                    approved: verdict.approved,
                })
                .await;

            if verdict.approved {
                return Ok(QaOutcome {
                    final_script: current,
                    final_review: verdict,
                    iterations_taken: iteration,
                    auto_approved: false,
                });
            }

            if iteration < cap {
                current = writer.refine_script(&current, &verdict, session_id).await?;
            } else {
                return Ok(QaOutcome {
                    final_script: current,
                    final_review: verdict,
                    iterations_taken: iteration,
                    auto_approved: true,
                });
            }
        }

        unreachable!("the final iteration always returns")
    }
}
