//! Collaborator trait seams the engine drives each step through.
//!
//! The concrete research, writing, media-synthesis, and QA logic lives
//! outside this crate; the engine only sees these narrow async interfaces.
//! Every method is fallible. A collaborator error is fatal to the run: the
//! core performs no retries at this layer (transient-call resilience belongs
//! to the collaborator itself, see [`crate::llm`]).

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ugc_protocol::{
    Idea, IdeaSet, MediaManifest, ResearchResult, Script, Segment, SocialMetadata,
    TechnicalReport, Verdict,
};

/// Gathers and validates audience pain points for a run.
#[async_trait]
pub trait Researcher: Send + Sync {
    async fn trending_pain_points(&self, session_id: &str) -> Result<ResearchResult>;
}

/// Generates ideas, scripts, revisions, and publication copy.
#[async_trait]
pub trait Writer: Send + Sync {
    async fn content_idea(&self, research: &ResearchResult) -> Result<IdeaSet>;

    async fn write_script(&self, idea: &Idea, session_id: &str) -> Result<Script>;

    /// Rewrite only the segments the verdict's must-fix list names.
    async fn refine_script(
        &self,
        script: &Script,
        verdict: &Verdict,
        session_id: &str,
    ) -> Result<Script>;

    async fn social_metadata(&self, script: &Script) -> Result<SocialMetadata>;
}

/// Synthesizes and assembles the media artifacts of a run.
///
/// These calls may block for long wall-clock periods (remote synthesis,
/// render polling); the engine runs them synchronously within the step
/// wrapper and accepts whatever duration they take.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    async fn voiceover(&self, segments: &[Segment], run_path: &Path) -> Result<Vec<PathBuf>>;

    async fn avatar_clips(
        &self,
        segments: &[Segment],
        audio: &[PathBuf],
        run_path: &Path,
    ) -> Result<Vec<PathBuf>>;

    async fn background_images(
        &self,
        segments: &[Segment],
        run_path: &Path,
    ) -> Result<Vec<PathBuf>>;

    async fn assemble(
        &self,
        clips: &[PathBuf],
        images: &[PathBuf],
        script: &Script,
        run_path: &Path,
    ) -> Result<MediaManifest>;
}

/// Scores scripts for the refinement loop and checks rendered output.
#[async_trait]
pub trait QaReviewer: Send + Sync {
    /// Score a script against the research context. The returned verdict's
    /// `approved` flag is advisory; the refinement loop recomputes it from
    /// the score and the configured threshold.
    async fn review_script(
        &self,
        script: &Script,
        research: &ResearchResult,
        iteration: u32,
    ) -> Result<Verdict>;

    async fn review_technical(&self, media_path: &Path) -> Result<TechnicalReport>;
}

/// The full collaborator set an engine is constructed with.
#[derive(Clone)]
pub struct Collaborators {
    pub researcher: Arc<dyn Researcher>,
    pub writer: Arc<dyn Writer>,
    pub media: Arc<dyn MediaGenerator>,
    pub qa: Arc<dyn QaReviewer>,
}
