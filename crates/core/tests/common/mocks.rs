//! Mock collaborators with deterministic, instant behavior.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use ugc_core::collaborators::{Collaborators, MediaGenerator, QaReviewer, Researcher, Writer};
use ugc_protocol::{
    Idea, IdeaSet, MediaManifest, ResearchResult, Script, Segment, SocialMetadata,
    TechnicalReport, Verdict,
};

use super::fixtures;

/// Returns the sample research result, after an optional delay.
pub struct StubResearcher {
    pub delay: Option<Duration>,
}

#[async_trait]
impl Researcher for StubResearcher {
    async fn trending_pain_points(&self, _session_id: &str) -> Result<ResearchResult> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(fixtures::sample_research())
    }
}

/// Produces the sample idea and script; each refinement bumps the script
/// version by one.
pub struct StubWriter;

#[async_trait]
impl Writer for StubWriter {
    async fn content_idea(&self, _research: &ResearchResult) -> Result<IdeaSet> {
        Ok(fixtures::sample_idea_set())
    }

    async fn write_script(&self, _idea: &Idea, _session_id: &str) -> Result<Script> {
        Ok(fixtures::sample_script(1))
    }

    async fn refine_script(
        &self,
        script: &Script,
        _verdict: &Verdict,
        _session_id: &str,
    ) -> Result<Script> {
        let mut revised = script.clone();
        revised.version += 1;
        Ok(revised)
    }

    async fn social_metadata(&self, _script: &Script) -> Result<SocialMetadata> {
        Ok(fixtures::sample_social())
    }
}

/// Writes nothing to disk; returns plausible relative paths.
pub struct StubMedia;

#[async_trait]
impl MediaGenerator for StubMedia {
    async fn voiceover(&self, segments: &[Segment], _run_path: &Path) -> Result<Vec<PathBuf>> {
        Ok(segments
            .iter()
            .map(|s| PathBuf::from(format!("audio/{}.mp3", s.id)))
            .collect())
    }

    async fn avatar_clips(
        &self,
        segments: &[Segment],
        _audio: &[PathBuf],
        _run_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        Ok(segments
            .iter()
            .map(|s| PathBuf::from(format!("clips/{}.mp4", s.id)))
            .collect())
    }

    async fn background_images(
        &self,
        segments: &[Segment],
        _run_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        Ok(segments
            .iter()
            .map(|s| PathBuf::from(format!("images/{}.png", s.id)))
            .collect())
    }

    async fn assemble(
        &self,
        _clips: &[PathBuf],
        _images: &[PathBuf],
        _script: &Script,
        _run_path: &Path,
    ) -> Result<MediaManifest> {
        Ok(fixtures::sample_media_manifest())
    }
}

/// Fails the voiceover step, as a remote synthesis backend would.
pub struct BrokenVoiceoverMedia;

#[async_trait]
impl MediaGenerator for BrokenVoiceoverMedia {
    async fn voiceover(&self, _segments: &[Segment], _run_path: &Path) -> Result<Vec<PathBuf>> {
        Err(anyhow!("tts backend unavailable"))
    }

    async fn avatar_clips(
        &self,
        _segments: &[Segment],
        _audio: &[PathBuf],
        _run_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        Err(anyhow!("unreachable without audio"))
    }

    async fn background_images(
        &self,
        _segments: &[Segment],
        _run_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        Err(anyhow!("unreachable without audio"))
    }

    async fn assemble(
        &self,
        _clips: &[PathBuf],
        _images: &[PathBuf],
        _script: &Script,
        _run_path: &Path,
    ) -> Result<MediaManifest> {
        Err(anyhow!("unreachable without audio"))
    }
}

/// Scores every script with the same fixed value and approves the
/// rendered video.
pub struct StubQa {
    pub score: f64,
}

#[async_trait]
impl QaReviewer for StubQa {
    async fn review_script(
        &self,
        _script: &Script,
        _research: &ResearchResult,
        iteration: u32,
    ) -> Result<Verdict> {
        Ok(fixtures::sample_verdict(self.score, iteration))
    }

    async fn review_technical(&self, _media_path: &Path) -> Result<TechnicalReport> {
        Ok(fixtures::sample_technical_report())
    }
}

/// A full collaborator set that succeeds end to end with the given QA score.
pub fn passing_collaborators(score: f64) -> Collaborators {
    Collaborators {
        researcher: Arc::new(StubResearcher { delay: None }),
        writer: Arc::new(StubWriter),
        media: Arc::new(StubMedia),
        qa: Arc::new(StubQa { score }),
    }
}
