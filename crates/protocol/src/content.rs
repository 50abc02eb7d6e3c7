//! Typed payload records passed between pipeline steps.
//!
//! Every payload kind is an explicit record so shape is validated at step
//! boundaries. [`ReviewPayload`] and [`StepOutput`] are the two closed enums
//! the engine moves around: what a review gate carries and what a completed
//! step stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::steps::StepId;

/// A single audience pain point surfaced by research.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PainPoint {
    pub topic: String,
    pub severity: String,
    pub evidence: String,
}

/// Output of the research step: validated pain points plus provenance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResearchResult {
    pub pain_points: Vec<PainPoint>,
    #[serde(default)]
    pub sources: Vec<String>,
    pub validated_at: DateTime<Utc>,
}

/// Self-assessed scoring attached to each generated idea.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdeaScores {
    pub pain_relevance: u8,
    pub hook_strength: u8,
    pub originality: u8,
    pub total: u8,
}

/// One content idea candidate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Idea {
    pub title: String,
    pub pain_point: String,
    pub hook_3sec: String,
    pub content_angle: String,
    pub cta: String,
    pub platform_primary: String,
    #[serde(default)]
    pub scores: IdeaScores,
}

/// Output of the ideation step: the winning idea and the full candidate list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IdeaSet {
    pub selected_idea: Idea,
    #[serde(default)]
    pub all_ideas: Vec<Idea>,
}

/// One timed segment of a video script.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: String,
    pub text: String,
    pub duration_seconds: f64,
    pub word_count: u32,
    #[serde(default)]
    pub visual_suggestion: String,
    #[serde(default)]
    pub on_screen_text: String,
    #[serde(default)]
    pub emotion_cue: String,
}

/// Aggregate script timing metadata.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct ScriptMetadata {
    pub total_duration: f64,
    pub total_words: u32,
    pub reading_rate: f64,
}

/// A full video script: versioned, with timed segments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Script {
    pub version: u32,
    #[serde(default)]
    pub metadata: ScriptMetadata,
    pub segments: Vec<Segment>,
}

/// Score plus free-form feedback for one review criterion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CriterionScore {
    pub score: f64,
    pub feedback: String,
}

/// A concrete defect the reviewer requires fixed before approval.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MustFix {
    pub segment: String,
    pub issue: String,
    pub suggested_rewrite: String,
}

/// Reviewer output for one iteration of the refinement loop.
///
/// `approved` as stored here is recomputed by the loop from `overall_score`
/// against the configured threshold; the reviewer's own flag is advisory only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Verdict {
    pub overall_score: f64,
    #[serde(default)]
    pub criteria: BTreeMap<String, CriterionScore>,
    #[serde(default)]
    pub must_fix: Vec<MustFix>,
    #[serde(default)]
    pub nice_to_fix: Vec<String>,
    pub approved: bool,
    pub iteration: u32,
}

/// Result of the bounded generate-review-revise loop.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QaOutcome {
    pub final_script: Script,
    pub final_review: Verdict,
    pub iterations_taken: u32,
    /// True only when the iteration cap was hit without approval.
    pub auto_approved: bool,
}

/// Rendered output files produced by the assembly step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MediaManifest {
    pub vertical_720p: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_1080p: Option<PathBuf>,
    pub square: PathBuf,
    pub duration_seconds: f64,
    #[serde(default)]
    pub file_sizes_mb: BTreeMap<String, f64>,
}

/// Measured properties of the rendered video file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TechnicalChecks {
    pub duration: f64,
    pub resolution: String,
    pub file_size_mb: f64,
    pub codec: String,
}

/// Outcome of the technical review on the rendered video.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TechnicalReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<TechnicalChecks>,
    pub approved: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Publication copy generated for social platforms.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SocialMetadata {
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// The final aggregated record of a completed run, persisted once as
/// `final_manifest.json` in the session directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunManifest {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub pipeline_duration_seconds: f64,
    pub research_summary: Vec<PainPoint>,
    pub script: Script,
    pub qa_scores: Verdict,
    pub media_files: MediaManifest,
    pub social_metadata: SocialMetadata,
    pub iterations_taken: u32,
}

/// Payload carried through a review gate.
///
/// Each gate step carries exactly one kind; overrides submitted with a kind
/// that does not match the open gate's step are rejected at the boundary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ReviewPayload {
    /// Carried by `review_research`.
    Research(ResearchResult),

    /// Carried by `review_script`.
    Script(Script),

    /// Carried by `review_qa`: the refined script plus the QA outcome the
    /// reviewer should judge it against.
    QaSummary {
        script: Script,
        qa_score: Option<f64>,
        auto_approved: bool,
    },
}

impl ReviewPayload {
    /// Whether this payload kind is the one the given gate step carries.
    pub fn matches_step(&self, step: StepId) -> bool {
        matches!(
            (self, step),
            (ReviewPayload::Research(_), StepId::ReviewResearch)
                | (ReviewPayload::Script(_), StepId::ReviewScript)
                | (ReviewPayload::QaSummary { .. }, StepId::ReviewQa)
        )
    }
}

/// Result payload stored per completed step, keyed by step id in the run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum StepOutput {
    Research(ResearchResult),
    Ideation(IdeaSet),
    Script(Script),
    Qa(QaOutcome),
    AudioFiles(Vec<PathBuf>),
    ClipFiles(Vec<PathBuf>),
    ImageFiles(Vec<PathBuf>),
    Media(MediaManifest),
    Technical(TechnicalReport),
    Social(SocialMetadata),
    Manifest(RunManifest),
}

/// Cap applied to result summaries in `step_complete` events.
const SUMMARY_MAX_CHARS: usize = 200;

impl StepOutput {
    /// JSON rendering of the payload truncated for event traffic.
    pub fn summary(&self) -> String {
        let full = serde_json::to_string(self).unwrap_or_else(|_| "<unserializable>".to_string());
        full.chars().take(SUMMARY_MAX_CHARS).collect()
    }
}
