//! Sample content payloads and configs used across the integration tests.

use chrono::Utc;
use std::path::Path;
use ugc_core::config::PipelineConfig;
use ugc_protocol::{
    Idea, IdeaScores, IdeaSet, MediaManifest, PainPoint, ResearchResult, Script, ScriptMetadata,
    Segment, SocialMetadata, TechnicalChecks, TechnicalReport, Verdict,
};

/// Config pointed at a scratch output dir, with a configurable review
/// timeout. Zero means every gate resolves immediately by timeout.
pub fn test_config(output_dir: &Path, review_timeout_secs: u64) -> PipelineConfig {
    PipelineConfig {
        output_dir: output_dir.to_path_buf(),
        review_timeout_secs,
        ..PipelineConfig::default()
    }
}

pub fn sample_research() -> ResearchResult {
    ResearchResult {
        pain_points: vec![PainPoint {
            topic: "design handoff friction".to_string(),
            severity: "high".to_string(),
            evidence: "47 complaints across three communities this week".to_string(),
        }],
        sources: vec!["reddit".to_string(), "x".to_string()],
        validated_at: Utc::now(),
    }
}

pub fn sample_idea_set() -> IdeaSet {
    let idea = Idea {
        title: "The handoff tax nobody budgets for".to_string(),
        pain_point: "design handoff friction".to_string(),
        hook_3sec: "Your designs die in the handoff.".to_string(),
        content_angle: "quantify the rework cost".to_string(),
        cta: "Follow for part two".to_string(),
        platform_primary: "tiktok".to_string(),
        scores: IdeaScores {
            pain_relevance: 9,
            hook_strength: 8,
            originality: 7,
            total: 24,
        },
    };
    IdeaSet {
        all_ideas: vec![idea.clone()],
        selected_idea: idea,
    }
}

pub fn sample_script(version: u32) -> Script {
    Script {
        version,
        metadata: ScriptMetadata {
            total_duration: 34.0,
            total_words: 85,
            reading_rate: 2.5,
        },
        segments: vec![
            Segment {
                id: "hook".to_string(),
                text: "Your designs die in the handoff.".to_string(),
                duration_seconds: 3.0,
                word_count: 6,
                visual_suggestion: "talking head, tight crop".to_string(),
                on_screen_text: "the handoff tax".to_string(),
                emotion_cue: "urgent".to_string(),
            },
            Segment {
                id: "body".to_string(),
                text: "Here is what that rework actually costs you.".to_string(),
                duration_seconds: 28.0,
                word_count: 72,
                visual_suggestion: "screen recording".to_string(),
                on_screen_text: String::new(),
                emotion_cue: "confident".to_string(),
            },
            Segment {
                id: "cta".to_string(),
                text: "Follow for part two.".to_string(),
                duration_seconds: 3.0,
                word_count: 7,
                visual_suggestion: "talking head".to_string(),
                on_screen_text: "part two tomorrow".to_string(),
                emotion_cue: "warm".to_string(),
            },
        ],
    }
}

pub fn sample_verdict(score: f64, iteration: u32) -> Verdict {
    Verdict {
        overall_score: score,
        criteria: Default::default(),
        must_fix: vec![],
        nice_to_fix: vec![],
        approved: false,
        iteration,
    }
}

pub fn sample_media_manifest() -> MediaManifest {
    MediaManifest {
        vertical_720p: "video/vertical_720p.mp4".into(),
        vertical_1080p: None,
        square: "video/square.mp4".into(),
        duration_seconds: 34.2,
        file_sizes_mb: Default::default(),
    }
}

pub fn sample_technical_report() -> TechnicalReport {
    TechnicalReport {
        checks: Some(TechnicalChecks {
            duration: 34.2,
            resolution: "720x1280".to_string(),
            file_size_mb: 11.8,
            codec: "h264".to_string(),
        }),
        approved: true,
        issues: vec![],
    }
}

pub fn sample_social() -> SocialMetadata {
    SocialMetadata {
        caption: "The handoff tax nobody budgets for".to_string(),
        hashtags: vec!["#design".to_string(), "#ux".to_string()],
        platforms: vec!["tiktok".to_string(), "reels".to_string()],
    }
}
