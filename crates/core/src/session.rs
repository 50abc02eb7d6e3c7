//! Run-scoped storage and manifest persistence.
//!
//! Each run owns a directory under the configured output root, named by its
//! creation-time session id (`YYYY-MM-DD-HHMMSS`). The final manifest is
//! written exactly once, at successful completion.

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use ugc_protocol::RunManifest;

/// File name of the persisted run manifest.
pub const MANIFEST_FILE: &str = "final_manifest.json";

/// Create the session directory for a run starting at `now`.
///
/// Returns the session id and the created path.
pub fn create_session(output_dir: &Path, now: DateTime<Utc>) -> io::Result<(String, PathBuf)> {
    let session_id = now.format("%Y-%m-%d-%H%M%S").to_string();
    let session_path = output_dir.join(&session_id);
    std::fs::create_dir_all(&session_path)?;
    Ok((session_id, session_path))
}

/// Write the run manifest into the session directory, pretty-printed.
pub fn write_manifest(session_path: &Path, manifest: &RunManifest) -> io::Result<PathBuf> {
    let path = session_path.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    std::fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use ugc_protocol::{
        MediaManifest, Script, ScriptMetadata, SocialMetadata, Verdict,
    };

    #[test]
    fn test_session_id_is_timestamp_shaped() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 10, 15, 0).unwrap();

        let (session_id, session_path) = create_session(dir.path(), now).unwrap();
        assert_eq!(session_id, "2026-08-30-101500");
        assert!(session_path.is_dir());
        assert_eq!(session_path, dir.path().join("2026-08-30-101500"));
    }

    #[test]
    fn test_manifest_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = RunManifest {
            session_id: "2026-08-30-101500".to_string(),
            created_at: Utc::now(),
            pipeline_duration_seconds: 12.34,
            research_summary: vec![],
            script: Script {
                version: 2,
                metadata: ScriptMetadata::default(),
                segments: vec![],
            },
            qa_scores: Verdict {
                overall_score: 8.1,
                criteria: BTreeMap::new(),
                must_fix: vec![],
                nice_to_fix: vec![],
                approved: true,
                iteration: 2,
            },
            media_files: MediaManifest {
                vertical_720p: dir.path().join("final_720p.mp4"),
                vertical_1080p: None,
                square: dir.path().join("final_square.mp4"),
                duration_seconds: 41.0,
                file_sizes_mb: BTreeMap::new(),
            },
            social_metadata: SocialMetadata::default(),
            iterations_taken: 2,
        };

        let path = write_manifest(dir.path(), &manifest).unwrap();
        assert_eq!(path, dir.path().join(MANIFEST_FILE));

        let content = std::fs::read_to_string(&path).unwrap();
        let back: RunManifest = serde_json::from_str(&content).unwrap();
        assert_eq!(back, manifest);
    }
}
