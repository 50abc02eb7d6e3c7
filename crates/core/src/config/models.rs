//! Configuration model for the pipeline core.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::error::{ConfigError, ConfigResult};

/// Tunable behavior of the pipeline core.
///
/// Every field has a usable default; an empty config file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root directory under which per-run session folders are created.
    pub output_dir: PathBuf,

    /// Wall-clock budget of each human-review window.
    pub review_timeout_secs: u64,

    /// Minimum reviewer score for the refinement loop to approve a script.
    pub approval_threshold: f64,

    /// Iteration cap of the refinement loop; the last rejected iteration is
    /// auto-approved.
    pub max_qa_iterations: u32,

    /// Target vertical resolution of the rendered video.
    pub processing_resolution: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            review_timeout_secs: 120,
            approval_threshold: 7.5,
            max_qa_iterations: 3,
            processing_resolution: 720,
        }
    }
}

impl PipelineConfig {
    /// Validate values the engine cannot operate with. Called at engine
    /// construction so a bad config fails fast, not mid-run.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_qa_iterations == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_qa_iterations must be at least 1".to_string(),
            });
        }
        if !self.approval_threshold.is_finite() {
            return Err(ConfigError::Invalid {
                reason: "approval_threshold must be a finite number".to_string(),
            });
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "output_dir must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.review_timeout_secs, 120);
        assert_eq!(config.approval_threshold, 7.5);
        assert_eq!(config.max_qa_iterations, 3);
        assert_eq!(config.processing_resolution, 720);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_is_invalid() {
        let config = PipelineConfig {
            max_qa_iterations: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_empty_output_dir_is_invalid() {
        let config = PipelineConfig {
            output_dir: PathBuf::new(),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
