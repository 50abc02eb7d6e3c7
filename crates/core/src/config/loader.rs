//! Configuration file loader.

use std::path::Path;

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::PipelineConfig;

/// Load pipeline configuration from a TOML file.
///
/// A missing file is not an error: it yields [`PipelineConfig::default`],
/// so embedders only write a config file when they change something.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, has invalid
/// TOML syntax, or carries unusable values.
pub fn load_config(path: &Path) -> ConfigResult<PipelineConfig> {
    if !path.exists() {
        return Ok(PipelineConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config: PipelineConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;

    config.validate()?;
    Ok(config)
}
