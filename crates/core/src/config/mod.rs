//! Pipeline configuration loading and validation.
//!
//! Configuration comes from an optional TOML file; a missing file yields the
//! built-in defaults (120 s review windows, a 7.5 approval threshold, three
//! QA iterations).

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_config;
pub use models::PipelineConfig;
