//! Decode and retry helpers for model-backed collaborators.
//!
//! The core performs no automatic retries of failed steps; the only
//! transient-call resilience in the system lives here, at the model-call
//! layer, as a single retry with a short backoff. The decode helper rescues
//! replies truncated by output limits: free-tier models routinely cut JSON
//! mid-object.

use anyhow::Result;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Backoff applied between the first failure and the single retry.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(3);

/// A model reply that could not be decoded even after rescue.
#[derive(Error, Debug)]
#[error("invalid JSON in model reply: {0}")]
pub struct ModelReplyError(#[from] serde_json::Error);

/// Parse a model reply as JSON, rescuing truncated output when the strict
/// parse fails.
///
/// The rescue scans backwards over the closing `}` / `]` positions and
/// returns the longest valid prefix ending at one of them; if none parses,
/// the original strict-parse error is returned.
pub fn parse_model_json(content: &str) -> Result<Value, ModelReplyError> {
    match serde_json::from_str(content) {
        Ok(value) => Ok(value),
        Err(err) => rescue_truncated(content).ok_or(ModelReplyError(err)),
    }
}

fn rescue_truncated(content: &str) -> Option<Value> {
    for close in ['}', ']'] {
        let mut end = content.rfind(close);
        while let Some(idx) = end {
            if let Ok(value) = serde_json::from_str::<Value>(&content[..=idx]) {
                return Some(value);
            }
            end = content[..idx].rfind(close);
        }
    }
    None
}

/// Run a fallible model call, retrying once after [`RETRY_BACKOFF`].
///
/// The backoff is a parameter so collaborators (and tests) can shorten it;
/// production callers pass [`RETRY_BACKOFF`]. The second failure is
/// returned as-is.
pub async fn retry_once<T, F, Fut>(backoff: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(_first) => {
            tokio::time::sleep(backoff).await;
            op().await
        }
    }
}
