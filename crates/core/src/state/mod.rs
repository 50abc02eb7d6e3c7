//! Run state and per-step lifecycle tracking.
//!
//! - [`registry`]: one mutable state entry per step of the fixed sequence
//! - [`run`]: the single active run's state plus its transition helpers

pub mod registry;
pub mod run;

pub use registry::StepRegistry;
pub use run::{PendingReview, RunState};
