//! # ugc-protocol
//!
//! Shared data models for the UGC content pipeline.
//!
//! This crate defines all data structures exchanged between the control core
//! and any UI/transport layer:
//! - Step identifiers and per-step lifecycle state
//! - Pipeline-level run status and progress snapshots
//! - Typed content payloads (research, ideas, scripts, verdicts, media)
//! - Observer events emitted while a run is in flight
//!
//! ## Modules
//!
//! - [`steps`]: The fixed step sequence and per-step state
//! - [`run_models`]: Pipeline status and the point-in-time status snapshot
//! - [`content`]: Payload record types passed between steps
//! - [`events`]: Events emitted by the core to observers
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, serde_json, and chrono
//! - Everything is serializable; the wire format is stable JSON
//!   (snake_case step names, lowercase statuses)
//! - Independent compilation: no dependency on the core crate

pub mod content;
pub mod events;
pub mod run_models;
pub mod steps;

// Re-export all public types for convenience
pub use content::*;
pub use events::*;
pub use run_models::*;
pub use steps::*;
