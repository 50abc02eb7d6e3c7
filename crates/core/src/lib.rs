//! # ugc-core
//!
//! Control core for the UGC content-production pipeline.
//!
//! This crate provides:
//! - The fixed-sequence pipeline engine with per-step state tracking
//! - Blocking human-review gates with bounded timeouts and async overrides
//! - The bounded, score-gated QA refinement loop
//! - Progress snapshots readable while a run is in flight
//! - Session storage and the final run manifest
//!
//! ## Modules
//!
//! - [`collaborators`]: Trait seams for the external research/writing/media/QA agents
//! - [`config`]: Pipeline configuration loading
//! - [`engine`]: The pipeline execution engine and its control surface
//! - [`error`]: The error taxonomy
//! - [`gate`]: The review-gate rendezvous primitive
//! - [`llm`]: Decode and retry helpers for model-backed collaborators
//! - [`refine`]: The generate-review-revise loop
//! - [`report`]: Progress snapshot derivation
//! - [`session`]: Run-scoped storage and manifest persistence
//! - [`state`]: Step registry and run state

pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod llm;
pub mod refine;
pub mod report;
pub mod session;
pub mod state;
