//! Per-step lifecycle state for the fixed step sequence.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use ugc_protocol::{StepId, StepSnapshot, StepStatus};

use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone)]
struct StepEntry {
    status: StepStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    duration_s: Option<f64>,
}

impl StepEntry {
    fn pending() -> Self {
        Self {
            status: StepStatus::Pending,
            started_at: None,
            ended_at: None,
            duration_s: None,
        }
    }
}

/// Tracks lifecycle state, timestamps, and duration for every step of the
/// fixed sequence.
///
/// One entry per step is pre-created at construction with status `pending`.
/// Steps re-run by the refinement loop reuse their entry: entering `running`
/// or `review` again clears the previous end timestamp and duration.
/// `ended_at` and `duration_s` are always set together.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    states: HashMap<StepId, StepEntry>,
}

impl StepRegistry {
    /// Create a registry with every known step in `pending` state.
    pub fn new() -> Self {
        let states = StepId::ALL
            .iter()
            .map(|&step| (step, StepEntry::pending()))
            .collect();
        Self { states }
    }

    /// Return every step to `pending` with no timestamps. Used when the
    /// engine is reused for a new run.
    pub fn reset(&mut self) {
        for entry in self.states.values_mut() {
            *entry = StepEntry::pending();
        }
    }

    fn entry_mut(&mut self, step: StepId) -> PipelineResult<&mut StepEntry> {
        self.states
            .get_mut(&step)
            .ok_or_else(|| PipelineError::UnknownStep(step.to_string()))
    }

    /// Transition a step into `running`, recording its start time.
    pub fn mark_running(&mut self, step: StepId, now: DateTime<Utc>) -> PipelineResult<()> {
        let entry = self.entry_mut(step)?;
        entry.status = StepStatus::Running;
        entry.started_at = Some(now);
        entry.ended_at = None;
        entry.duration_s = None;
        Ok(())
    }

    /// Transition a step into `review`, recording when the window opened.
    pub fn mark_review(&mut self, step: StepId, now: DateTime<Utc>) -> PipelineResult<()> {
        let entry = self.entry_mut(step)?;
        entry.status = StepStatus::Review;
        entry.started_at = Some(now);
        entry.ended_at = None;
        entry.duration_s = None;
        Ok(())
    }

    /// Transition a step into `done`, recording end time and duration.
    pub fn mark_done(&mut self, step: StepId, now: DateTime<Utc>) -> PipelineResult<()> {
        let entry = self.entry_mut(step)?;
        entry.status = StepStatus::Done;
        let start = entry.started_at.unwrap_or(now);
        entry.ended_at = Some(now);
        entry.duration_s = Some(seconds_between(start, now));
        Ok(())
    }

    /// Transition a step into `error`. Terminal for the step.
    pub fn mark_error(&mut self, step: StepId, now: DateTime<Utc>) -> PipelineResult<()> {
        let entry = self.entry_mut(step)?;
        entry.status = StepStatus::Error;
        let start = entry.started_at.unwrap_or(now);
        entry.ended_at = Some(now);
        entry.duration_s = Some(seconds_between(start, now));
        Ok(())
    }

    /// Immutable view of one step. While the step is `running` or `review`
    /// the duration is computed live against `now`.
    pub fn snapshot(&self, step: StepId, now: DateTime<Utc>) -> PipelineResult<StepSnapshot> {
        let entry = self
            .states
            .get(&step)
            .ok_or_else(|| PipelineError::UnknownStep(step.to_string()))?;

        let duration_s = match (entry.duration_s, entry.status, entry.started_at) {
            (Some(d), _, _) => Some(d),
            (None, StepStatus::Running | StepStatus::Review, Some(start)) => {
                Some(seconds_between(start, now))
            }
            _ => None,
        };

        Ok(StepSnapshot {
            step,
            status: entry.status,
            started_at: entry.started_at,
            ended_at: entry.ended_at,
            duration_s,
        })
    }

    /// Snapshots of every step in canonical order.
    pub fn snapshots(&self, now: DateTime<Utc>) -> Vec<StepSnapshot> {
        StepId::ALL
            .iter()
            .filter_map(|&step| self.snapshot(step, now).ok())
            .collect()
    }

    /// Count of steps in a terminal state (`done` or `error`). This is the
    /// only thing that moves progress forward.
    pub fn terminal_count(&self) -> usize {
        self.states
            .values()
            .filter(|e| matches!(e.status, StepStatus::Done | StepStatus::Error))
            .count()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_all_steps_pending_after_init() {
        let registry = StepRegistry::new();
        let now = Utc::now();
        for step in StepId::ALL {
            let snap = registry.snapshot(step, now).unwrap();
            assert_eq!(snap.status, StepStatus::Pending);
            assert!(snap.started_at.is_none());
            assert!(snap.ended_at.is_none());
            assert!(snap.duration_s.is_none());
        }
        assert_eq!(registry.terminal_count(), 0);
    }

    #[test]
    fn test_duration_is_end_minus_start() {
        let mut registry = StepRegistry::new();
        let start = Utc::now();
        let end = start + Duration::milliseconds(2500);

        registry.mark_running(StepId::Research, start).unwrap();
        registry.mark_done(StepId::Research, end).unwrap();

        let snap = registry.snapshot(StepId::Research, end).unwrap();
        assert_eq!(snap.status, StepStatus::Done);
        assert_eq!(snap.started_at, Some(start));
        assert_eq!(snap.ended_at, Some(end));
        assert_eq!(snap.duration_s, Some(2.5));
    }

    #[test]
    fn test_live_duration_while_running() {
        let mut registry = StepRegistry::new();
        let start = Utc::now();
        registry.mark_running(StepId::Scripting, start).unwrap();

        let later = start + Duration::seconds(7);
        let snap = registry.snapshot(StepId::Scripting, later).unwrap();
        assert_eq!(snap.status, StepStatus::Running);
        assert!(snap.ended_at.is_none());
        assert_eq!(snap.duration_s, Some(7.0));
    }

    #[test]
    fn test_reentry_clears_end_and_duration() {
        let mut registry = StepRegistry::new();
        let t0 = Utc::now();
        registry.mark_running(StepId::QaLoop, t0).unwrap();
        registry
            .mark_done(StepId::QaLoop, t0 + Duration::seconds(1))
            .unwrap();

        let t1 = t0 + Duration::seconds(5);
        registry.mark_running(StepId::QaLoop, t1).unwrap();
        let snap = registry.snapshot(StepId::QaLoop, t1).unwrap();
        assert_eq!(snap.status, StepStatus::Running);
        assert_eq!(snap.started_at, Some(t1));
        assert!(snap.ended_at.is_none());
    }

    #[test]
    fn test_review_ends_done_not_error() {
        let mut registry = StepRegistry::new();
        let t0 = Utc::now();
        registry.mark_review(StepId::ReviewScript, t0).unwrap();
        let snap = registry.snapshot(StepId::ReviewScript, t0).unwrap();
        assert_eq!(snap.status, StepStatus::Review);

        registry
            .mark_done(StepId::ReviewScript, t0 + Duration::seconds(120))
            .unwrap();
        let snap = registry
            .snapshot(StepId::ReviewScript, t0 + Duration::seconds(120))
            .unwrap();
        assert_eq!(snap.status, StepStatus::Done);
        assert_eq!(snap.duration_s, Some(120.0));
    }

    #[test]
    fn test_terminal_count_tracks_done_and_error() {
        let mut registry = StepRegistry::new();
        let now = Utc::now();
        registry.mark_running(StepId::Research, now).unwrap();
        assert_eq!(registry.terminal_count(), 0);

        registry.mark_done(StepId::Research, now).unwrap();
        registry.mark_running(StepId::Ideation, now).unwrap();
        registry.mark_error(StepId::Ideation, now).unwrap();
        assert_eq!(registry.terminal_count(), 2);
    }

    #[test]
    fn test_reset_returns_all_to_pending() {
        let mut registry = StepRegistry::new();
        let now = Utc::now();
        registry.mark_running(StepId::Research, now).unwrap();
        registry.mark_done(StepId::Research, now).unwrap();

        registry.reset();
        let snap = registry.snapshot(StepId::Research, now).unwrap();
        assert_eq!(snap.status, StepStatus::Pending);
        assert_eq!(registry.terminal_count(), 0);
    }
}
