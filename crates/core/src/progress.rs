//! Progress estimation for polled jobs.
//!
//! The remote service reports status but no percentage, so progress is
//! estimated from elapsed time: the queue phase ramps to 10%, generation
//! ramps from 10% toward 95% against a nominal generation duration, and
//! any other non-terminal phase holds at 95%.

use std::time::Duration;

use crate::status::JobState;

/// Share of the bar reserved for the queue phase.
pub const QUEUE_PHASE_PERCENT: f32 = 10.0;
/// Nominal wall-clock duration of the generation phase.
pub const NOMINAL_GENERATION_SECS: f32 = 150.0;
/// Percent reported for non-terminal states after generation.
pub const LATE_PHASE_PERCENT: f32 = 95.0;

/// A progress notification emitted on a job state change.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ProgressUpdate {
    pub state: JobState,
    /// Estimated completion percentage in `[0, 100]`.
    pub percent: f32,
}

impl ProgressUpdate {
    /// Human-readable label for the current state.
    pub fn label(&self) -> &'static str {
        self.state.label()
    }
}

/// Estimate completion percentage for a job.
///
/// * `elapsed` — time since the poll began.
/// * `in_state` — time spent in the current state.
/// * `max_wait` — the caller's polling deadline (bounds the queue ramp).
pub fn estimate_percent(
    state: JobState,
    elapsed: Duration,
    in_state: Duration,
    max_wait: Duration,
) -> f32 {
    match state {
        JobState::Queued => {
            let budget = max_wait.as_secs_f32().max(1.0);
            (elapsed.as_secs_f32() / budget * QUEUE_PHASE_PERCENT).min(QUEUE_PHASE_PERCENT)
        }
        JobState::Generating => {
            let ramp = (in_state.as_secs_f32() / NOMINAL_GENERATION_SECS)
                * (LATE_PHASE_PERCENT - QUEUE_PHASE_PERCENT);
            QUEUE_PHASE_PERCENT + ramp.min(LATE_PHASE_PERCENT - QUEUE_PHASE_PERCENT)
        }
        JobState::Processing | JobState::Finalizing => LATE_PHASE_PERCENT,
        JobState::Succeeded => 100.0,
        // Terminal failures carry an error, not a meaningful percentage.
        JobState::Failed | JobState::TimedOut => 0.0,
    }
}
