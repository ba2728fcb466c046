//! Job lifecycle states and the remote-status mapping.
//!
//! The remote service reports job status as a bare string. The documented
//! vocabulary is `WAIT`, `RUN`, `DONE`, and `FAIL`, but the service has
//! introduced labels it does not document, so the mapping is data, not
//! code: [`StatusMap`] carries the defaults and accepts caller extensions.
//! Anything unrecognized maps to [`JobState::Processing`] and is non-fatal.

// ---------------------------------------------------------------------------
// Remote status constants
// ---------------------------------------------------------------------------

/// Job is queued on the remote side.
pub const REMOTE_STATUS_WAIT: &str = "WAIT";
/// Job is actively generating.
pub const REMOTE_STATUS_RUN: &str = "RUN";
/// Job finished successfully; result files are available.
pub const REMOTE_STATUS_DONE: &str = "DONE";
/// Job failed; an error code and message accompany this status.
pub const REMOTE_STATUS_FAIL: &str = "FAIL";

// ---------------------------------------------------------------------------
// Job state
// ---------------------------------------------------------------------------

/// Internal lifecycle state of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum JobState {
    Queued,
    Processing,
    Generating,
    Finalizing,
    Succeeded,
    Failed,
    TimedOut,
}

impl JobState {
    /// Whether the job can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::TimedOut)
    }

    /// Human-readable label for progress output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Queued => "Waiting in queue",
            Self::Processing => "Processing",
            Self::Generating => "Generating 3D model",
            Self::Finalizing => "Finalizing",
            Self::Succeeded => "Completed",
            Self::Failed => "Failed",
            Self::TimedOut => "Timed out",
        }
    }
}

// ---------------------------------------------------------------------------
// Status map
// ---------------------------------------------------------------------------

/// Mapping from remote status strings to [`JobState`].
///
/// `StatusMap::default()` covers the documented vocabulary; callers add
/// entries with [`with_entry`](Self::with_entry) when the service starts
/// reporting new labels. Lookups of unknown strings return
/// [`JobState::Processing`].
#[derive(Debug, Clone)]
pub struct StatusMap {
    entries: Vec<(String, JobState)>,
}

impl Default for StatusMap {
    fn default() -> Self {
        Self {
            entries: vec![
                (REMOTE_STATUS_WAIT.to_string(), JobState::Queued),
                (REMOTE_STATUS_RUN.to_string(), JobState::Generating),
                (REMOTE_STATUS_DONE.to_string(), JobState::Succeeded),
                (REMOTE_STATUS_FAIL.to_string(), JobState::Failed),
            ],
        }
    }
}

impl StatusMap {
    /// Add or override a mapping entry.
    pub fn with_entry(mut self, remote: impl Into<String>, state: JobState) -> Self {
        let remote = remote.into();
        if let Some(entry) = self.entries.iter_mut().find(|(r, _)| *r == remote) {
            entry.1 = state;
        } else {
            self.entries.push((remote, state));
        }
        self
    }

    /// Resolve a remote status string to an internal state.
    ///
    /// Unknown strings resolve to [`JobState::Processing`] so a new remote
    /// label never breaks an in-flight poll.
    pub fn resolve(&self, remote: &str) -> JobState {
        self.entries
            .iter()
            .find(|(r, _)| r == remote)
            .map(|(_, state)| *state)
            .unwrap_or(JobState::Processing)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
