//! Fixed-interval poll loop for asynchronous generation jobs.
//!
//! The loop queries the job on an interval until it reaches a terminal
//! state, the caller's deadline elapses, or the host cancels. Remote
//! status strings are mapped through the configurable
//! [`StatusMap`](hy3d_core::status::StatusMap); progress is reported only
//! on observed state changes.
//!
//! The status endpoint sits behind the [`JobStatusSource`] trait so tests
//! can drive the loop with scripted sequences.

use std::time::Duration;

use async_trait::async_trait;
use hy3d_core::progress::{estimate_percent, ProgressUpdate};
use hy3d_core::status::{JobState, StatusMap};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::{Hunyuan3dApi, JobStatus};
use crate::error::ClientError;

/// Default delay between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default polling deadline.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);

/// Source of job status snapshots — the real API or a scripted test double.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn query_status(&self, job_id: &str) -> Result<JobStatus, ClientError>;
}

#[async_trait]
impl JobStatusSource for Hunyuan3dApi {
    async fn query_status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        self.query(job_id).await
    }
}

/// Tunable parameters for one poll run.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between consecutive status queries.
    pub interval: Duration,
    /// Deadline for reaching a terminal state. The remote job keeps
    /// running past this — only local waiting stops.
    pub max_wait: Duration,
    /// Remote-status vocabulary mapping.
    pub status_map: StatusMap,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            status_map: StatusMap::default(),
        }
    }
}

/// Result of a successful poll run.
#[derive(Debug)]
pub struct PolledJob {
    /// The final `DONE` status snapshot, including result files.
    pub final_status: JobStatus,
    /// Wall-clock time spent polling.
    pub elapsed: Duration,
}

/// Poll a job until it succeeds, fails, or the deadline passes.
///
/// Returns `Ok(Some(_))` with the final snapshot on success, `Ok(None)`
/// when the cancellation token fires (polling stops locally; the remote
/// job is left alone), or an error:
///
/// * [`ClientError::RemoteJobFailed`] when the job reaches `Failed` — no
///   further queries are issued and no retry is attempted;
/// * [`ClientError::PollTimeout`] once `config.max_wait` elapses.
///
/// `on_progress` is invoked once per observed state transition.
pub async fn poll_job(
    source: &impl JobStatusSource,
    job_id: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
    mut on_progress: impl FnMut(ProgressUpdate),
) -> Result<Option<PolledJob>, ClientError> {
    let started = Instant::now();
    let mut last_state: Option<JobState> = None;
    let mut state_entered = started;

    loop {
        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(job_id, "Polling cancelled by host");
                return Ok(None);
            }
            result = source.query_status(job_id) => result?,
        };

        let state = config.status_map.resolve(&status.status);

        if last_state != Some(state) {
            if last_state.is_some() {
                state_entered = Instant::now();
            }
            if state == JobState::Processing && !status.status.is_empty() {
                // Unknown labels land here; keep a trace of what the
                // service actually said.
                tracing::debug!(job_id, remote_status = %status.status, "Remote status observed");
            }

            if state != JobState::Failed {
                let update = ProgressUpdate {
                    state,
                    percent: estimate_percent(
                        state,
                        started.elapsed(),
                        state_entered.elapsed(),
                        config.max_wait,
                    ),
                };
                tracing::info!(
                    job_id,
                    state = ?update.state,
                    percent = update.percent,
                    "Job state changed",
                );
                on_progress(update);
            }
            last_state = Some(state);
        }

        match state {
            JobState::Succeeded => {
                let elapsed = started.elapsed();
                tracing::info!(job_id, elapsed_secs = elapsed.as_secs(), "Job completed");
                return Ok(Some(PolledJob {
                    final_status: status,
                    elapsed,
                }));
            }
            JobState::Failed => {
                let code = status.error_code.unwrap_or_default();
                let message = status.error_message.unwrap_or_default();
                tracing::error!(job_id, code = %code, message = %message, "Job failed remotely");
                return Err(ClientError::RemoteJobFailed { code, message });
            }
            _ => {}
        }

        if started.elapsed() >= config.max_wait {
            return Err(ClientError::PollTimeout {
                waited: started.elapsed(),
            });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(job_id, "Polling cancelled by host");
                return Ok(None);
            }
            _ = tokio::time::sleep(config.interval) => {}
        }

        if started.elapsed() >= config.max_wait {
            return Err(ClientError::PollTimeout {
                waited: started.elapsed(),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
