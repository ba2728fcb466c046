//! Configuration passed in by the host.
//!
//! All state the plugin core needs — credentials, output path, timing —
//! arrives through this struct at call time. Nothing is read from
//! ambient process state, which keeps the poller and retention logic
//! independently testable.

use std::path::PathBuf;
use std::time::Duration;

use hy3d_core::credentials::{Credentials, DEFAULT_REGION};
use hy3d_core::error::CoreError;
use hy3d_core::retention::RetentionPolicy;
use hy3d_client::PollConfig;

/// Smallest accepted polling deadline, in seconds.
pub const MAX_WAIT_MIN_SECS: u64 = 60;
/// Largest accepted polling deadline, in seconds.
pub const MAX_WAIT_MAX_SECS: u64 = 3600;
/// Default polling deadline, in seconds.
pub const MAX_WAIT_DEFAULT_SECS: u64 = 600;

/// Validate a polling deadline against the host widget's range.
pub fn validate_max_wait(secs: u64) -> Result<(), CoreError> {
    if !(MAX_WAIT_MIN_SECS..=MAX_WAIT_MAX_SECS).contains(&secs) {
        return Err(CoreError::Validation(format!(
            "max_wait {secs}s out of range [{MAX_WAIT_MIN_SECS}, {MAX_WAIT_MAX_SECS}]"
        )));
    }
    Ok(())
}

/// Everything a [`Generator`](crate::Generator) needs, supplied explicitly
/// by the host.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub credentials: Credentials,
    pub region: String,
    /// Directory generated models are written to.
    pub output_dir: PathBuf,
    pub poll: PollConfig,
    pub retention: RetentionPolicy,
}

impl NodeConfig {
    /// Build a config with documented defaults for region, polling, and
    /// retention.
    pub fn new(credentials: Credentials, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            credentials,
            region: DEFAULT_REGION.to_string(),
            output_dir: output_dir.into(),
            poll: PollConfig::default(),
            retention: RetentionPolicy::default(),
        }
    }

    /// Override the polling deadline.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.poll.max_wait = max_wait;
        self
    }
}
