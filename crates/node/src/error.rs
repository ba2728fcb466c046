//! Errors surfaced to the host runtime.

use std::path::PathBuf;

use hy3d_client::ClientError;
use hy3d_store::StoreError;

/// Everything that can stop a generation request, surfaced with enough
/// detail for the host to render without consulting logs. Retention
/// cleanup failures are deliberately absent — they are logged and
/// swallowed, never raised.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Submission, polling, or download failure from the API client.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Writing the artifact to the output directory failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The job succeeded but reported no GLB result file.
    #[error("Job {job_id} completed without a GLB result file")]
    MissingGlb { job_id: String },

    /// The host cancelled the request; polling stopped locally and the
    /// remote job was left running.
    #[error("Generation cancelled by host")]
    Cancelled,

    /// The batch input directory could not be read.
    #[error("Failed to read batch input directory {path}: {source}")]
    BatchInput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The batch input directory contains no supported images.
    #[error("No supported images found in {path}")]
    EmptyBatch { path: PathBuf },
}
