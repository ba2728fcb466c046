//! Events emitted over the lifetime of a generation request.
//!
//! These represent the state changes the host cares about. They are
//! produced by the poller and the node facade and delivered through a
//! caller-supplied observer, so the host decides how to render them.

use std::path::PathBuf;

use hy3d_core::progress::ProgressUpdate;
use serde::Serialize;

/// A host-visible event for one generation request.
#[derive(Debug, Clone, Serialize)]
pub enum GenerationEvent {
    /// The job was accepted by the remote service.
    Submitted { job_id: String },

    /// The polled job changed state. Emitted once per observed state
    /// transition, never per poll tick.
    StateChanged {
        job_id: String,
        update: ProgressUpdate,
    },

    /// The result file is being downloaded.
    Downloading { job_id: String, url: String },

    /// The artifact was written to the output directory.
    Completed { job_id: String, path: PathBuf },
}
