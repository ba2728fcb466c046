//! HTTP client for the Tencent Hunyuan 3D Global API.
//!
//! Submits generation jobs, polls them to a terminal state, and downloads
//! the resulting GLB bytes. Request signing (TC3-HMAC-SHA256) is
//! implemented in [`auth`]; the poll loop lives in [`poller`] behind a
//! status-source trait so it can be driven by scripted sequences in tests.

pub mod api;
pub mod auth;
pub mod download;
pub mod error;
pub mod events;
pub mod image;
pub mod poller;

pub use api::{Hunyuan3dApi, JobHandle, JobStatus, ResultFile};
pub use download::download;
pub use error::ClientError;
pub use events::GenerationEvent;
pub use poller::{poll_job, JobStatusSource, PollConfig, PolledJob};
