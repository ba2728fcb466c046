//! Error taxonomy for the remote API client.
//!
//! Every surfaced error carries enough context (remote code/message, HTTP
//! status, elapsed time) for the host to diagnose without reading logs.
//! Cleanup errors are deliberately absent here — they belong to the store
//! crate and are never allowed to fail a generation.

use std::time::Duration;

/// Errors from the Hunyuan 3D API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Bad input or credentials, rejected before (or by) submission.
    /// Never retried.
    #[error("Submission rejected: {0}")]
    Submission(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The remote API returned a non-2xx status or an unreadable envelope.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The remote API returned a structured error for a call.
    #[error("Remote API error [{code}]: {message}")]
    RemoteCall { code: String, message: String },

    /// The job itself reached the `Failed` state. Surfaced verbatim with
    /// the remote code/message; resubmission is the caller's decision.
    #[error("Remote job failed [{code}]: {message}")]
    RemoteJobFailed { code: String, message: String },

    /// The polling deadline elapsed before a terminal state. The remote
    /// job is left running — no cancellation is issued.
    #[error("Job did not reach a terminal state within {:.0}s", .waited.as_secs_f64())]
    PollTimeout { waited: Duration },

    /// Fetching the result bytes failed with an HTTP error status.
    #[error("Download failed ({status}): {detail}")]
    Download { status: u16, detail: String },
}

impl ClientError {
    /// One-line operator hint for well-known remote error codes, used when
    /// logging a [`ClientError::RemoteJobFailed`] or
    /// [`ClientError::RemoteCall`].
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RemoteJobFailed { code, .. } | Self::RemoteCall { code, .. } => {
                remote_error_hint(code)
            }
            _ => None,
        }
    }
}

/// Map a remote error code to a short remediation hint.
pub fn remote_error_hint(code: &str) -> Option<&'static str> {
    match code {
        "ResourceInsufficient" => Some(
            "account quota or balance exhausted — check the cloud console billing page",
        ),
        "AuthFailure" => Some(
            "credentials rejected — verify the Secret ID/Key belong to the Global API",
        ),
        "LimitExceeded" => Some("API call rate limit hit — wait a few minutes and retry"),
        "InvalidParameter" => Some(
            "request parameters rejected — face_count must be 40000-1500000, generate_type Normal/LowPoly/Geometry/Sketch",
        ),
        _ => None,
    }
}
