//! End-to-end generation orchestration.
//!
//! One call runs the whole pipeline: validate and submit, poll to a
//! terminal state, pick the GLB result, download it, persist it, and
//! apply retention. The poll loop blocks the calling task; the host's
//! cancellation token stops it locally without touching the remote job.

use std::time::Duration;

use hy3d_client::{
    download, poll_job, GenerationEvent, Hunyuan3dApi, JobHandle, PollConfig,
};
use hy3d_core::request::{GenerationInput, GenerationRequest};
use hy3d_core::retention::RetentionPolicy;
use hy3d_store::{enforce_retention, Artifact, ArtifactStore};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::NodeConfig;
use crate::error::NodeError;

/// What a successful generation hands back to the host.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// Remote job identifier, useful for support tickets.
    pub job_id: String,
    /// The artifact written to the output directory.
    pub artifact: Artifact,
    /// Total wall-clock time from submission to persisted file.
    pub elapsed: Duration,
}

/// Long-lived generation front end: one API client, one output store.
#[derive(Debug)]
pub struct Generator {
    api: Hunyuan3dApi,
    http: reqwest::Client,
    store: ArtifactStore,
    poll: PollConfig,
    retention: RetentionPolicy,
}

impl Generator {
    /// Build a generator from host configuration.
    ///
    /// Validates credentials/region and creates the output directory;
    /// no network traffic happens here.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let http = reqwest::Client::new();
        let api = Hunyuan3dApi::with_client(http.clone(), config.credentials, config.region)?;
        let store = ArtifactStore::open(config.output_dir)?;
        Ok(Self {
            api,
            http,
            store,
            poll: config.poll,
            retention: config.retention,
        })
    }

    /// The artifact store backing this generator.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run one generation request to completion.
    ///
    /// `on_event` receives [`GenerationEvent`]s as the request advances;
    /// state-change events fire once per observed transition. On host
    /// cancellation the call returns [`NodeError::Cancelled`] and the
    /// remote job is left running.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
        mut on_event: impl FnMut(GenerationEvent),
    ) -> Result<GenerationOutcome, NodeError> {
        let started = Instant::now();

        let JobHandle { job_id } = self.api.submit(request).await?;
        on_event(GenerationEvent::Submitted {
            job_id: job_id.clone(),
        });

        let polled = match poll_job(&self.api, &job_id, &self.poll, cancel, |update| {
            on_event(GenerationEvent::StateChanged {
                job_id: job_id.clone(),
                update,
            })
        })
        .await
        {
            Ok(Some(polled)) => polled,
            Ok(None) => return Err(NodeError::Cancelled),
            Err(e) => {
                if let Some(hint) = e.hint() {
                    tracing::error!(job_id = %job_id, hint, "Generation failed remotely");
                }
                return Err(e.into());
            }
        };

        let url = polled
            .final_status
            .glb_url()
            .ok_or_else(|| NodeError::MissingGlb {
                job_id: job_id.clone(),
            })?
            .to_string();
        on_event(GenerationEvent::Downloading {
            job_id: job_id.clone(),
            url: url.clone(),
        });

        let bytes = download(&self.http, &url).await?;

        let content_key: &[u8] = match &request.input {
            GenerationInput::Text { prompt } => prompt.as_bytes(),
            GenerationInput::Image { payload } => payload.as_bytes(),
        };
        let artifact = self
            .store
            .write(request.input.slug_source(), content_key, &bytes)?;

        // The fresh artifact is safely on disk; cleanup problems are the
        // report's business, not the caller's.
        let report = enforce_retention(&self.store, &self.retention);
        if !report.errors.is_empty() {
            tracing::warn!(
                errors = report.errors.len(),
                "Retention reported errors after generation",
            );
        }

        on_event(GenerationEvent::Completed {
            job_id: job_id.clone(),
            path: artifact.path.clone(),
        });

        Ok(GenerationOutcome {
            job_id,
            artifact,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use hy3d_client::ClientError;
    use hy3d_core::credentials::Credentials;

    fn generator(dir: &std::path::Path) -> Generator {
        Generator::new(NodeConfig::new(Credentials::new("id", "key"), dir)).unwrap()
    }

    #[test]
    fn constructor_creates_output_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("models");
        let _ = generator(&out);
        assert!(out.is_dir());
    }

    #[test]
    fn constructor_rejects_empty_credentials() {
        let tmp = tempfile::tempdir().unwrap();
        let result = Generator::new(NodeConfig::new(Credentials::new("", ""), tmp.path()));
        assert_matches!(
            result,
            Err(NodeError::Client(ClientError::Submission(_)))
        );
    }

    #[tokio::test]
    async fn invalid_face_count_rejected_before_any_network_call() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = generator(tmp.path());
        let cancel = CancellationToken::new();

        let mut request = GenerationRequest::text("a chair");
        request.face_count = 10; // far below the documented minimum

        let result = generator.generate(&request, &cancel, |_| {}).await;
        assert_matches!(
            result,
            Err(NodeError::Client(ClientError::Submission(msg))) if msg.contains("face_count")
        );
    }

    #[tokio::test]
    async fn empty_prompt_rejected_before_any_network_call() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = generator(tmp.path());
        let cancel = CancellationToken::new();

        let result = generator
            .generate(&GenerationRequest::text("   "), &cancel, |_| {})
            .await;
        assert_matches!(result, Err(NodeError::Client(ClientError::Submission(_))));
    }
}
