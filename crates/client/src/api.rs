//! REST client for the Hunyuan 3D Global API.
//!
//! Wraps the two job endpoints (`SubmitHunyuanTo3DProJob`,
//! `QueryHunyuanTo3DProJob`) using [`reqwest`], with TC3 signing from
//! [`crate::auth`]. The remote reports call-level errors inside an HTTP
//! 200 envelope, so both layers are checked here.

use chrono::Utc;
use hy3d_core::credentials::{validate_region, Credentials};
use hy3d_core::request::{GenerateType, GenerationInput, GenerationRequest};
use serde::Deserialize;

use crate::auth::{sign_request, CONTENT_TYPE};
use crate::error::ClientError;

/// API endpoint host for the Global (international) service.
pub const ENDPOINT: &str = "hunyuan.intl.tencentcloudapi.com";
/// Service segment of the TC3 credential scope.
pub const SERVICE: &str = "hunyuan";
/// API version header value.
pub const API_VERSION: &str = "2023-09-01";
/// Action submitting a new generation job.
pub const ACTION_SUBMIT: &str = "SubmitHunyuanTo3DProJob";
/// Action querying an existing job.
pub const ACTION_QUERY: &str = "QueryHunyuanTo3DProJob";

/// Result file type identifying the GLB asset among a job's outputs.
pub const RESULT_TYPE_GLB: &str = "GLB";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Handle for a submitted job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    /// Server-assigned opaque job identifier.
    pub job_id: String,
}

/// One output file of a finished job.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultFile {
    /// File format label, e.g. `"GLB"` or `"OBJ"`.
    #[serde(rename = "Type", default)]
    pub file_type: String,
    /// Download URL for the file.
    #[serde(rename = "Url", default)]
    pub url: String,
    /// Optional rendered preview image.
    #[serde(rename = "PreviewImageUrl", default)]
    pub preview_image_url: Option<String>,
}

/// Snapshot of a job returned by the query endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobStatus {
    /// Remote status string (`WAIT`, `RUN`, `DONE`, `FAIL`, ...).
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Remote error code, present when the job failed.
    #[serde(rename = "ErrorCode", default)]
    pub error_code: Option<String>,
    /// Remote error message, present when the job failed.
    #[serde(rename = "ErrorMessage", default)]
    pub error_message: Option<String>,
    /// Output files, present once the job is done.
    #[serde(rename = "ResultFile3Ds", default)]
    pub result_files: Vec<ResultFile>,
}

impl JobStatus {
    /// URL of the GLB result file, if the job produced one.
    pub fn glb_url(&self) -> Option<&str> {
        self.result_files
            .iter()
            .find(|f| f.file_type == RESULT_TYPE_GLB)
            .map(|f| f.url.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "JobId")]
    job_id: String,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Hunyuan 3D Global API.
#[derive(Debug)]
pub struct Hunyuan3dApi {
    client: reqwest::Client,
    credentials: Credentials,
    region: String,
}

impl Hunyuan3dApi {
    /// Create a client for the given credentials and region.
    ///
    /// Fails with [`ClientError::Submission`] when the credentials or
    /// region are malformed — nothing is sent over the network here.
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), credentials, region)
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across components).
    pub fn with_client(
        client: reqwest::Client,
        credentials: Credentials,
        region: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let region = region.into();
        credentials
            .validate()
            .map_err(|e| ClientError::Submission(e.to_string()))?;
        validate_region(&region).map_err(|e| ClientError::Submission(e.to_string()))?;

        tracing::debug!(
            region = %region,
            secret_key = %credentials.key_hint(),
            "Initialized Hunyuan 3D API client",
        );

        Ok(Self {
            client,
            credentials,
            region,
        })
    }

    /// Submit a generation job.
    ///
    /// The request is validated locally first; invalid parameters never
    /// reach the network. Returns the server-assigned [`JobHandle`].
    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, ClientError> {
        request
            .validate()
            .map_err(|e| ClientError::Submission(e.to_string()))?;

        let params = submit_params(request);
        tracing::info!(
            kind = request.input.kind(),
            face_count = request.face_count,
            generate_type = request.generate_type.as_str(),
            enable_pbr = request.enable_pbr,
            "Submitting generation job",
        );

        let response: SubmitResponse = self.call(ACTION_SUBMIT, &params).await?;
        tracing::info!(job_id = %response.job_id, "Job submitted");

        Ok(JobHandle {
            job_id: response.job_id,
        })
    }

    /// Query the current status of a job.
    pub async fn query(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        let params = serde_json::json!({ "JobId": job_id });
        let status: JobStatus = self.call(ACTION_QUERY, &params).await?;
        tracing::debug!(job_id, status = %status.status, "Job status queried");
        Ok(status)
    }

    // ---- private helpers ----

    /// Sign and POST one API action, returning the decoded `Response` body.
    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        payload: &serde_json::Value,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_string(payload)?;
        let timestamp = Utc::now().timestamp();
        let signed = sign_request(
            &self.credentials,
            ENDPOINT,
            SERVICE,
            action,
            &body,
            timestamp,
        );

        let response = self
            .client
            .post(format!("https://{ENDPOINT}/"))
            .header("Authorization", signed.authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", ENDPOINT)
            .header("X-TC-Action", action)
            .header("X-TC-Version", API_VERSION)
            .header("X-TC-Timestamp", signed.timestamp.to_string())
            .header("X-TC-Region", &self.region)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope = response.json().await?;
        decode_response(envelope.response, status.as_u16())
    }
}

/// Check a `Response` envelope for a structured remote error, then decode
/// the expected body type.
fn decode_response<T: serde::de::DeserializeOwned>(
    response: serde_json::Value,
    http_status: u16,
) -> Result<T, ClientError> {
    if let Some(err) = response.get("Error") {
        let code = err
            .get("Code")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string();
        let message = err
            .get("Message")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        return Err(ClientError::RemoteCall { code, message });
    }

    serde_json::from_value(response).map_err(|e| ClientError::Api {
        status: http_status,
        body: format!("unexpected response shape: {e}"),
    })
}

/// Build the submit payload for a request.
///
/// `PolygonType` is only sent for low-poly generation — the remote rejects
/// it on other modes.
fn submit_params(request: &GenerationRequest) -> serde_json::Value {
    let mut params = serde_json::json!({
        "EnablePBR": request.enable_pbr,
        "FaceCount": request.face_count,
        "GenerateType": request.generate_type.as_str(),
    });

    match &request.input {
        GenerationInput::Text { prompt } => {
            params["Prompt"] = serde_json::Value::from(prompt.as_str());
        }
        GenerationInput::Image { payload } => {
            params["ImageBase64"] = serde_json::Value::from(payload.as_str());
        }
    }

    if request.generate_type == GenerateType::LowPoly {
        params["PolygonType"] = serde_json::Value::from(request.polygon_type.as_str());
    }

    params
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
