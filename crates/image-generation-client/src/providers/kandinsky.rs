//! Kandinsky text2image API: JSON task submission, status by task id, base64 images in the result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{endpoint, read_json, read_status_json, JobProvider};
use crate::error::{GenerationError, Result, TransportError};
use crate::job::{Artifact, JobHandle, PollResult};
use crate::poller::PollPolicy;
use crate::request::GenerationRequest;

pub const KANDINSKY_BASE_URL: &str = "https://api.kandinsky.ai/v1/";

const STATUS_DONE: &str = "DONE";
const STATUS_FAILED: &str = "FAILED";

#[derive(Debug, Serialize)]
struct RunPayload<'a> {
    prompt: &'a str,
    negative_prompt: &'a str,
    width: u32,
    height: u32,
    num_images: u32,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the Kandinsky text2image task API.
pub struct KandinskyProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl KandinskyProvider {
    pub fn new(http: reqwest::Client, api_key: String, api_secret: String) -> Self {
        Self {
            http,
            base_url: KANDINSKY_BASE_URL.to_string(),
            api_key,
            api_secret,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-API-KEY", &self.api_key)
            .header("X-API-SECRET", &self.api_secret)
    }
}

#[async_trait]
impl JobProvider for KandinskyProvider {
    fn name(&self) -> &'static str {
        "kandinsky"
    }

    fn default_policy(&self) -> PollPolicy {
        PollPolicy::new(30, Duration::from_secs(2))
    }

    #[instrument(skip(self, request))]
    async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle> {
        request.validate()?;
        let payload = RunPayload {
            prompt: &request.prompt,
            negative_prompt: request.negative_prompt.as_deref().unwrap_or(""),
            width: request.width,
            height: request.height,
            num_images: request.num_images,
        };

        let response = self
            .auth(self.http.post(endpoint(&self.base_url, "text2image/run")))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GenerationError::Submission(e.to_string()))?;
        let run: RunResponse = read_json(response, GenerationError::Submission).await?;

        let task_id = run
            .task_id
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GenerationError::Submission("response has no task_id".into()))?;
        info!(task_id = %task_id, "Task created");
        Ok(JobHandle::Task { task_id })
    }

    async fn status(&self, handle: &JobHandle) -> std::result::Result<PollResult, TransportError> {
        let task_id = match handle {
            JobHandle::Task { task_id } => task_id,
            other => {
                return Err(TransportError::fatal(format!(
                    "handle {} was not issued by kandinsky",
                    other
                )))
            }
        };

        let response = self
            .auth(self.http.get(endpoint(
                &self.base_url,
                &format!("text2image/status/{}", task_id),
            )))
            .send()
            .await?;
        let body: StatusResponse = read_status_json(response).await?;
        debug!(task_id = %task_id, status = ?body.status, "Status received");

        Ok(match body.status.as_deref() {
            Some(STATUS_DONE) => {
                PollResult::Done(body.images.into_iter().map(Artifact::from_file_entry).collect())
            }
            Some(STATUS_FAILED) => {
                let reason = body.error.unwrap_or_else(|| "task failed".to_string());
                warn!(task_id = %task_id, reason = %reason, "Task failed");
                PollResult::Failed(reason)
            }
            _ => PollResult::Pending,
        })
    }
}
