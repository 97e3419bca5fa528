//! FusionBrain pipeline API: discover a pipeline, run it with multipart params, poll the run by uuid.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::{endpoint, read_json, read_status_json, JobProvider};
use crate::error::{GenerationError, Result, TransportError};
use crate::job::{Artifact, JobHandle, PollResult};
use crate::poller::PollPolicy;
use crate::request::GenerationRequest;

pub const FUSIONBRAIN_BASE_URL: &str = "https://api-key.fusionbrain.ai/key/api/v1/";

const STATUS_DONE: &str = "DONE";
const STATUS_FAIL: &str = "FAIL";

#[derive(Debug, Deserialize)]
struct PipelineEntry {
    id: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    result: Option<RunResult>,
    #[serde(default, rename = "errorDescription")]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunResult {
    #[serde(default)]
    files: Vec<String>,
}

/// Client for the FusionBrain (Kandinsky) pipeline API.
pub struct FusionBrainProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    cache_pipeline: bool,
    cached_pipeline: RwLock<Option<String>>,
}

impl FusionBrainProvider {
    pub fn new(http: reqwest::Client, api_key: String, api_secret: String) -> Self {
        Self {
            http,
            base_url: FUSIONBRAIN_BASE_URL.to_string(),
            api_key,
            api_secret,
            cache_pipeline: false,
            cached_pipeline: RwLock::new(None),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Keep the first discovered pipeline id instead of re-resolving it for every job.
    pub fn with_pipeline_cache(mut self, enabled: bool) -> Self {
        self.cache_pipeline = enabled;
        self
    }

    fn auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Key", format!("Key {}", self.api_key))
            .header("X-Secret", format!("Secret {}", self.api_secret))
    }

    /// Returns the id of the first listed pipeline.
    #[instrument(skip(self))]
    pub async fn resolve_pipeline(&self) -> Result<String> {
        if self.cache_pipeline {
            if let Some(id) = self.cached_pipeline.read().await.as_ref() {
                debug!(pipeline_id = %id, "Using cached pipeline");
                return Ok(id.clone());
            }
        }

        let response = self
            .auth(self.http.get(endpoint(&self.base_url, "pipelines")))
            .send()
            .await
            .map_err(|e| GenerationError::Discovery(e.to_string()))?;
        let pipelines: Vec<PipelineEntry> = read_json(response, GenerationError::Discovery).await?;

        let id = match pipelines.first().map(|p| &p.id) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(GenerationError::Discovery(format!(
                    "unexpected pipeline id: {}",
                    other
                )))
            }
            None => return Err(GenerationError::Discovery("no pipelines listed".into())),
        };

        info!(pipeline_id = %id, "Pipeline resolved");
        if self.cache_pipeline {
            *self.cached_pipeline.write().await = Some(id.clone());
        }
        Ok(id)
    }

    fn run_params(request: &GenerationRequest) -> serde_json::Value {
        let mut params = json!({
            "type": "GENERATE",
            "numImages": request.num_images,
            "width": request.width,
            "height": request.height,
            "generateParams": {
                "query": request.prompt
            }
        });
        if let Some(negative) = &request.negative_prompt {
            params["negativePromptDecoder"] = json!(negative);
        }
        params
    }
}

#[async_trait]
impl JobProvider for FusionBrainProvider {
    fn name(&self) -> &'static str {
        "fusionbrain"
    }

    fn default_policy(&self) -> PollPolicy {
        PollPolicy::new(10, Duration::from_secs(10))
    }

    #[instrument(skip(self, request))]
    async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle> {
        request.validate()?;
        let pipeline_id = self.resolve_pipeline().await?;

        let params = Part::text(Self::run_params(request).to_string())
            .mime_str("application/json")
            .map_err(|e| GenerationError::Submission(e.to_string()))?;
        let form = Form::new()
            .text("pipeline_id", pipeline_id.clone())
            .part("params", params);

        let response = self
            .auth(self.http.post(endpoint(&self.base_url, "pipeline/run")))
            .multipart(form)
            .send()
            .await
            .map_err(|e| GenerationError::Submission(e.to_string()))?;
        let run: RunResponse = read_json(response, GenerationError::Submission).await?;

        let uuid = run
            .uuid
            .filter(|u| !u.is_empty())
            .ok_or_else(|| GenerationError::Submission("response has no uuid".into()))?;
        info!(pipeline_id = %pipeline_id, uuid = %uuid, "Generation started");
        Ok(JobHandle::Pipeline { pipeline_id, uuid })
    }

    async fn status(&self, handle: &JobHandle) -> std::result::Result<PollResult, TransportError> {
        let uuid = match handle {
            JobHandle::Pipeline { uuid, .. } => uuid,
            other => {
                return Err(TransportError::fatal(format!(
                    "handle {} was not issued by fusionbrain",
                    other
                )))
            }
        };

        let response = self
            .auth(
                self.http
                    .get(endpoint(&self.base_url, &format!("pipeline/status/{}", uuid))),
            )
            .send()
            .await?;
        let body: StatusResponse = read_status_json(response).await?;
        debug!(uuid = %uuid, status = %body.status, "Status received");

        Ok(match body.status.as_str() {
            STATUS_DONE => PollResult::Done(
                body.result
                    .map(|r| r.files)
                    .unwrap_or_default()
                    .into_iter()
                    .map(Artifact::from_file_entry)
                    .collect(),
            ),
            STATUS_FAIL => {
                let reason = body
                    .error_description
                    .unwrap_or_else(|| "generation failed".to_string());
                warn!(uuid = %uuid, reason = %reason, "Generation failed");
                PollResult::Failed(reason)
            }
            _ => PollResult::Pending,
        })
    }
}
