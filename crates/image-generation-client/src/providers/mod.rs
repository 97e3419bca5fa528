//! Asynchronous text-to-image providers: submit a job, then answer status queries for it.

mod fusionbrain;
mod kandinsky;

pub use fusionbrain::{FusionBrainProvider, FUSIONBRAIN_BASE_URL};
pub use kandinsky::{KandinskyProvider, KANDINSKY_BASE_URL};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{preview, Result, TransportError};
use crate::job::{JobHandle, PollResult};
use crate::poller::PollPolicy;
use crate::request::GenerationRequest;

/// A provider that performs generation out-of-band.
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Attempt budget and interval used when the configuration does not override them.
    fn default_policy(&self) -> PollPolicy;

    /// Sends the generation request; one outbound call (plus discovery where the provider needs it), no retries.
    async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle>;

    /// Queries the job status once.
    async fn status(&self, handle: &JobHandle) -> std::result::Result<PollResult, TransportError>;
}

/// Joins a base URL and a relative path with exactly one slash between them.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Reads a JSON body from a status response, classifying HTTP and decoding failures.
pub(crate) async fn read_status_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> std::result::Result<T, TransportError> {
    let status = response.status();
    // Headers arrived, so a failed body read is a dropped connection.
    let body = response
        .text()
        .await
        .map_err(|e| TransportError::transient(format!("failed to read status body: {}", e)))?;
    if !status.is_success() {
        return Err(TransportError::from_status(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| {
        TransportError::fatal(format!("malformed status body ({}): {}", e, preview(&body)))
    })
}

/// Reads a JSON body from a submission or discovery response; `wrap` picks the error variant.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    wrap: fn(String) -> crate::error::GenerationError,
) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| wrap(format!("failed to read response: {}", e)))?;
    if !status.is_success() {
        return Err(wrap(format!("HTTP {}: {}", status, preview(&body))));
    }
    serde_json::from_str(&body)
        .map_err(|e| wrap(format!("malformed response ({}): {}", e, preview(&body))))
}
