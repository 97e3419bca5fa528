//! Turns job artifacts into decoded images. One bad artifact never fails the batch.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::error::preview;
use crate::job::Artifact;

/// A decoded picture and the prompt it was drawn from.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub prompt: String,
}

impl GeneratedImage {
    /// Validates `bytes` as an image and records its format and dimensions.
    pub fn decode(bytes: Vec<u8>, prompt: &str) -> Result<Self, ArtifactError> {
        let format = image::guess_format(&bytes)?;
        let decoded = image::load_from_memory_with_format(&bytes, format)?;
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            format,
            bytes,
            prompt: prompt.to_string(),
        })
    }

    /// File name for upload or saving, e.g. `image-1.png` for `index` 0.
    pub fn file_name(&self, index: usize) -> String {
        let ext = self.format.extensions_str().first().copied().unwrap_or("img");
        format!("image-{}.{}", index + 1, ext)
    }
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("not a decodable image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Downloads URL artifacts and decodes inline ones.
#[derive(Clone)]
pub struct ArtifactResolver {
    http: reqwest::Client,
}

impl ArtifactResolver {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Resolves each artifact once, in order. Failures are logged and skipped; the result may be empty.
    #[instrument(skip(self, artifacts, prompt), fields(count = artifacts.len()))]
    pub async fn resolve(&self, artifacts: &[Artifact], prompt: &str) -> Vec<GeneratedImage> {
        let mut images = Vec::with_capacity(artifacts.len());
        for (index, artifact) in artifacts.iter().enumerate() {
            match self.resolve_one(artifact, prompt).await {
                Ok(image) => images.push(image),
                Err(e) => {
                    // Only the source is logged; inline payloads stay out of logs.
                    let source = match artifact {
                        Artifact::Url(url) => url.as_str(),
                        Artifact::Inline(_) => "<inline>",
                    };
                    error!(
                        index,
                        source = %source,
                        error = %preview(&e.to_string()),
                        "Skipping artifact"
                    );
                }
            }
        }
        info!(resolved = images.len(), requested = artifacts.len(), "Artifacts resolved");
        images
    }

    async fn resolve_one(
        &self,
        artifact: &Artifact,
        prompt: &str,
    ) -> Result<GeneratedImage, ArtifactError> {
        let bytes = match artifact {
            Artifact::Url(url) => self.fetch(url).await?,
            Artifact::Inline(data) => STANDARD.decode(data.trim())?,
        };
        GeneratedImage::decode(bytes, prompt)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ArtifactError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ArtifactError::Fetch(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ArtifactError::Fetch(format!("HTTP {}", status)));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ArtifactError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
