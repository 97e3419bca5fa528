//! OpenAI DALL-E generation: a single synchronous request whose response carries download URLs.

use async_openai::{
    config::OpenAIConfig,
    types::{CreateImageRequestArgs, Image, ImageModel, ImageSize, ImageResponseFormat},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::artifacts::{ArtifactResolver, GeneratedImage};
use crate::config::mask_token;
use crate::error::{GenerationError, Result};
use crate::generator::ImageGenerator;
use crate::job::Artifact;
use crate::request::GenerationRequest;

pub const DEFAULT_DALLE_MODEL: &str = "dall-e-3";

/// OpenAI DALL-E image generation client.
#[derive(Clone)]
pub struct DalleGenerator {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    resolver: ArtifactResolver,
    api_key_for_logging: String,
}

impl DalleGenerator {
    pub fn new(api_key: String, resolver: ArtifactResolver) -> Self {
        let api_key_for_logging = mask_token(&api_key);
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: DEFAULT_DALLE_MODEL.to_string(),
            resolver,
            api_key_for_logging,
        }
    }

    /// Creates a client against an OpenAI-compatible base URL.
    pub fn with_base_url(api_key: String, base_url: String, resolver: ArtifactResolver) -> Self {
        let api_key_for_logging = mask_token(&api_key);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            model: DEFAULT_DALLE_MODEL.to_string(),
            resolver,
            api_key_for_logging,
        }
    }

    /// Sets the model (dall-e-2 or dall-e-3).
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    fn image_model(&self) -> ImageModel {
        match self.model.as_str() {
            "dall-e-2" => ImageModel::DallE2,
            "dall-e-3" => ImageModel::DallE3,
            other => ImageModel::Other(other.to_string()),
        }
    }
}

/// Maps a pixel size onto the sizes DALL-E accepts.
pub fn image_size(width: u32, height: u32) -> Result<ImageSize> {
    match (width, height) {
        (256, 256) => Ok(ImageSize::S256x256),
        (512, 512) => Ok(ImageSize::S512x512),
        (1024, 1024) => Ok(ImageSize::S1024x1024),
        (1792, 1024) => Ok(ImageSize::S1792x1024),
        (1024, 1792) => Ok(ImageSize::S1024x1792),
        _ => Err(GenerationError::InvalidRequest(format!(
            "DALL-E does not support {}x{}",
            width, height
        ))),
    }
}

#[async_trait]
impl ImageGenerator for DalleGenerator {
    fn provider_name(&self) -> &str {
        "dalle"
    }

    #[instrument(skip(self, request))]
    async fn generate_image(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>> {
        request.validate()?;
        let size = image_size(request.width, request.height)?;
        let n = u8::try_from(request.num_images).map_err(|_| {
            GenerationError::InvalidRequest(format!("too many images: {}", request.num_images))
        })?;
        if request.negative_prompt.is_some() {
            debug!("DALL-E has no negative prompt; ignoring it");
        }

        info!(
            model = %self.model,
            size = ?size,
            n,
            prompt_preview = %request.prompt.chars().take(100).collect::<String>(),
            api_key = %self.api_key_for_logging,
            "OpenAI image generation request"
        );

        let api_request = CreateImageRequestArgs::default()
            .prompt(request.prompt.as_str())
            .model(self.image_model())
            .size(size)
            .response_format(ImageResponseFormat::Url)
            .n(n)
            .build()
            .map_err(|e| GenerationError::InvalidRequest(e.to_string()))?;

        let response = self
            .client
            .images()
            .create(api_request)
            .await
            .map_err(|e| GenerationError::Submission(e.to_string()))?;

        let artifacts: Vec<Artifact> = response
            .data
            .iter()
            .map(|image| match image.as_ref() {
                Image::Url { url, .. } => Artifact::Url(url.clone()),
                Image::B64Json { b64_json, .. } => Artifact::Inline(b64_json.to_string()),
            })
            .collect();
        if artifacts.is_empty() {
            return Err(GenerationError::EmptyResult);
        }
        info!(artifacts = artifacts.len(), "OpenAI image generation completed");

        let images = self.resolver.resolve(&artifacts, &request.prompt).await;
        if images.is_empty() {
            return Err(GenerationError::NoImages);
        }
        Ok(images)
    }
}
