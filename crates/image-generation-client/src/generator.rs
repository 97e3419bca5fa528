//! The uniform image generation interface and the submit/poll/resolve pipeline behind it.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::artifacts::{ArtifactResolver, GeneratedImage};
use crate::config::{ImageGenConfig, ProviderKind};
use crate::dalle::DalleGenerator;
use crate::error::{GenerationError, Result};
use crate::job::PollOutcome;
use crate::poller::Poller;
use crate::providers::{FusionBrainProvider, JobProvider, KandinskyProvider};
use crate::request::GenerationRequest;

/// Timeout for every outbound HTTP request made by the generators.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Anything that can turn a prompt into pictures.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Produces at least one image, or an error naming the stage that failed.
    async fn generate_image(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>>;

    /// Convenience wrapper for callers that only have a prompt and a size.
    async fn generate(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        count: u32,
    ) -> Result<Vec<GeneratedImage>> {
        let request = GenerationRequest::new(prompt)
            .with_size(width, height)
            .with_num_images(count);
        self.generate_image(&request).await
    }
}

/// Runs a [`JobProvider`] job to completion: submit, poll, resolve artifacts.
pub struct PollingGenerator<P> {
    provider: P,
    poller: Poller,
    resolver: ArtifactResolver,
}

impl<P: JobProvider> PollingGenerator<P> {
    pub fn new(provider: P, poller: Poller, resolver: ArtifactResolver) -> Self {
        Self {
            provider,
            poller,
            resolver,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: JobProvider> ImageGenerator for PollingGenerator<P> {
    fn provider_name(&self) -> &str {
        self.provider.name()
    }

    #[instrument(skip(self, request), fields(provider = self.provider.name()))]
    async fn generate_image(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>> {
        request.validate()?;
        let handle = self.provider.submit(request).await?;

        let artifacts = match self.poller.poll(&self.provider, &handle).await? {
            PollOutcome::Done(artifacts) => artifacts,
            PollOutcome::Failed(reason) => {
                error!(job = %handle, reason = %reason, "Generation failed");
                return Err(GenerationError::Failed { reason });
            }
            PollOutcome::TimedOut { attempts } => {
                error!(job = %handle, attempts, "Generation timed out");
                return Err(GenerationError::TimedOut { attempts });
            }
        };

        let images = self.resolver.resolve(&artifacts, &request.prompt).await;
        if images.is_empty() {
            return Err(GenerationError::NoImages);
        }
        info!(job = %handle, images = images.len(), "Generation completed");
        Ok(images)
    }
}

/// Builds the generator selected by `config`. Fails if the provider's credentials are missing.
pub fn build_generator(config: &ImageGenConfig) -> anyhow::Result<Arc<dyn ImageGenerator>> {
    config.validate()?;
    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let resolver = ArtifactResolver::new(http.clone());
    let key = config.kandinsky_api_key.clone().unwrap_or_default();
    let secret = config.kandinsky_secret_key.clone().unwrap_or_default();

    let generator: Arc<dyn ImageGenerator> = match config.provider {
        ProviderKind::FusionBrain => {
            let mut provider = FusionBrainProvider::new(http, key, secret)
                .with_pipeline_cache(config.cache_pipeline);
            if let Some(url) = &config.fusionbrain_url {
                provider = provider.with_base_url(url.clone());
            }
            let poller = Poller::with_tokio(config.poll_policy(provider.default_policy()));
            Arc::new(PollingGenerator::new(provider, poller, resolver))
        }
        ProviderKind::Kandinsky => {
            let mut provider = KandinskyProvider::new(http, key, secret);
            if let Some(url) = &config.kandinsky_url {
                provider = provider.with_base_url(url.clone());
            }
            let poller = Poller::with_tokio(config.poll_policy(provider.default_policy()));
            Arc::new(PollingGenerator::new(provider, poller, resolver))
        }
        ProviderKind::Dalle => {
            let api_key = config.openai_api_key.clone().unwrap_or_default();
            let dalle = match &config.openai_base_url {
                Some(base) => DalleGenerator::with_base_url(api_key, base.clone(), resolver),
                None => DalleGenerator::new(api_key, resolver),
            };
            Arc::new(dalle.with_model(config.dalle_model.clone()))
        }
    };

    info!(provider = generator.provider_name(), "Image generator ready");
    Ok(generator)
}
