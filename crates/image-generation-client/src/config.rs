//! Provider selection and credentials, loaded from env.

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::poller::PollPolicy;

/// Which backend serves image requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    FusionBrain,
    Kandinsky,
    Dalle,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fusionbrain" | "fusion-brain" => Ok(ProviderKind::FusionBrain),
            "kandinsky" => Ok(ProviderKind::Kandinsky),
            "dalle" | "dall-e" | "openai" => Ok(ProviderKind::Dalle),
            other => bail!(
                "IMAGE_PROVIDER must be one of fusionbrain, kandinsky, dalle; got {:?}",
                other
            ),
        }
    }
}

/// Image generation config.
#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    /// IMAGE_PROVIDER, default fusionbrain
    pub provider: ProviderKind,
    /// KANDINSKY_API_KEY (shared by FusionBrain and Kandinsky)
    pub kandinsky_api_key: Option<String>,
    /// KANDINSKY_SECRET_KEY or KANDINSKY_API_SECRET
    pub kandinsky_secret_key: Option<String>,
    /// FUSIONBRAIN_URL
    pub fusionbrain_url: Option<String>,
    /// KANDINSKY_URL
    pub kandinsky_url: Option<String>,
    /// FUSIONBRAIN_CACHE_PIPELINE
    pub cache_pipeline: bool,
    /// OPENAI_API_KEY
    pub openai_api_key: Option<String>,
    /// OPENAI_BASE_URL
    pub openai_base_url: Option<String>,
    /// DALLE_MODEL, default dall-e-3
    pub dalle_model: String,
    /// POLL_MAX_ATTEMPTS
    pub poll_max_attempts: Option<u32>,
    /// POLL_INTERVAL_SECS
    pub poll_interval_secs: Option<u64>,
    /// POLL_TRANSPORT_RETRIES
    pub poll_transport_retries: Option<u32>,
    /// IMAGE_WIDTH, default 1024
    pub width: u32,
    /// IMAGE_HEIGHT, default 1024
    pub height: u32,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} is not valid ({}): {:?}", name, e, raw)),
        None => Ok(None),
    }
}

impl ImageGenConfig {
    /// Load from environment variables. Call validate() before building a generator.
    pub fn from_env() -> Result<Self> {
        let provider = match non_empty_var("IMAGE_PROVIDER") {
            Some(raw) => raw
                .parse::<ProviderKind>()
                .context("invalid IMAGE_PROVIDER")?,
            None => ProviderKind::FusionBrain,
        };

        Ok(Self {
            provider,
            kandinsky_api_key: non_empty_var("KANDINSKY_API_KEY"),
            kandinsky_secret_key: non_empty_var("KANDINSKY_SECRET_KEY")
                .or_else(|| non_empty_var("KANDINSKY_API_SECRET")),
            fusionbrain_url: non_empty_var("FUSIONBRAIN_URL"),
            kandinsky_url: non_empty_var("KANDINSKY_URL"),
            cache_pipeline: parsed_var::<bool>("FUSIONBRAIN_CACHE_PIPELINE")?.unwrap_or(false),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_base_url: non_empty_var("OPENAI_BASE_URL"),
            dalle_model: non_empty_var("DALLE_MODEL")
                .unwrap_or_else(|| crate::dalle::DEFAULT_DALLE_MODEL.to_string()),
            poll_max_attempts: parsed_var("POLL_MAX_ATTEMPTS")?,
            poll_interval_secs: parsed_var("POLL_INTERVAL_SECS")?,
            poll_transport_retries: parsed_var("POLL_TRANSPORT_RETRIES")?,
            width: parsed_var("IMAGE_WIDTH")?.unwrap_or(1024),
            height: parsed_var("IMAGE_HEIGHT")?.unwrap_or(1024),
        })
    }

    /// Checks that the selected provider has its credentials.
    pub fn validate(&self) -> Result<()> {
        match self.provider {
            ProviderKind::FusionBrain | ProviderKind::Kandinsky => {
                if self.kandinsky_api_key.is_none() {
                    bail!("KANDINSKY_API_KEY is required for {:?}", self.provider);
                }
                if self.kandinsky_secret_key.is_none() {
                    bail!(
                        "KANDINSKY_SECRET_KEY (or KANDINSKY_API_SECRET) is required for {:?}",
                        self.provider
                    );
                }
            }
            ProviderKind::Dalle => {
                if self.openai_api_key.is_none() {
                    bail!("OPENAI_API_KEY is required for dalle");
                }
            }
        }
        if self.width == 0 || self.height == 0 {
            bail!("IMAGE_WIDTH and IMAGE_HEIGHT must be positive");
        }
        if self.poll_max_attempts == Some(0) {
            bail!("POLL_MAX_ATTEMPTS must be at least 1");
        }
        Ok(())
    }

    /// Overlays the configured poll settings on a provider's default policy.
    pub fn poll_policy(&self, default: PollPolicy) -> PollPolicy {
        let interval = self
            .poll_interval_secs
            .map(Duration::from_secs)
            .unwrap_or(default.interval);
        PollPolicy::new(self.poll_max_attempts.unwrap_or(default.max_attempts), interval)
            .with_transport_retries(
                self.poll_transport_retries
                    .unwrap_or(default.transport_retries),
            )
    }
}

/// Masks an API key for logging: first 7 chars + "***" + last 4 chars.
/// Keys of 11 chars or fewer become "***".
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[len - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
