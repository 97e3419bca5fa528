//! Application config: Telegram transport + image generation + webhook listener.

use anyhow::{Context, Result};
use image_generation_client::ImageGenConfig;
use imagebot_telegram::TelegramConfig;
use std::env;

pub const DEFAULT_WEBHOOK_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub image: ImageGenConfig,
    /// WEBHOOK_ADDR
    pub webhook_addr: String,
}

impl AppConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let telegram = TelegramConfig::from_env_with_token(token)?;
        let image = ImageGenConfig::from_env().context("Load image generation config")?;
        let webhook_addr =
            env::var("WEBHOOK_ADDR").unwrap_or_else(|_| DEFAULT_WEBHOOK_ADDR.to_string());
        Ok(Self {
            telegram,
            image,
            webhook_addr,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.telegram.validate()?;
        self.image.validate()?;
        Ok(())
    }
}
