//! Minimal Telegram config: token, API URL, log path. Loaded from BOT_TOKEN (or TELEGRAM_TOKEN),
//! TELEGRAM_API_URL and LOG_FILE.

use anyhow::{bail, Result};
use std::env;
use tracing::error;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub log_file: Option<String>,
}

impl TelegramConfig {
    /// BOT_TOKEN (or TELEGRAM_TOKEN) is required; TELEGRAM_API_URL and LOG_FILE are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_token(None)
    }

    /// Like [`from_env`](Self::from_env), but a non-blank `token` replaces BOT_TOKEN.
    pub fn from_env_with_token(token: Option<String>) -> Result<Self> {
        let non_blank = |t: &String| !t.trim().is_empty();
        let bot_token = token
            .filter(non_blank)
            .or_else(|| env::var("BOT_TOKEN").ok().filter(non_blank))
            .or_else(|| env::var("TELEGRAM_TOKEN").ok().filter(non_blank))
            .ok_or_else(|| anyhow::anyhow!("BOT_TOKEN (or TELEGRAM_TOKEN) not set"))?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").ok().filter(|p| !p.trim().is_empty());
        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
        })
    }

    /// Checks that telegram_api_url, if set, is a valid URL.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                bail!("TELEGRAM_API_URL is set but not a valid URL: {}", url_str);
            }
        }
        Ok(())
    }

    /// Creates the teloxide Bot, pointing it at telegram_api_url when set.
    pub fn build_bot(&self) -> teloxide::Bot {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match self.telegram_api_url.as_deref().map(reqwest::Url::parse) {
            Some(Ok(url)) => bot.set_api_url(url),
            Some(Err(e)) => {
                error!(error = %e, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
            None => bot,
        }
    }
}
