//! imagebot CLI: serve the webhook, run with long polling, or generate images to disk.

use anyhow::{Context, Result};
use clap::Parser;
use image_generation_client::{build_generator, GenerationRequest, ImageGenConfig};
use imagebot_cli::{build_chain, generate::generate_to_dir, server, AppConfig, Cli, Commands};
use imagebot_core::{init_tracing, Bot};
use imagebot_telegram::{run_polling, TelegramBotAdapter};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let log_file = std::env::var("LOG_FILE").ok().filter(|p| !p.trim().is_empty());
    init_tracing(log_file.as_deref())?;

    match cli.command {
        Commands::Serve { addr, token } => {
            let config = AppConfig::load(token)?;
            config.validate()?;
            let (_, chain) = wire(&config)?;
            let addr = addr.unwrap_or_else(|| config.webhook_addr.clone());
            server::serve(&addr, chain).await
        }
        Commands::Run { token } => {
            let config = AppConfig::load(token)?;
            config.validate()?;
            let (bot, chain) = wire(&config)?;
            run_polling(bot, chain).await
        }
        Commands::Generate {
            prompt,
            out,
            count,
            width,
            height,
        } => {
            let config = ImageGenConfig::from_env()?;
            let generator = build_generator(&config).context("Build image generator")?;
            let request = GenerationRequest::new(prompt)
                .with_size(width.unwrap_or(config.width), height.unwrap_or(config.height))
                .with_num_images(count);
            let written = generate_to_dir(generator.as_ref(), &request, &out).await?;
            for path in &written {
                println!("{}", path.display());
            }
            info!(count = written.len(), "Generation finished");
            Ok(())
        }
    }
}

/// Creates the teloxide bot and the handler chain around it.
fn wire(config: &AppConfig) -> Result<(teloxide::Bot, handler_chain::HandlerChain)> {
    let teloxide_bot = config.telegram.build_bot();
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let generator = build_generator(&config.image).context("Build image generator")?;
    let chain = build_chain(bot, generator, &config.image);
    Ok((teloxide_bot, chain))
}
