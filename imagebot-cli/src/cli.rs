//! CLI parser.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imagebot")]
#[command(about = "Telegram bot that draws pictures from text prompts", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the webhook over HTTP (POST /webhook, POST /event, GET /health).
    Serve {
        /// Listen address; overrides WEBHOOK_ADDR.
        #[arg(short, long)]
        addr: Option<String>,
        /// Overrides BOT_TOKEN.
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Run the bot with long polling.
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Generate images for a prompt and save them to a directory.
    Generate {
        #[arg(short, long)]
        prompt: String,
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
        /// Overrides IMAGE_WIDTH.
        #[arg(long)]
        width: Option<u32>,
        /// Overrides IMAGE_HEIGHT.
        #[arg(long)]
        height: Option<u32>,
    },
}
