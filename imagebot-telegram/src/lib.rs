//! # imagebot-telegram
//!
//! Telegram layer: teloxide-to-core adapters, the [`imagebot_core::Bot`] implementation, minimal config,
//! webhook event handling and a long-polling runner. Every update ends up in a [`handler_chain::HandlerChain`].

mod adapters;
mod bot_adapter;
mod config;
mod runner;
pub mod webhook;

pub use adapters::{
    TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUpdateWrapper, TelegramUserWrapper,
};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::run_polling;
pub use webhook::{dispatch_update, handle_event, process_update, WebhookEvent, WebhookResponse};
