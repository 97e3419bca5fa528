//! # imagebot-core
//!
//! Core types and traits for the image bot: [`Bot`], [`Handler`], incoming updates, inline keyboards,
//! and tracing initialization. Transport-agnostic; used by imagebot-telegram, handler-chain and the handler crates.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot, Photo};
pub use error::{ImagebotError, Result};
pub use logger::init_tracing;
pub use types::{
    CallbackQuery, Chat, Handler, HandlerResponse, Incoming, InlineButton, InlineKeyboard, Message,
    ToCoreIncoming, ToCoreUser, User,
};
