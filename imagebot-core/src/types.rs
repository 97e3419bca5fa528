//! Core types: user, chat, message, callback query, inline keyboard, handler response, and Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Chat (channel or private) identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// A single incoming text message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Returns the bot command at the start of the message (without the leading `/` and any `@botname`
    /// suffix) together with the remaining text, or `None` when the message is not a command.
    pub fn command(&self) -> Option<(String, &str)> {
        let text = self.content.trim_start();
        let rest = text.strip_prefix('/')?;
        let (head, tail) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], rest[idx..].trim()),
            None => (rest, ""),
        };
        let name = head.split('@').next().unwrap_or(head);
        if name.is_empty() {
            return None;
        }
        Some((name.to_lowercase(), tail))
    }
}

/// A press on an inline keyboard button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub user: User,
    /// Chat of the message carrying the keyboard; absent when Telegram no longer has that message.
    pub chat: Option<Chat>,
    /// Id of the message carrying the keyboard, for editing it in place.
    pub message_id: Option<String>,
    pub data: String,
}

/// An update the bot reacts to.
#[derive(Debug, Clone)]
pub enum Incoming {
    Message(Message),
    Callback(CallbackQuery),
}

impl Incoming {
    pub fn user(&self) -> &User {
        match self {
            Incoming::Message(m) => &m.user,
            Incoming::Callback(q) => &q.user,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Incoming::Message(_) => "message",
            Incoming::Callback(_) => "callback",
        }
    }
}

/// One inline keyboard button carrying callback data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Rows of inline buttons attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, buttons: Vec<InlineButton>) -> Self {
        self.rows.push(buttons);
        self
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// The update was handled; stop the chain.
    Stop,
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific update type to core [`Incoming`]; `None` for updates the bot ignores.
pub trait ToCoreIncoming: Send + Sync {
    fn to_core(&self) -> Option<Incoming>;
}

/// A step in the chain. Messages go to `handle`, keyboard presses to `handle_callback`; both default to Continue.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }

    async fn handle_callback(
        &self,
        _query: &CallbackQuery,
    ) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
}
