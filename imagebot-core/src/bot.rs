//! Bot abstraction for sending messages, keyboards and photos.
//!
//! [`Bot`] is transport-agnostic; imagebot-telegram implements it via teloxide and tests substitute mocks.

use crate::error::{ImagebotError, Result};
use crate::types::{Chat, InlineKeyboard, Message};
use async_trait::async_trait;

/// Raster image bytes ready for upload.
#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Vec<u8>,
    /// File name presented to the chat client, e.g. `image-1.png`.
    pub file_name: String,
}

/// Abstraction for talking back to a chat. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Sends a text message with an inline keyboard below it.
    async fn send_message_with_keyboard(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()>;

    /// Edits an already-sent message. `message_id` is transport-specific (e.g. Telegram numeric string).
    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()>;

    /// Sends a message and returns its id for a later `edit_message`.
    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String>;

    /// Uploads a photo with an optional caption.
    async fn send_photo(&self, chat: &Chat, photo: Photo, caption: Option<&str>) -> Result<()>;

    /// Acknowledges a callback query so the client stops showing a spinner.
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()>;

    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }
}

/// Parses a message id string into an i32. Used by edit_message.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| ImagebotError::Bot(format!("Invalid message_id for edit: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_id_valid() {
        assert_eq!(parse_message_id("123").unwrap(), 123);
        assert_eq!(parse_message_id("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_message_id_invalid() {
        assert!(parse_message_id("").is_err());
        assert!(parse_message_id("abc").is_err());
        assert!(parse_message_id("12.3").is_err());
    }
}
