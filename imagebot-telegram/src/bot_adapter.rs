//! Wraps teloxide::Bot and implements [`imagebot_core::Bot`]. Production code talks to Telegram; tests substitute another Bot impl.

use async_trait::async_trait;
use imagebot_core::{
    parse_message_id, Bot as CoreBot, Chat, ImagebotError, InlineKeyboard, Photo, Result,
};
use teloxide::{
    payloads::setters::*,
    prelude::*,
    types::{CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId},
};
use tracing::debug;

fn bot_error(e: teloxide::RequestError) -> ImagebotError {
    ImagebotError::Bot(e.to_string())
}

/// Converts a core keyboard to Telegram markup; every button carries callback data.
pub(crate) fn to_markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.text.clone(), b.callback_data.clone()))
            .collect::<Vec<_>>()
    }))
}

/// Thin wrapper around teloxide::Bot that implements imagebot-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_message_with_keyboard(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .reply_markup(to_markup(keyboard))
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(sent.id.to_string())
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text)
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_photo(&self, chat: &Chat, photo: Photo, caption: Option<&str>) -> Result<()> {
        debug!(chat_id = chat.id, bytes = photo.bytes.len(), file_name = %photo.file_name, "Uploading photo");
        let file = InputFile::memory(photo.bytes).file_name(photo.file_name);
        let mut request = self.bot.send_photo(ChatId(chat.id), file);
        if let Some(caption) = caption {
            request = request.caption(caption.to_string());
        }
        request.await.map_err(bot_error)?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()));
        if let Some(text) = text {
            request = request.text(text.to_string());
        }
        request.await.map_err(bot_error)?;
        Ok(())
    }
}
