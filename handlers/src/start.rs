use async_trait::async_trait;
use imagebot_core::{Bot, Handler, HandlerResponse, InlineButton, InlineKeyboard, Message, Result};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::callback::{OPTION_1, OPTION_2, OPTION_3};

pub const GREETING: &str = "Hi! I'm a bot that draws pictures from text. Choose an option:";

/// The keyboard attached to the greeting: one row, three options.
pub fn start_keyboard() -> InlineKeyboard {
    InlineKeyboard::new().row(vec![
        InlineButton::new("Option 1", OPTION_1),
        InlineButton::new("Option 2", OPTION_2),
        InlineButton::new("Last check", OPTION_3),
    ])
}

/// Answers `/start` with a greeting and the option keyboard.
pub struct StartHandler {
    bot: Arc<dyn Bot>,
}

impl StartHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Handler for StartHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match message.command() {
            Some((name, _)) if name == "start" => {}
            _ => return Ok(HandlerResponse::Continue),
        }

        info!(user_id = message.user.id, chat_id = message.chat.id, "Sending start keyboard");
        self.bot
            .send_message_with_keyboard(&message.chat, GREETING, &start_keyboard())
            .await?;
        Ok(HandlerResponse::Stop)
    }
}
