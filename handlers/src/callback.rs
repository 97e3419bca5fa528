use async_trait::async_trait;
use imagebot_core::{Bot, CallbackQuery, Handler, HandlerResponse, Result};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const OPTION_1: &str = "option1";
pub const OPTION_2: &str = "option2";
pub const OPTION_3: &str = "option3";

/// Handles presses on the `/start` keyboard: acknowledges the press, then rewrites the keyboard
/// message to say what was chosen.
pub struct CallbackHandler {
    bot: Arc<dyn Bot>,
}

impl CallbackHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }

    /// Text that replaces the keyboard message for the given callback data.
    pub fn reply_for(data: &str) -> String {
        match data {
            OPTION_1 => "You chose option 1!".to_string(),
            OPTION_2 => "You chose option 2!".to_string(),
            OPTION_3 => "Everything works as it should.".to_string(),
            other => format!("Received unknown callback: {}", other),
        }
    }
}

#[async_trait]
impl Handler for CallbackHandler {
    #[instrument(skip(self, query), fields(data = %query.data))]
    async fn handle_callback(&self, query: &CallbackQuery) -> Result<HandlerResponse> {
        self.bot.answer_callback(&query.id, None).await?;

        let text = Self::reply_for(&query.data);
        match (&query.chat, &query.message_id) {
            (Some(chat), Some(message_id)) => {
                self.bot.edit_message(chat, message_id, &text).await?;
                info!(user_id = query.user.id, "Keyboard message updated");
            }
            (Some(chat), None) => {
                self.bot.send_message(chat, &text).await?;
            }
            _ => warn!(user_id = query.user.id, "Callback without a message; nothing to edit"),
        }
        Ok(HandlerResponse::Stop)
    }
}
