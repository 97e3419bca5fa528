use async_trait::async_trait;
use imagebot_core::{Bot, Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::debug;

/// Repeats plain text back to the sender. Commands and blank messages are left alone.
/// Register it last: it claims every plain-text message.
pub struct EchoHandler {
    bot: Arc<dyn Bot>,
}

impl EchoHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }

    pub fn echo_text(text: &str) -> String {
        format!("You said: {}", text)
    }
}

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.content.trim().is_empty() || message.command().is_some() {
            return Ok(HandlerResponse::Continue);
        }
        debug!(user_id = message.user.id, "Echoing message");
        self.bot
            .reply_to(message, &Self::echo_text(&message.content))
            .await?;
        Ok(HandlerResponse::Stop)
    }
}
