use async_trait::async_trait;
use imagebot_core::{Bot, Handler, HandlerResponse, Message, Result};
use std::sync::Arc;

pub const HELP_TEXT: &str = "Send me a message and I'll answer you!\n\
/image <description> draws a picture (also /draw, /imagine).\n\
/start shows the option keyboard.";

/// Answers `/help`.
pub struct HelpHandler {
    bot: Arc<dyn Bot>,
}

impl HelpHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match message.command() {
            Some((name, _)) if name == "help" => {
                self.bot.reply_to(message, HELP_TEXT).await?;
                Ok(HandlerResponse::Stop)
            }
            _ => Ok(HandlerResponse::Continue),
        }
    }
}
