//! Image generation handler: `/image <prompt>` (also `/draw`, `/imagine`) runs the configured generator
//! and sends the pictures back as photos.

use async_trait::async_trait;
use image_generation_client::{GenerationError, GenerationRequest, ImageGenerator};
use imagebot_core::{Bot, Handler, HandlerResponse, Message, Photo, Result};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Commands that trigger generation.
pub const IMAGE_COMMANDS: &[&str] = &["image", "draw", "imagine"];

pub const MSG_GENERATING: &str = "Generating your picture, this can take a minute...";
pub const MSG_DONE: &str = "Here is what I drew.";
const MSG_SEND_FAILED: &str = "Sorry, the picture could not be sent.";

/// Telegram's photo caption limit, in UTF-16 code units.
pub const MAX_CAPTION_LEN: usize = 1024;

/// The prompt as a photo caption, cut on a char boundary to fit [`MAX_CAPTION_LEN`].
pub fn caption_for(prompt: &str) -> String {
    if prompt.encode_utf16().count() <= MAX_CAPTION_LEN {
        return prompt.to_string();
    }
    let budget = MAX_CAPTION_LEN - '…'.len_utf16();
    let mut used = 0;
    let mut caption = String::new();
    for c in prompt.chars() {
        used += c.len_utf16();
        if used > budget {
            break;
        }
        caption.push(c);
    }
    caption.push('…');
    caption
}

/// Handles image commands; everything else passes through.
#[derive(Clone)]
pub struct ImageGenerationHandler {
    generator: Arc<dyn ImageGenerator>,
    bot: Arc<dyn Bot>,
    width: u32,
    height: u32,
}

impl ImageGenerationHandler {
    pub fn new(generator: Arc<dyn ImageGenerator>, bot: Arc<dyn Bot>) -> Self {
        Self {
            generator,
            bot,
            width: image_generation_client::request::DEFAULT_WIDTH,
            height: image_generation_client::request::DEFAULT_HEIGHT,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Returns the prompt when `message` is an image command. The prompt may be empty.
    fn extract_prompt(message: &Message) -> Option<&str> {
        let (name, rest) = message.command()?;
        IMAGE_COMMANDS.contains(&name.as_str()).then_some(rest)
    }

    async fn handle_image_generation(&self, message: &Message, prompt: &str) -> Result<HandlerResponse> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            provider = self.generator.provider_name(),
            prompt_preview = %prompt.chars().take(50).collect::<String>(),
            "Processing image generation request"
        );

        let progress_id = match self
            .bot
            .send_message_and_return_id(&message.chat, MSG_GENERATING)
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "Failed to send progress message");
                None
            }
        };
        let progress_id = progress_id.as_deref();

        let request = GenerationRequest::new(prompt).with_size(self.width, self.height);
        let images = match self.generator.generate_image(&request).await {
            Ok(images) => images,
            Err(e) => {
                error!(error = %e, retryable = e.is_retryable(), "Image generation failed");
                self.report(message, progress_id, e.user_message()).await;
                return Ok(HandlerResponse::Stop);
            }
        };

        let total = images.len();
        let mut delivered = 0usize;
        for (index, image) in images.into_iter().enumerate() {
            let caption = caption_for(&image.prompt);
            let photo = Photo {
                file_name: image.file_name(index),
                bytes: image.bytes,
            };
            match self.bot.send_photo(&message.chat, photo, Some(&caption)).await {
                Ok(()) => delivered += 1,
                Err(e) => error!(error = %e, index, "Failed to send photo"),
            }
        }

        if delivered == 0 {
            self.report(message, progress_id, MSG_SEND_FAILED).await;
            return Ok(HandlerResponse::Stop);
        }
        self.report(message, progress_id, MSG_DONE).await;
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            delivered,
            total,
            "Images sent"
        );
        Ok(HandlerResponse::Stop)
    }

    /// Replaces the progress message with `text`, or sends `text` when there is nothing to edit.
    async fn report(&self, message: &Message, progress_id: Option<&str>, text: &str) {
        if let Some(id) = progress_id {
            match self.bot.edit_message(&message.chat, id, text).await {
                Ok(()) => return,
                Err(e) => warn!(error = %e, message_id = id, "Failed to edit progress message"),
            }
        }
        if let Err(e) = self.bot.send_message(&message.chat, text).await {
            error!(error = %e, "Failed to send status message");
        }
    }
}

#[async_trait]
impl Handler for ImageGenerationHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let prompt = match Self::extract_prompt(message) {
            Some(p) => p,
            None => return Ok(HandlerResponse::Continue),
        };

        if prompt.is_empty() {
            let hint = GenerationError::InvalidRequest("prompt is empty".into()).user_message();
            self.report(message, None, hint).await;
            return Ok(HandlerResponse::Stop);
        }

        self.handle_image_generation(message, prompt).await
    }
}
