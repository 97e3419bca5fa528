//! Handler wiring shared by `serve` and `run`.

use handler_chain::HandlerChain;
use handlers::{CallbackHandler, EchoHandler, HelpHandler, StartHandler};
use image_generation_client::{ImageGenConfig, ImageGenerator};
use image_handlers::ImageGenerationHandler;
use imagebot_core::Bot;
use std::sync::Arc;

/// Builds the chain: commands first, keyboard callbacks, then the echo fallback.
pub fn build_chain(
    bot: Arc<dyn Bot>,
    generator: Arc<dyn ImageGenerator>,
    image_config: &ImageGenConfig,
) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(StartHandler::new(bot.clone())))
        .add_handler(Arc::new(HelpHandler::new(bot.clone())))
        .add_handler(Arc::new(
            ImageGenerationHandler::new(generator, bot.clone())
                .with_size(image_config.width, image_config.height),
        ))
        .add_handler(Arc::new(CallbackHandler::new(bot.clone())))
        .add_handler(Arc::new(EchoHandler::new(bot)))
}
