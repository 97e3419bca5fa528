//! Image generation command handler.

mod image_generation_handler;

pub use image_generation_handler::{
    caption_for, ImageGenerationHandler, IMAGE_COMMANDS, MAX_CAPTION_LEN, MSG_DONE, MSG_GENERATING,
};
