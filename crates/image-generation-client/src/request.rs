//! Generation request model.

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 1024;

/// What to draw and how many pictures to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub width: u32,
    pub height: u32,
    pub num_images: u32,
}

impl GenerationRequest {
    /// One 1024x1024 image for `prompt`.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            num_images: 1,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_num_images(mut self, num_images: u32) -> Self {
        self.num_images = num_images;
        self
    }

    /// Sets the negative prompt; blank text clears it.
    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        let text = negative_prompt.into();
        self.negative_prompt = if text.trim().is_empty() { None } else { Some(text) };
        self
    }

    /// Checks the request before any network call is made.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("prompt is empty".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::InvalidRequest(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.num_images == 0 {
            return Err(GenerationError::InvalidRequest(
                "at least one image must be requested".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let r = GenerationRequest::new("a red bicycle");
        assert_eq!((r.width, r.height, r.num_images), (1024, 1024, 1));
        assert!(r.negative_prompt.is_none());
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GenerationRequest::new("   ").validate().is_err());
        assert!(GenerationRequest::new("cat").with_size(0, 512).validate().is_err());
        assert!(GenerationRequest::new("cat").with_num_images(0).validate().is_err());
    }

    #[test]
    fn test_blank_negative_prompt_is_dropped() {
        let r = GenerationRequest::new("cat").with_negative_prompt("  ");
        assert!(r.negative_prompt.is_none());
        let r = GenerationRequest::new("cat").with_negative_prompt("blurry");
        assert_eq!(r.negative_prompt.as_deref(), Some("blurry"));
    }
}
