use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagebotError {
    /// The transport rejected or failed an outbound call.
    #[error("Bot error: {0}")]
    Bot(String),

    /// An incoming update could not be read.
    #[error("Update error: {0}")]
    Update(String),
}

pub type Result<T> = std::result::Result<T, ImagebotError>;
