use thiserror::Error;

/// Failure of one generation request, by stage.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Pipeline discovery failed: {0}")]
    Discovery(String),

    #[error("Job submission failed: {0}")]
    Submission(String),

    #[error("Status polling failed: {0}")]
    PollTransport(String),

    #[error("Job completed without artifacts")]
    EmptyResult,

    #[error("Provider reported failure: {reason}")]
    Failed { reason: String },

    #[error("Job still pending after {attempts} status checks")]
    TimedOut { attempts: u32 },

    #[error("None of the generated images could be retrieved")]
    NoImages,

    #[error("Config error: {0}")]
    Config(String),
}

impl GenerationError {
    /// Whether sending the same request again later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::PollTransport(_)
                | GenerationError::TimedOut { .. }
                | GenerationError::NoImages
                | GenerationError::Discovery(_)
        )
    }

    /// Text shown to the chat user. Never includes provider response bodies.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::InvalidRequest(_) => {
                "Please describe the picture, e.g. /image a red bicycle."
            }
            GenerationError::Discovery(_) | GenerationError::Submission(_) => {
                "The image service did not accept the request. Please try again later."
            }
            GenerationError::PollTransport(_) => {
                "Lost connection to the image service. Please try again later."
            }
            GenerationError::Failed { .. } => {
                "The image service could not draw this prompt. Try rephrasing it."
            }
            GenerationError::TimedOut { .. } => {
                "Generation is taking too long. Please try again later."
            }
            GenerationError::EmptyResult | GenerationError::NoImages => {
                "The image service returned no pictures. Please try again."
            }
            GenerationError::Config(_) => "Image generation is not configured.",
        }
    }
}

/// Failure of one outbound HTTP exchange while polling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    /// Connection problems, timeouts, 429 and 5xx responses.
    pub retryable: bool,
}

impl TransportError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let retryable = status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS;
        Self {
            message: format!("HTTP {}: {}", status, preview(body)),
            retryable,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return TransportError::from_status(status, &e.to_string());
        }
        let retryable = e.is_timeout() || e.is_connect() || e.is_request() || e.is_body();
        Self {
            message: e.to_string(),
            retryable,
        }
    }
}

/// First 200 characters of a response body, for error messages and logs.
pub(crate) fn preview(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX).collect();
        format!("{}...", head)
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
