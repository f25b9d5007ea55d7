//! Error types for the model client, the inquiry pipeline and configuration.

use thiserror::Error;

/// Failure of a single call to the generative model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("API key not valid. Set GEMINI_API_KEY to a Google Gemini API key.")]
    MissingApiKey,

    /// Transport failure. The request URL is stripped before wrapping.
    #[error("{0}")]
    Http(reqwest::Error),

    #[error("API Error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Other(String),

    /// A failure that carries no message at all.
    #[error("unknown error")]
    Unknown,
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Http(err.without_url())
    }
}

impl ModelError {
    /// The message a failure carries, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            ModelError::Unknown => None,
            other => Some(other.to_string()),
        }
    }
}

/// Precondition failures of the inquiry pipeline. Model failures never
/// surface here; they become the displayed result instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("No image selected")]
    NoImage,

    #[error("An analysis is already in progress")]
    Busy,

    #[error("Question must not be empty")]
    EmptyQuestion,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}' - {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}
