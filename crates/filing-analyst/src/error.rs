//! Error types for filing analysis operations

use filing_llm::LLMError;
use thiserror::Error;

/// Filing analysis specific errors
#[derive(Debug, Error)]
pub enum FilingError {
    /// Filing type outside the supported set
    #[error("Filing type '{0}' is not supported.")]
    UnsupportedFilingType(String),

    /// Malformed or empty request input
    #[error("{0}")]
    InvalidInput(String),

    /// Requested filing, report or index does not exist
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid configuration (API keys, limits)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filing provider returned an error or an unexpected payload
    #[error("API error: {0}")]
    ApiError(String),

    /// Model provider failure
    #[error("LLM error: {0}")]
    LlmError(#[from] LLMError),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Prompt template failed to render
    #[error("Prompt error: {0}")]
    PromptError(#[from] minijinja::Error),

    /// Spawned task panicked or was cancelled
    #[error("Task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for filing operations
pub type Result<T> = std::result::Result<T, FilingError>;

impl From<filing_utils::ConfigError> for FilingError {
    fn from(err: filing_utils::ConfigError) -> Self {
        FilingError::ConfigError(err.to_string())
    }
}

impl FilingError {
    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FilingError::UnsupportedFilingType(_) | FilingError::InvalidInput(_)
        )
    }

    /// Whether the error reports a missing resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, FilingError::NotFound(_))
    }
}
