//! AI stage error types.

use thiserror::Error;

/// Errors raised by the language-model backed stages.
///
/// None of these abort a pipeline run: the classifier and advisor turn them
/// into a fallback result and log them.
#[derive(Debug, Error)]
pub enum AiError {
    /// Classifier output was not a usable classification.
    #[error("Classification parse error: {0}")]
    ClassificationParse(String),

    /// Advisor output did not match the recommendation schema.
    #[error("Advisor parse error: {0}")]
    AdvisorParse(String),

    /// Missing API key for a provider.
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    /// Provider error (from rig-core or API).
    #[error("Provider error: {0}")]
    Provider(String),

    /// Generation call exceeded its per-call timeout.
    #[error("Generation timed out after {0} seconds")]
    Timeout(u64),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AiError {
    /// Create a new provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AiError::ClassificationParse(_) => "CLASSIFICATION_PARSE",
            AiError::AdvisorParse(_) => "ADVISOR_PARSE",
            AiError::MissingApiKey(_) => "MISSING_API_KEY",
            AiError::Provider(_) => "PROVIDER_ERROR",
            AiError::Timeout(_) => "TIMEOUT",
            AiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the failure came from the model output rather than the transport.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, AiError::ClassificationParse(_) | AiError::AdvisorParse(_))
    }
}
