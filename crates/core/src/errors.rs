//! Core error types for the InvestNote pipeline.
//!
//! Per-stage failures never surface here: the pipeline degrades them into a
//! partial outcome. This enum covers what callers can actually observe.

use thiserror::Error;

use investnote_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A collaborator was not supplied when building the pipeline.
    /// This is the only error that aborts a pipeline.
    #[error("Pipeline dependency missing: {0}")]
    MissingDependency(&'static str),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Scoring service error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Advice generation failed: {0}")]
    Advice(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors reported by the external scoring service.
#[derive(Error, Debug)]
pub enum ScoringError {
    /// The service has no score for this instrument.
    #[error("No score available for {0}")]
    Unavailable(String),

    #[error("Scoring request for {0} timed out")]
    Timeout(String),

    #[error("Scoring request failed: {0}")]
    Request(String),

    #[error("Malformed scoring response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ScoringError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScoringError::Timeout(
                err.url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "unknown url".to_string()),
            )
        } else {
            ScoringError::Request(err.to_string())
        }
    }
}
