//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`RetryClass`]: Classification for determining failover behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines how the provider resolver should handle the error.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested instrument is unknown to the provider.
    /// This is a terminal error - asking another provider won't help.
    #[error("Instrument not found: {0}")]
    NotFound(String),

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with an explicit error or could not be reached.
    #[error("Provider unavailable: {provider} - {message}")]
    ProviderUnavailable {
        /// The provider that failed
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider answered, but the payload could not be decoded.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that returned the payload
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// The operation is not supported by this provider.
    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported {
        /// The operation that was requested
        operation: String,
        /// The provider that does not support it
        provider: String,
    },

    /// Every registered provider was disabled or failed for this operation.
    #[error("All providers exhausted for {operation}")]
    ProviderExhausted {
        /// The operation that could not be served
        operation: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: Stop, the answer is authoritative
    /// - [`RetryClass::FailoverWithPenalty`]: Count a failure and try the next provider
    /// - [`RetryClass::NextProvider`]: Try the next provider without penalty
    ///
    /// # Examples
    ///
    /// ```
    /// use investnote_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Timeout { provider: "EASTMONEY".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::FailoverWithPenalty);
    ///
    /// let error = MarketDataError::NotFound("999999".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::NotFound(_) | Self::ProviderExhausted { .. } => RetryClass::Never,

            Self::Timeout { .. }
            | Self::ProviderUnavailable { .. }
            | Self::MalformedResponse { .. }
            | Self::Network(_) => RetryClass::FailoverWithPenalty,

            Self::NotSupported { .. } => RetryClass::NextProvider,
        }
    }

    /// True when the error means no provider could answer at all.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::ProviderExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_never_retries() {
        let error = MarketDataError::NotFound("000000".to_string());
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_timeout_fails_over_with_penalty() {
        let error = MarketDataError::Timeout {
            provider: "EASTMONEY".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::FailoverWithPenalty);
    }

    #[test]
    fn test_malformed_response_fails_over_with_penalty() {
        let error = MarketDataError::MalformedResponse {
            provider: "XUEQIU".to_string(),
            message: "missing data field".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::FailoverWithPenalty);
    }

    #[test]
    fn test_not_supported_skips_without_penalty() {
        let error = MarketDataError::NotSupported {
            operation: "search_industry".to_string(),
            provider: "XUEQIU".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::NextProvider);
    }

    #[test]
    fn test_exhausted_is_terminal() {
        let error = MarketDataError::ProviderExhausted {
            operation: "lookup".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert!(error.is_exhausted());
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::NotFound("600519".to_string());
        assert_eq!(format!("{}", error), "Instrument not found: 600519");

        let error = MarketDataError::ProviderUnavailable {
            provider: "EASTMONEY".to_string(),
            message: "HTTP 502".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider unavailable: EASTMONEY - HTTP 502"
        );
    }
}
