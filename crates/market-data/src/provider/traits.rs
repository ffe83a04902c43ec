//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! market data providers must implement.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{ConstituentInstrument, InstrumentSnapshot};

use super::capabilities::ProviderCapabilities;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// The resolver orders providers by [`priority`](Self::priority), skips
/// the ones whose health entry is disabled, and fails over on error.
/// Business logic never inspects the concrete provider type.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use investnote_market_data::provider::{MarketDataProvider, ProviderCapabilities};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn priority(&self) -> u8 {
///         20
///     }
///
///     // ... implement lookup and search_industry
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "EASTMONEY", "XUEQIU", etc.
    /// Used for logging and health tracking.
    fn id(&self) -> &'static str;

    /// Static priority declared at registration time.
    ///
    /// Lower values = preferred. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// Describes which operations this provider serves.
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::FULL
    }

    /// Look up a single instrument by code.
    ///
    /// Returns [`MarketDataError::NotFound`] when the provider knows the
    /// instrument does not exist.
    async fn lookup(&self, code: &str) -> Result<InstrumentSnapshot, MarketDataError>;

    /// List the constituents of a catalog board.
    ///
    /// `board` is a catalog board name that has already been matched from a
    /// free-text label. An unknown board yields an empty list, not an error.
    async fn search_industry(
        &self,
        board: &str,
    ) -> Result<Vec<ConstituentInstrument>, MarketDataError>;
}
