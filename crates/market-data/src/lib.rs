//! InvestNote Market Data Crate
//!
//! This crate provides provider-agnostic market data lookups for the
//! news-to-signal pipeline.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Single instrument lookup by code
//! - Industry label expansion into board constituents
//! - Multiple providers (Eastmoney, Xueqiu) with priority ordering
//! - Per-provider health tracking, cool-down and failover
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  Industry label  |  (free text: "AI", "新能源汽车")
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | IndustryCatalog  |  (exact -> contains -> synonym)
//! +------------------+
//!          |
//!          v
//! +------------------+     +---------------------+
//! | ProviderResolver | --> | ProviderHealthTable |  (shared, mutex-guarded)
//! +------------------+     +---------------------+
//!          |
//!          v
//! +------------------+
//! |    Provider      |  (Eastmoney, Xueqiu, ...)
//! +------------------+
//! ```

pub mod config;
pub mod errors;
pub mod industry;
pub mod models;
pub mod provider;
pub mod registry;

pub use config::ResolverConfig;
pub use errors::{MarketDataError, RetryClass};
pub use industry::{match_label, BoardMatch, IndustryCatalog, MatchTier};
pub use models::{ConstituentInstrument, InstrumentCode, InstrumentSnapshot, Market};

pub use provider::eastmoney::EastmoneyProvider;
pub use provider::xueqiu::XueqiuProvider;
pub use provider::{MarketDataProvider, ProviderCapabilities};

pub use registry::{HealthConfig, ProviderHealth, ProviderHealthTable, ProviderResolver};

use std::sync::Arc;

/// Build a resolver over the bundled providers: Eastmoney first, Xueqiu
/// behind it when a token is configured.
pub fn default_resolver(config: ResolverConfig) -> ProviderResolver {
    let mut providers: Vec<Arc<dyn MarketDataProvider>> = vec![Arc::new(EastmoneyProvider::new())];
    if let Some(token) = config.xueqiu_token.clone() {
        providers.push(Arc::new(XueqiuProvider::new(Some(token))));
    }
    ProviderResolver::new(providers, config)
}
