//! Provider registry module.
//!
//! This module provides orchestration for market data providers, including:
//! - Provider registration and priority ordering
//! - Per-provider health tracking with cool-down
//! - Failover across providers
//! - Industry label expansion with a per-label cache

mod cache;
mod health;
mod resolver;

pub use cache::TtlCache;
pub use health::{
    HealthConfig, ProviderHealth, ProviderHealthTable, DEFAULT_COOL_DOWN,
    DEFAULT_FAILURE_THRESHOLD,
};
pub use resolver::ProviderResolver;
