//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities
//! - Concrete provider implementations (Eastmoney, Xueqiu)
//! - An in-memory `FakeProvider` for tests
//!
//! Providers only talk to their data source. Ordering, health tracking,
//! failover and industry-label matching live in the registry module.

mod capabilities;
mod traits;

pub mod eastmoney;
pub mod fake;
pub mod xueqiu;

pub use capabilities::ProviderCapabilities;
pub use traits::MarketDataProvider;
