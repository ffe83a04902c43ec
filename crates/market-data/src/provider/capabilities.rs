//! Provider capabilities.
//!
//! Describes what a market data provider can do so the resolver can skip
//! providers that cannot serve an operation without counting it as a failure.

/// Describes the capabilities of a market data provider.
#[derive(Clone, Copy, Debug)]
pub struct ProviderCapabilities {
    /// Whether the provider can look up a single instrument by code.
    pub supports_lookup: bool,

    /// Whether the provider can list the constituents of an industry board.
    pub supports_industry: bool,
}

impl ProviderCapabilities {
    /// A provider that serves every operation.
    pub const FULL: Self = Self {
        supports_lookup: true,
        supports_industry: true,
    };
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self::FULL
    }
}
