//! Provider resolver: failover across registered providers.
//!
//! The resolver owns the provider list, the shared health table, the
//! industry catalog and the per-label cache. For every call it:
//! 1. Walks providers in static priority order
//! 2. Skips providers that cannot serve the operation or are cooling down
//! 3. Calls the provider under a per-call timeout
//! 4. Resets the provider's counter on success, counts a failure otherwise
//! 5. Returns `ProviderExhausted` when nobody could answer

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use log::{debug, info, warn};

use super::cache::TtlCache;
use super::health::{ProviderHealth, ProviderHealthTable};
use crate::config::ResolverConfig;
use crate::errors::{MarketDataError, RetryClass};
use crate::industry::{match_label, IndustryCatalog};
use crate::models::{ConstituentInstrument, InstrumentSnapshot};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

/// Failover layer over every registered market data provider.
pub struct ProviderResolver {
    providers: Vec<Arc<dyn MarketDataProvider>>,
    health: ProviderHealthTable,
    catalog: IndustryCatalog,
    cache: TtlCache<Vec<ConstituentInstrument>>,
    config: ResolverConfig,
}

impl ProviderResolver {
    /// Create a resolver with the default industry catalog.
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>, config: ResolverConfig) -> Self {
        Self::with_catalog(providers, IndustryCatalog::default(), config)
    }

    /// Create a resolver and run the initialization step: providers are
    /// ordered by priority and registered in a fresh health table.
    pub fn with_catalog(
        mut providers: Vec<Arc<dyn MarketDataProvider>>,
        catalog: IndustryCatalog,
        config: ResolverConfig,
    ) -> Self {
        // Stable sort keeps registration order between equal priorities.
        providers.sort_by_key(|p| p.priority());

        let health = ProviderHealthTable::with_config(config.health());
        for provider in &providers {
            health.register(provider.id(), provider.priority());
        }

        info!(
            "Provider resolver initialized with {} providers: [{}]",
            providers.len(),
            providers
                .iter()
                .map(|p| p.id())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self {
            providers,
            health,
            cache: TtlCache::new(config.cache_ttl),
            catalog,
            config,
        }
    }

    /// Providers in the order they are tried.
    pub fn providers(&self) -> &[Arc<dyn MarketDataProvider>] {
        &self.providers
    }

    pub fn catalog(&self) -> &IndustryCatalog {
        &self.catalog
    }

    /// Current health rows, ordered by priority.
    pub fn health_snapshot(&self) -> Vec<ProviderHealth> {
        self.health.snapshot()
    }

    /// Reset every provider's counters and drop cached industry results.
    pub fn reset(&self) {
        self.health.reset_all();
        self.cache.clear();
    }

    /// Look up one instrument on the first eligible provider that answers.
    pub async fn lookup(&self, code: &str) -> Result<InstrumentSnapshot, MarketDataError> {
        self.attempt(
            "lookup",
            |caps| caps.supports_lookup,
            |provider| async move { provider.lookup(code).await },
        )
        .await
    }

    /// Expand a free-text industry label into board constituents.
    ///
    /// The label is matched against the catalog (exact, contains, synonym),
    /// each matched board is fetched through failover, and the merged list is
    /// deduplicated by code with the first occurrence kept. A label that
    /// matches nothing yields an empty list. Full results are cached per label.
    pub async fn search_industry(
        &self,
        label: &str,
    ) -> Result<Vec<ConstituentInstrument>, MarketDataError> {
        if let Some(cached) = self.cache.get(label) {
            debug!("Industry cache hit for '{}' ({} rows)", label, cached.len());
            return Ok(cached);
        }

        let matches = match_label(&self.catalog, label, self.config.max_boards_per_label);
        if matches.is_empty() {
            info!("Industry label '{}' matched no catalog board", label);
            self.cache.insert(label, Vec::new());
            return Ok(Vec::new());
        }

        debug!(
            "Industry label '{}' matched {:?}",
            label,
            matches.iter().map(|m| (&m.board, m.tier)).collect::<Vec<_>>()
        );

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        let mut failed_boards = 0usize;

        for board_match in &matches {
            let board = board_match.board.as_str();
            match self
                .attempt(
                    "search_industry",
                    |caps| caps.supports_industry,
                    |provider| async move { provider.search_industry(board).await },
                )
                .await
            {
                Ok(constituents) => {
                    for constituent in constituents {
                        if seen.insert(constituent.code.clone()) {
                            merged.push(constituent);
                        }
                    }
                }
                Err(e) => {
                    warn!("Board '{}' for label '{}' unavailable: {}", board, label, e);
                    failed_boards += 1;
                }
            }
        }

        if failed_boards == matches.len() {
            return Err(MarketDataError::ProviderExhausted {
                operation: format!("search_industry({})", label),
            });
        }

        // Partial results are served but not cached so the next call retries.
        if failed_boards == 0 {
            self.cache.insert(label, merged.clone());
        }

        Ok(merged)
    }

    async fn attempt<T, S, F, Fut>(
        &self,
        operation: &str,
        supports: S,
        call: F,
    ) -> Result<T, MarketDataError>
    where
        S: Fn(&ProviderCapabilities) -> bool,
        F: Fn(Arc<dyn MarketDataProvider>) -> Fut,
        Fut: Future<Output = Result<T, MarketDataError>>,
    {
        let mut last_error: Option<MarketDataError> = None;

        for provider in &self.providers {
            let provider_id = provider.id();

            if !supports(&provider.capabilities()) {
                continue;
            }

            if !self.health.is_eligible(provider_id) {
                debug!("Provider '{}' is cooling down, skipping", provider_id);
                continue;
            }

            let result =
                match tokio::time::timeout(self.config.call_timeout, call(Arc::clone(provider)))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(MarketDataError::Timeout {
                        provider: provider_id.to_string(),
                    }),
                };

            match result {
                Ok(value) => {
                    self.health.record_success(provider_id);
                    return Ok(value);
                }
                Err(e) => match e.retry_class() {
                    RetryClass::Never => {
                        // The provider answered authoritatively; it is healthy.
                        self.health.record_success(provider_id);
                        debug!("Terminal answer from '{}' for {}: {}", provider_id, operation, e);
                        return Err(e);
                    }
                    RetryClass::FailoverWithPenalty => {
                        self.health.record_failure(provider_id);
                        warn!(
                            "Provider '{}' failed {}: {}, trying next provider",
                            provider_id, operation, e
                        );
                        last_error = Some(e);
                    }
                    RetryClass::NextProvider => {
                        debug!("Provider '{}' skipped {}: {}", provider_id, operation, e);
                        last_error = Some(e);
                    }
                },
            }
        }

        match last_error {
            Some(e) => warn!("All providers exhausted for {} (last error: {})", operation, e),
            None => warn!("No eligible provider for {}", operation),
        }

        Err(MarketDataError::ProviderExhausted {
            operation: operation.to_string(),
        })
    }
}
