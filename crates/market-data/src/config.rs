use std::time::Duration;

use crate::registry::HealthConfig;

/// Provider resolver settings.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Consecutive failures before a provider is disabled.
    pub failure_threshold: u32,
    pub cool_down: Duration,
    /// Timeout applied to each individual provider call.
    pub call_timeout: Duration,
    /// How long `search_industry` results stay cached per label.
    pub cache_ttl: Duration,
    /// Maximum catalog boards expanded for one label.
    pub max_boards_per_label: usize,
    /// `xq_a_token` cookie for the Xueqiu provider.
    pub xueqiu_token: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cool_down: Duration::from_secs(300),
            call_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(3600),
            max_boards_per_label: 3,
            xueqiu_token: None,
        }
    }
}

impl ResolverConfig {
    /// Read `INVESTNOTE_*` variables, keeping defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let secs = |name: &str, fallback: Duration| -> Duration {
            std::env::var(name)
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(fallback)
        };

        Self {
            failure_threshold: std::env::var("INVESTNOTE_PROVIDER_FAILURE_THRESHOLD")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .filter(|v: &u32| *v > 0)
                .unwrap_or(defaults.failure_threshold),
            cool_down: secs("INVESTNOTE_PROVIDER_COOL_DOWN_SECS", defaults.cool_down),
            call_timeout: secs("INVESTNOTE_PROVIDER_TIMEOUT_SECS", defaults.call_timeout),
            cache_ttl: secs("INVESTNOTE_INDUSTRY_CACHE_TTL_SECS", defaults.cache_ttl),
            max_boards_per_label: std::env::var("INVESTNOTE_MAX_BOARDS_PER_LABEL")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_boards_per_label),
            xueqiu_token: std::env::var("INVESTNOTE_XUEQIU_TOKEN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn health(&self) -> HealthConfig {
        HealthConfig {
            failure_threshold: self.failure_threshold,
            cool_down: self.cool_down,
        }
    }
}
