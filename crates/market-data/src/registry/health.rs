//! Process-wide provider health table.
//!
//! Tracks, per registered provider, its static priority, the number of
//! consecutive failures and an optional cool-down deadline. A provider that
//! reaches the failure threshold is excluded from selection until the
//! cool-down expires, after which it becomes eligible again with a clean
//! counter.
//!
//! Every read-modify-write happens under one mutex so concurrent pipelines
//! cannot under-count failures.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

/// Default number of consecutive failures before a provider is disabled.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Default cool-down window.
pub const DEFAULT_COOL_DOWN: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct Entry {
    priority: u8,
    consecutive_failures: u32,
    disabled_until: Option<Instant>,
}

/// Health table configuration.
#[derive(Clone, Debug)]
pub struct HealthConfig {
    pub failure_threshold: u32,
    pub cool_down: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cool_down: DEFAULT_COOL_DOWN,
        }
    }
}

/// Snapshot of one provider's health row.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealth {
    pub provider: String,
    pub priority: u8,
    pub consecutive_failure_count: u32,
    /// Wall-clock end of the cool-down, if the provider is disabled.
    pub disabled_until: Option<DateTime<Utc>>,
}

impl ProviderHealth {
    pub fn is_disabled(&self) -> bool {
        self.disabled_until.is_some()
    }
}

/// Thread-safe health table shared by every resolver call.
pub struct ProviderHealthTable {
    entries: Mutex<HashMap<String, Entry>>,
    config: HealthConfig,
}

impl ProviderHealthTable {
    pub fn new() -> Self {
        Self::with_config(HealthConfig::default())
    }

    pub fn with_config(config: HealthConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Lock the table, recovering from poison.
    ///
    /// A poisoned lock means another thread panicked mid-update; the counters
    /// are still usable.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Provider health mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Register a provider with a clean row. Re-registering resets it.
    pub fn register(&self, provider: &str, priority: u8) {
        let mut entries = self.lock_entries();
        entries.insert(
            provider.to_string(),
            Entry {
                priority,
                consecutive_failures: 0,
                disabled_until: None,
            },
        );
        debug!("Provider health: registered '{}' (priority {})", provider, priority);
    }

    /// Whether the provider may be selected right now.
    ///
    /// An expired cool-down is cleared here and the counter reset.
    /// Unknown providers are eligible.
    pub fn is_eligible(&self, provider: &str) -> bool {
        let mut entries = self.lock_entries();
        let Some(entry) = entries.get_mut(provider) else {
            return true;
        };

        match entry.disabled_until {
            None => true,
            Some(until) if Instant::now() >= until => {
                info!(
                    "Provider health: cool-down over for '{}', eligible again",
                    provider
                );
                entry.disabled_until = None;
                entry.consecutive_failures = 0;
                true
            }
            Some(_) => false,
        }
    }

    pub fn record_success(&self, provider: &str) {
        let mut entries = self.lock_entries();
        if let Some(entry) = entries.get_mut(provider) {
            if entry.consecutive_failures > 0 {
                debug!(
                    "Provider health: success for '{}', failure count reset",
                    provider
                );
            }
            entry.consecutive_failures = 0;
            entry.disabled_until = None;
        }
    }

    /// Count a failure. Returns `true` when this failure disabled the provider.
    pub fn record_failure(&self, provider: &str) -> bool {
        let mut entries = self.lock_entries();
        let entry = entries.entry(provider.to_string()).or_insert(Entry {
            priority: u8::MAX,
            consecutive_failures: 0,
            disabled_until: None,
        });

        entry.consecutive_failures += 1;

        if entry.disabled_until.is_none()
            && entry.consecutive_failures >= self.config.failure_threshold
        {
            entry.disabled_until = Some(Instant::now() + self.config.cool_down);
            warn!(
                "Provider health: disabling '{}' for {:?} after {} consecutive failures",
                provider, self.config.cool_down, entry.consecutive_failures
            );
            return true;
        }

        debug!(
            "Provider health: failure for '{}' ({}/{})",
            provider, entry.consecutive_failures, self.config.failure_threshold
        );
        false
    }

    pub fn failure_count(&self, provider: &str) -> u32 {
        self.lock_entries()
            .get(provider)
            .map(|e| e.consecutive_failures)
            .unwrap_or(0)
    }

    /// Clear every counter and cool-down, keeping registrations.
    pub fn reset_all(&self) {
        let mut entries = self.lock_entries();
        for entry in entries.values_mut() {
            entry.consecutive_failures = 0;
            entry.disabled_until = None;
        }
        info!("Provider health: all counters reset");
    }

    /// Current rows ordered by priority, then provider id.
    pub fn snapshot(&self) -> Vec<ProviderHealth> {
        let entries = self.lock_entries();
        let now = Instant::now();
        let wall_now = Utc::now();

        let mut rows: Vec<ProviderHealth> = entries
            .iter()
            .map(|(provider, entry)| ProviderHealth {
                provider: provider.clone(),
                priority: entry.priority,
                consecutive_failure_count: entry.consecutive_failures,
                disabled_until: entry
                    .disabled_until
                    .filter(|until| *until > now)
                    .and_then(|until| chrono::Duration::from_std(until - now).ok())
                    .map(|remaining| wall_now + remaining),
            })
            .collect();

        rows.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.provider.cmp(&b.provider))
        });
        rows
    }
}

impl Default for ProviderHealthTable {
    fn default() -> Self {
        Self::new()
    }
}
