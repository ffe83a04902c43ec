//! Per-label result cache with a time-to-live.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::warn;

/// Small TTL cache keyed by normalized label.
///
/// Expired entries are dropped lazily on read.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, (Instant, V)>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, (Instant, V)>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Cache keys ignore case and surrounding whitespace.
    pub fn normalize(key: &str) -> String {
        key.trim().to_lowercase()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let key = Self::normalize(key);
        let mut entries = self.lock_entries();
        match entries.get(&key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: &str, value: V) {
        self.lock_entries()
            .insert(Self::normalize(key), (Instant::now(), value));
    }

    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
