//! Key→value read cache with a fixed time-to-live.
//!
//! There is no size bound and no LRU: entries only disappear when they are
//! read after expiring, invalidated, or cleared. Time comes from an injected
//! [`Clock`] so tests can move it by hand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Millisecond wall clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time via chrono (backed by `Date.now()` on wasm).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Hand-driven clock for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    written_ms: u64,
}

pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    ttl_ms: u64,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_ms,
            clock,
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// Store `value` stamped with the current time, replacing any prior entry.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let written_ms = self.clock.now_ms();
        self.entries
            .insert(key.into(), CacheEntry { value, written_ms });
    }

    /// Value for `key` if it is younger than the TTL. Expired entries are evicted.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let expired = match self.entries.get(key) {
            None => return None,
            Some(entry) => now.saturating_sub(entry.written_ms) >= self.ttl_ms,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Same expiry check as [`get`](Self::get), including eviction.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
