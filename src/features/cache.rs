//! Bounded least-recently-used cache for analysis results.
//!
//! Keys combine operation, video id, and target language. Entries older than
//! the TTL are treated as misses and dropped on access; when capacity is
//! exceeded the least-recently-used entry is evicted. A single mutex guards
//! the whole structure, which is enough at the expected request rates.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::utils::Clock;

struct Entry {
    value: Value,
    inserted_at: Instant,
    last_used: u64,
}

struct Inner {
    entries: HashMap<String, Entry>,
    // Monotonic recency counter; higher means more recently used.
    tick: u64,
}

pub struct TranscriptCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TranscriptCache {
    pub fn new(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(capacity),
                tick: 0,
            }),
            capacity,
            ttl,
            clock,
        }
    }

    /// Returns the cached value if present and fresh, bumping its recency.
    /// A stale entry is removed and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;

        let fresh = match inner.entries.get(key) {
            Some(entry) => now.duration_since(entry.inserted_at) < self.ttl,
            None => return None,
        };

        if !fresh {
            debug!(%key, "cache STALE (expired)");
            inner.entries.remove(key);
            return None;
        }

        inner.tick += 1;
        let tick = inner.tick;
        let entry = inner
            .entries
            .get_mut(key)
            .expect("entry checked above while holding the lock");
        entry.last_used = tick;
        Some(entry.value.clone())
    }

    /// Inserts or refreshes an entry, evicting the least-recently-used
    /// entry when over capacity.
    pub async fn put(&self, key: String, value: Value) {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;

        inner.tick += 1;
        let tick = inner.tick;
        inner.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
                last_used: tick,
            },
        );

        while inner.entries.len() > self.capacity {
            let victim = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match victim {
                Some(key) => {
                    debug!(key = %key, "cache EVICT (lru)");
                    inner.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Drops entries past their TTL. Called by the maintenance task so stale
    /// entries do not pin memory between accesses.
    pub async fn purge_stale(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut inner = self.inner.lock().await;
        let before = inner.entries.len();
        inner
            .entries
            .retain(|_, entry| now.duration_since(entry.inserted_at) < ttl);
        before - inner.entries.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
