//! Keyed TTL cache with a bounded size.
//!
//! Entries older than the TTL are never returned. When an insert would push
//! the cache to `capacity`, expired entries are dropped first, then the
//! oldest entries until the size is back at the low-water mark
//! (`capacity * 4 / 5`).
//!
//! The `*_at` variants take the current instant explicitly so that expiry
//! can be tested without sleeping.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::warn;

pub struct TtlCache<K, V> {
    entries: HashMap<K, TtlEntry<V>>,
    ttl: Duration,
    capacity: usize,
}

struct TtlEntry<V> {
    data: V,
    created_at: Instant,
}

impl<V> TtlEntry<V> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    /// A capacity of zero is treated as one.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_at(key, Instant::now())
    }

    pub fn get_at<Q>(&mut self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expired = self.entries.get(key)?.is_expired(now, self.ttl);
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.data.clone())
    }

    pub fn insert(&mut self, key: K, data: V) {
        self.insert_at(key, data, Instant::now());
    }

    pub fn insert_at(&mut self, key: K, data: V, now: Instant) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict(now);
        }
        self.entries.insert(
            key,
            TtlEntry {
                data,
                created_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn low_water_mark(&self) -> usize {
        self.capacity * 4 / 5
    }

    fn evict(&mut self, now: Instant) {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));

        let low_water = self.low_water_mark();
        if self.entries.len() > low_water {
            let mut by_age: Vec<(K, Instant)> = self
                .entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.created_at))
                .collect();
            by_age.sort_by_key(|(_, created_at)| *created_at);

            let excess = self.entries.len() - low_water;
            for (key, _) in by_age.into_iter().take(excess) {
                self.entries.remove(&key);
            }
        }

        warn!(
            evicted = before - self.entries.len(),
            remaining = self.entries.len(),
            capacity = self.capacity,
            "cache full, evicted entries"
        );
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("len", &self.entries.len())
            .finish()
    }
}
