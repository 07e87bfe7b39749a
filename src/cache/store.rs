//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, LruTracker, TtlClass, TtlPolicy};

// == Cache Hit ==
/// A valid entry returned by [`CacheStore::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit<V> {
    pub value: V,
    /// Time since the value was stored
    pub age: Duration,
    /// Time until the value expires
    pub remaining: Duration,
    pub ttl_class: TtlClass,
}

// == Cache Store ==
/// Bounded cache with LRU eviction and per-class TTL.
///
/// Expired entries are dropped lazily on lookup; [`CacheStore::purge_expired`]
/// sweeps the rest.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    lru: LruTracker,
    stats: CacheStats,
    capacity: usize,
    policy: TtlPolicy,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize, policy: TtlPolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::new(),
            stats: CacheStats::new(capacity),
            capacity,
            policy,
        }
    }

    // == Get ==
    /// Looks up a key. Absent and expired entries are both a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<CacheHit<V>> {
        self.get_at(key, Instant::now())
    }

    /// [`CacheStore::get`] evaluated at an explicit instant.
    pub fn get_at(&mut self, key: &CacheKey, now: Instant) -> Option<CacheHit<V>> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired_at(now) {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            self.stats.set_size(self.entries.len());
            debug!(key = %key, "cache entry expired");
            return None;
        }

        let hit = CacheHit {
            value: entry.value.clone(),
            age: entry.age_at(now),
            remaining: entry.ttl_remaining_at(now),
            ttl_class: entry.ttl_class,
        };
        self.stats.record_hit();
        self.lru.touch(key);
        Some(hit)
    }

    // == Put ==
    /// Stores a value, overwriting any previous one and resetting its age.
    ///
    /// A new key on a full store first evicts the least recently used entry.
    pub fn put(&mut self, key: CacheKey, value: V, ttl_class: TtlClass) {
        self.put_at(key, value, ttl_class, Instant::now());
    }

    /// [`CacheStore::put`] evaluated at an explicit instant.
    pub fn put_at(&mut self, key: CacheKey, value: V, ttl_class: TtlClass, now: Instant) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        let entry = CacheEntry::new(value, ttl_class, self.policy.ttl(ttl_class), now);
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_size(self.entries.len());
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    // == Purge Expired ==
    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&mut self, now: Instant) -> usize {
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_size(self.entries.len());
        expired.len()
    }

    // == Clear ==
    /// Drops all entries and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.reset();
    }

    /// Checks for a key without touching recency or counters.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> TtlPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
