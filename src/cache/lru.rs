//! LRU Tracker Module
//!
//! Tracks access recency of cache keys for eviction.

use std::collections::VecDeque;

use crate::cache::CacheKey;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Every touch moves a key to the front, so two keys never share a
/// recency position.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<CacheKey>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &CacheKey) {
        self.remove(key);
        self.order.push_front(key.clone());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &CacheKey) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<CacheKey> {
        self.order.pop_back()
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&CacheKey> {
        self.order.back()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
