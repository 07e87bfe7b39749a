//! Shared Cache Handle
//!
//! Serializes every store operation through one async mutex so concurrent
//! tool calls observe a single total order of gets and puts.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{CacheHit, CacheKey, CacheStats, CacheStore, TtlClass, TtlPolicy};

/// Cloneable handle to one [`CacheStore`] owned for the process lifetime.
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Arc<Mutex<CacheStore<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> SharedCache<V> {
    pub fn new(store: CacheStore<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn with_capacity(capacity: usize, policy: TtlPolicy) -> Self {
        Self::new(CacheStore::new(capacity, policy))
    }

    pub async fn get(&self, key: &CacheKey) -> Option<CacheHit<V>> {
        self.inner.lock().await.get(key)
    }

    pub async fn put(&self, key: CacheKey, value: V, ttl_class: TtlClass) {
        self.inner.lock().await.put(key, value, ttl_class);
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    pub async fn purge_expired(&self) -> usize {
        self.inner.lock().await.purge_expired()
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
