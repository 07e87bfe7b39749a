//! Cache Entry Module
//!
//! Defines individual cache entries and the TTL classes they are stored under.

use std::time::{Duration, Instant};

use serde::Serialize;

// == TTL Class ==
/// Freshness class of a cached result.
///
/// The store only receives the class; which tool maps to which class is
/// decided by the tool catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlClass {
    /// Volatile data: prices, news, option chains
    Short,
    /// Slow-changing data: fundamentals, holders, recommendations
    Long,
}

// == TTL Policy ==
/// Durations assigned to each [`TtlClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub short: Duration,
    pub long: Duration,
}

impl TtlPolicy {
    pub fn new(short: Duration, long: Duration) -> Self {
        Self { short, long }
    }

    /// Builds a policy from whole seconds.
    pub fn from_secs(short: u64, long: u64) -> Self {
        Self::new(Duration::from_secs(short), Duration::from_secs(long))
    }

    /// Returns the time-to-live for a class.
    pub fn ttl(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Short => self.short,
            TtlClass::Long => self.long,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::from_secs(300, 3600)
    }
}

// == Cache Entry ==
/// A stored value with the instant it was written and its freshness class.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the value was written (reset on overwrite)
    pub stored_at: Instant,
    /// Freshness class
    pub ttl_class: TtlClass,
    /// Resolved TTL at write time
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    pub fn new(value: V, ttl_class: TtlClass, ttl: Duration, stored_at: Instant) -> Self {
        Self {
            value,
            stored_at,
            ttl_class,
            ttl,
        }
    }

    // == Age ==
    /// Time elapsed since the value was stored, as observed at `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now`.
    ///
    /// An entry is valid only while `age < ttl`; once the full TTL has
    /// elapsed it is expired.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.age_at(now) >= self.ttl
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Remaining lifetime at `now`, zero once expired.
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.ttl.saturating_sub(self.age_at(now))
    }
}
