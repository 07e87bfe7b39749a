//! Cache Module
//!
//! Provides the in-memory result cache with per-class TTL expiration and LRU
//! eviction, shared across concurrent tool calls.

mod entry;
mod key;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, TtlClass, TtlPolicy};
pub use key::{normalize_symbol, CacheKey, CacheKeyBuilder};
pub use lru::LruTracker;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::{CacheHit, CacheStore};

// == Public Constants ==
/// Default maximum number of cached results
pub const DEFAULT_CAPACITY: usize = 100;
