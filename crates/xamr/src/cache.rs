//! LRU cache for materialized level data.
//!
//! Every dense extraction of (snapshot, field, level) passes through this
//! cache, so repeated accessor touches do not go back to the delegated
//! reader. Eviction is memory-bounded, least-recently-used first.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;

use amr_common::{CacheStats, DenseArray};

/// Cache key: (snapshot index, field name hash, level).
pub type LevelKey = (usize, u64, usize);

/// LRU cache for materialized level arrays with memory-bounded eviction.
pub struct LevelCache {
    cache: LruCache<LevelKey, Arc<DenseArray>>,
    memory_limit: usize,
    current_memory: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl LevelCache {
    /// Create a cache with the given memory limit in bytes.
    pub fn new(memory_limit: usize) -> Self {
        // Estimate max entries assuming ~2MB per level array (64^3 f64s)
        let entry_size_estimate = 64 * 64 * 64 * 8;
        let max_entries = (memory_limit / entry_size_estimate).max(16);

        Self {
            cache: LruCache::new(
                NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN),
            ),
            memory_limit,
            current_memory: 0,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Try to get an entry. Counts a hit or a miss.
    pub fn get(&mut self, key: &LevelKey) -> Option<Arc<DenseArray>> {
        if let Some(data) = self.cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            Some(Arc::clone(data))
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Insert an entry, evicting least-recently-used entries as needed
    /// to stay within the memory limit.
    pub fn insert(&mut self, key: LevelKey, data: Arc<DenseArray>) {
        let data_size = data.len() * std::mem::size_of::<f64>();

        while self.current_memory + data_size > self.memory_limit && !self.cache.is_empty() {
            if let Some((_, evicted)) = self.cache.pop_lru() {
                let evicted_size = evicted.len() * std::mem::size_of::<f64>();
                self.current_memory = self.current_memory.saturating_sub(evicted_size);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(bytes = evicted_size, "evicted cached level data");
            }
        }

        // Entries larger than the whole budget are not cached
        if data_size <= self.memory_limit {
            self.cache.put(key, data);
            self.current_memory += data_size;
        }
    }

    /// Cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
            memory_bytes: self.current_memory as u64,
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.current_memory = 0;
    }
}

/// Hash a field name for use in cache keys.
pub fn hash_field(name: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}
