//! Instrumentation counters for caches and delegated readers.

/// Statistics about the level-data materialization cache.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub memory_bytes: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Call counters exposed by a delegated reader.
///
/// Tests use these to verify that cached accesses do not trigger repeated
/// reads or derivative recomputation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Number of `read_level` calls served.
    pub level_reads: u64,
    /// Number of `gradient` calls served.
    pub gradient_reads: u64,
}
