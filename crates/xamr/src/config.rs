//! Dataset configuration.

/// Tunables for dataset construction.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Memory budget for the level-data materialization cache, in bytes.
    pub cache_memory_limit: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            // 256 MB of cached level data
            cache_memory_limit: 256 * 1024 * 1024,
        }
    }
}
