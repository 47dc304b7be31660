//! Cache implementations for warp approximations.

mod approximation_cache;

pub use approximation_cache::{ApproximationCache, WarpKey};

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Approximations computed by this cache.
    pub builds: u64,
    /// Entries demoted from the hot tier.
    pub evictions: u64,
    pub hot_entries: usize,
    pub cold_entries: usize,
    /// Summed cost of the hot tier.
    pub hot_cost: usize,
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
