//! Two-tier, single-flight cache of warp approximations.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use projection::Transform;
use raster_common::PixelRect;
use tracing::debug;

use super::CacheStats;
use crate::approximation::WarpApproximation;
use crate::builder::WarpBuilder;
use crate::config::WarpConfig;
use crate::error::Result;

/// Cache key: a transform, compared by identity, and a domain.
///
/// The key keeps its transform alive, so the identity cannot be reused by
/// another transform while the entry exists.
#[derive(Clone)]
pub struct WarpKey {
    transform: Arc<dyn Transform>,
    domain: PixelRect,
}

impl WarpKey {
    pub fn new(transform: Arc<dyn Transform>, domain: PixelRect) -> Self {
        Self { transform, domain }
    }

    pub fn transform(&self) -> &Arc<dyn Transform> {
        &self.transform
    }

    pub fn domain(&self) -> PixelRect {
        self.domain
    }

    fn identity(&self) -> *const () {
        Arc::as_ptr(&self.transform) as *const ()
    }
}

impl PartialEq for WarpKey {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity() && self.domain == other.domain
    }
}

impl Eq for WarpKey {}

impl Hash for WarpKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
        self.domain.hash(state);
    }
}

impl fmt::Debug for WarpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarpKey")
            .field("transform", &self.identity())
            .field("domain", &self.domain)
            .finish()
    }
}

/// Outcome of one build, shared by every caller waiting on it.
type Slot = Arc<OnceCell<Result<Arc<WarpApproximation>>>>;

struct Tiers {
    /// Recently used entries, bounded by total cost.
    hot: LruCache<WarpKey, Arc<WarpApproximation>>,
    hot_cost: usize,
    /// Entries demoted from `hot`, bounded by count.
    cold: LruCache<WarpKey, Arc<WarpApproximation>>,
    /// Builds in progress, one per key.
    in_flight: HashMap<WarpKey, Slot>,
}

impl Tiers {
    fn lookup(&mut self, key: &WarpKey, budget: usize, evictions: &AtomicU64) -> Option<Arc<WarpApproximation>> {
        if let Some(found) = self.hot.get(key) {
            return Some(found.clone());
        }
        let (key, found) = self.cold.pop_entry(key)?;
        self.insert_hot(key, found.clone(), budget, evictions);
        Some(found)
    }

    fn insert_hot(&mut self, key: WarpKey, value: Arc<WarpApproximation>, budget: usize, evictions: &AtomicU64) {
        let cost = value.cost();
        if cost > budget {
            debug!(domain = %key.domain, cost, budget, "Approximation exceeds hot budget");
            self.push_cold(key, value);
            return;
        }

        if let Some(old) = self.hot.put(key, value) {
            self.hot_cost = self.hot_cost.saturating_sub(old.cost());
        }
        self.hot_cost += cost;

        // The entry just inserted is most recent, so it is never demoted here.
        while self.hot_cost > budget {
            let Some((demoted, entry)) = self.hot.pop_lru() else {
                break;
            };
            self.hot_cost = self.hot_cost.saturating_sub(entry.cost());
            evictions.fetch_add(1, Ordering::Relaxed);
            debug!(domain = %demoted.domain, cost = entry.cost(), "Demoted approximation to cold tier");
            self.push_cold(demoted, entry);
        }
    }

    fn push_cold(&mut self, key: WarpKey, value: Arc<WarpApproximation>) {
        if let Some((dropped, _)) = self.cold.push(key, value) {
            debug!(domain = %dropped.domain, "Dropped approximation from cold tier");
        }
    }
}

/// Bounded cache of approximations with at most one build in flight per key.
///
/// The hot tier is an LRU bounded by the summed [`WarpApproximation::cost`]
/// of its entries; entries pushed out of it move to a cold LRU bounded by
/// count, and come back to the hot tier when hit. Concurrent requests for a
/// key that is being built wait for that build and share its result.
/// Requests for other keys are not blocked by it.
pub struct ApproximationCache {
    builder: WarpBuilder,
    cost_budget: usize,
    tiers: Mutex<Tiers>,
    hits: AtomicU64,
    misses: AtomicU64,
    builds: AtomicU64,
    evictions: AtomicU64,
}

impl ApproximationCache {
    /// Create a cache sized by `config`, building with a builder on the same
    /// configuration.
    pub fn new(config: WarpConfig) -> Result<Self> {
        let cost_budget = config.cache_cost_budget;
        let cold_capacity = NonZeroUsize::new(config.cache_cold_capacity)
            .unwrap_or(NonZeroUsize::MIN);
        let builder = WarpBuilder::new(config)?;

        Ok(Self {
            cost_budget,
            tiers: Mutex::new(Tiers {
                hot: LruCache::unbounded(),
                hot_cost: 0,
                cold: LruCache::new(cold_capacity),
                in_flight: HashMap::new(),
            }),
            builder,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            builds: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    pub fn builder(&self) -> &WarpBuilder {
        &self.builder
    }

    /// Cached approximation of `transform` over `domain`, built on a miss.
    pub fn get_or_build(
        &self,
        transform: Arc<dyn Transform>,
        domain: PixelRect,
    ) -> Result<Arc<WarpApproximation>> {
        let key = WarpKey::new(transform, domain);
        self.get_or_compute(key, |key| {
            self.builder.build(key.transform().clone(), key.domain())
        })
    }

    /// Cached value for `key`, computed with `compute` on a miss.
    ///
    /// If another caller is already computing `key`, this waits for its
    /// outcome instead of computing again. A failure is returned to every
    /// caller that waited on it but is not cached: the next request after it
    /// computes again.
    pub fn get_or_compute<F>(&self, key: WarpKey, compute: F) -> Result<Arc<WarpApproximation>>
    where
        F: FnOnce(&WarpKey) -> Result<WarpApproximation>,
    {
        let slot = {
            let mut tiers = self.tiers.lock();
            if let Some(found) = tiers.lookup(&key, self.cost_budget, &self.evictions) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(found);
            }
            self.misses.fetch_add(1, Ordering::Relaxed);
            tiers
                .in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let mut computed = false;
        let outcome = slot
            .get_or_init(|| {
                computed = true;
                self.builds.fetch_add(1, Ordering::Relaxed);
                compute(&key).map(Arc::new)
            })
            .clone();

        if computed {
            let mut tiers = self.tiers.lock();
            let owned = tiers
                .in_flight
                .get(&key)
                .is_some_and(|current| Arc::ptr_eq(current, &slot));
            if owned {
                tiers.in_flight.remove(&key);
                if let Ok(value) = &outcome {
                    tiers.insert_hot(key, value.clone(), self.cost_budget, &self.evictions);
                }
            }
        }

        outcome
    }

    /// Whether `key` is cached in either tier, without touching LRU order.
    pub fn contains(&self, key: &WarpKey) -> bool {
        let tiers = self.tiers.lock();
        tiers.hot.contains(key) || tiers.cold.contains(key)
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let tiers = self.tiers.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            hot_entries: tiers.hot.len(),
            cold_entries: tiers.cold.len(),
            hot_cost: tiers.hot_cost,
        }
    }

    /// Clear all cached entries. Builds in progress are unaffected.
    pub fn clear(&self) {
        let mut tiers = self.tiers.lock();
        tiers.hot.clear();
        tiers.cold.clear();
        tiers.hot_cost = 0;
    }

    /// Number of cached entries in both tiers.
    pub fn len(&self) -> usize {
        let tiers = self.tiers.lock();
        tiers.hot.len() + tiers.cold.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
