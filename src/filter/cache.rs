use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::filter::kernel::{FilterKernel, generate_kernel};
use crate::filter::plan::FilterType;
use crate::foundation::error::BlitResult;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

type Bucket = LruCache<u32, Arc<FilterKernel>>;

struct Inner {
    buckets: HashMap<(FilterType, u32), Bucket>,
    stats: FilterCacheStats,
}

/// Generated kernels, bucketed by (filter type, kernel size) and keyed by scale factor.
///
/// Each bucket holds at most `depth` kernels. A hit moves the kernel to the front; a miss on a
/// full bucket evicts the least recently used one.
pub struct FilterCache {
    depth: NonZeroUsize,
    inner: Mutex<Inner>,
}

impl FilterCache {
    pub fn new(depth: usize) -> Self {
        Self {
            depth: NonZeroUsize::new(depth).unwrap_or(NonZeroUsize::MIN),
            inner: Mutex::new(Inner {
                buckets: HashMap::new(),
                stats: FilterCacheStats::default(),
            }),
        }
    }

    pub fn get(&self, ty: FilterType, size: u32, scale: u32) -> BlitResult<Arc<FilterKernel>> {
        let mut guard = self.inner.lock();
        let Inner { buckets, stats } = &mut *guard;
        let bucket = buckets
            .entry((ty, size))
            .or_insert_with(|| LruCache::new(self.depth));
        if let Some(kernel) = bucket.get(&scale) {
            stats.hits = stats.hits.saturating_add(1);
            return Ok(Arc::clone(kernel));
        }

        let kernel = Arc::new(generate_kernel(size, scale)?);
        stats.misses = stats.misses.saturating_add(1);
        if bucket.push(scale, Arc::clone(&kernel)).is_some() {
            stats.evictions = stats.evictions.saturating_add(1);
            tracing::trace!(?ty, size, "filter kernel evicted");
        }
        Ok(kernel)
    }

    /// Cached scale factors of one bucket, most recently used first.
    pub fn cached_scales(&self, ty: FilterType, size: u32) -> Vec<u32> {
        let inner = self.inner.lock();
        inner
            .buckets
            .get(&(ty, size))
            .map(|b| b.iter().map(|(scale, _)| *scale).collect())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> FilterCacheStats {
        self.inner.lock().stats.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/cache.rs"]
mod tests;
