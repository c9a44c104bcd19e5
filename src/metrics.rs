//! Kernel Metrics
//!
//! Cache hit/compute counters and point-in-time snapshots.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative counters shared by every kernel operation
#[derive(Debug, Default)]
pub struct KernelStats {
    embeddings_computed: AtomicU64,
    cache_hits: AtomicU64,
    similarities_computed: AtomicU64,
    similarity_cache_hits: AtomicU64,
    evictions: AtomicU64,
    rejected_inserts: AtomicU64,
}

impl KernelStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_embedding_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_embedding_computed(&self) {
        self.embeddings_computed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_similarity_hit(&self) {
        self.similarity_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_similarity_computed(&self) {
        self.similarities_computed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rejected_insert(&self) {
        self.rejected_inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Zero every counter
    pub fn reset(&self) {
        self.embeddings_computed.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.similarities_computed.store(0, Ordering::Relaxed);
        self.similarity_cache_hits.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.rejected_inserts.store(0, Ordering::Relaxed);
    }

    /// Capture counters together with the current cache sizes
    pub fn snapshot(&self, cache_size: usize, similarity_cache_size: usize) -> StatsSnapshot {
        StatsSnapshot {
            embeddings_computed: self.embeddings_computed.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            similarities_computed: self.similarities_computed.load(Ordering::Relaxed),
            similarity_cache_hits: self.similarity_cache_hits.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            rejected_inserts: self.rejected_inserts.load(Ordering::Relaxed),
            cache_size,
            similarity_cache_size,
        }
    }
}

/// Point-in-time view of kernel statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub embeddings_computed: u64,
    pub cache_hits: u64,
    pub similarities_computed: u64,
    pub similarity_cache_hits: u64,
    /// Entries dropped to make room (LRU)
    pub evictions: u64,
    /// Inserts refused by a full cache without eviction
    pub rejected_inserts: u64,
    /// Current number of cached embeddings
    pub cache_size: usize,
    /// Current number of cached pair similarities
    pub similarity_cache_size: usize,
}

impl StatsSnapshot {
    /// Fraction of embedding lookups served from cache
    pub fn embedding_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.embeddings_computed;
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64
    }

    /// Fraction of similarity lookups served from cache
    pub fn similarity_hit_rate(&self) -> f64 {
        let total = self.similarity_cache_hits + self.similarities_computed;
        if total == 0 {
            return 0.0;
        }
        self.similarity_cache_hits as f64 / total as f64
    }

    /// Get a summary of stats
    pub fn summary(&self) -> String {
        format!(
            "Embeddings: computed={} hits={} cached={} | Similarities: computed={} hits={} cached={} | evictions={} rejected={}",
            self.embeddings_computed,
            self.cache_hits,
            self.cache_size,
            self.similarities_computed,
            self.similarity_cache_hits,
            self.similarity_cache_size,
            self.evictions,
            self.rejected_inserts
        )
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
