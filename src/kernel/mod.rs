//! Similarity Kernel
//!
//! Memoized embeddings and pairwise similarities, with neighbor search,
//! relationship graphs and theme clustering built on top of them.
//!
//! A [`Kernel`] is an ordinary value: construct one and pass it to whatever
//! needs it. It is `Send + Sync`, so wrap it in an `Arc` to share across
//! threads.

mod graph;
mod parallel;
mod search;
mod themes;

pub use graph::{Relation, RelationshipGraph};
pub use search::Neighbor;
pub use themes::{extract_label, ThemeCluster, FALLBACK_LABEL};

use hashbrown::Equivalent;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::{BoundedCache, InsertOutcome};
use crate::config::KernelConfig;
use crate::error::KernelError;
use crate::metrics::{KernelStats, StatsSnapshot};
use crate::vector::{Embedder, Embedding, HashEmbedder};

/// Unordered text pair, stored with the smaller string first
type PairKey = (String, String);

/// Borrowed form of a [`PairKey`]. Hashes identically to the owned tuple, so
/// cache lookups allocate nothing.
#[derive(Debug, Clone, Copy, Hash)]
struct PairRef<'a>(&'a str, &'a str);

impl<'a> PairRef<'a> {
    fn ordered(a: &'a str, b: &'a str) -> Self {
        if a <= b {
            PairRef(a, b)
        } else {
            PairRef(b, a)
        }
    }

    fn to_key(self) -> PairKey {
        (self.0.to_string(), self.1.to_string())
    }
}

impl Equivalent<PairKey> for PairRef<'_> {
    fn equivalent(&self, key: &PairKey) -> bool {
        self.0 == key.0 && self.1 == key.1
    }
}

/// Embedding and similarity cache with search and clustering on top
pub struct Kernel {
    config: KernelConfig,
    embedder: Box<dyn Embedder>,
    embeddings: Mutex<BoundedCache<String, Embedding>>,
    similarities: Mutex<BoundedCache<PairKey, f32>>,
    stats: KernelStats,
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl Kernel {
    /// Create a kernel using the hash embedder at the configured dimension
    pub fn new(config: KernelConfig) -> Result<Self, KernelError> {
        let embedder = HashEmbedder::new(config.dimension);
        Self::with_embedder(config, Box::new(embedder))
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        let config = KernelConfig::default();
        let embedder = HashEmbedder::new(config.dimension);
        Self::build(config, Box::new(embedder))
    }

    /// Create a kernel around a custom embedder.
    ///
    /// The embedder's dimension must match `config.dimension`.
    pub fn with_embedder(
        config: KernelConfig,
        embedder: Box<dyn Embedder>,
    ) -> Result<Self, KernelError> {
        config.validate()?;
        if embedder.dimension() != config.dimension {
            return Err(KernelError::DimensionMismatch {
                expected: config.dimension,
                actual: embedder.dimension(),
            });
        }
        Ok(Self::build(config, embedder))
    }

    fn build(config: KernelConfig, embedder: Box<dyn Embedder>) -> Self {
        Self {
            embeddings: Mutex::new(BoundedCache::new(
                config.embedding_cache_capacity,
                config.eviction,
            )),
            similarities: Mutex::new(BoundedCache::new(
                config.similarity_cache_capacity,
                config.eviction,
            )),
            embedder,
            stats: KernelStats::new(),
            config,
        }
    }

    /// Get configuration
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Embed `text`, serving from cache when possible.
    ///
    /// Never fails: the empty string embeds to the zero vector.
    pub fn embed(&self, text: &str) -> Embedding {
        if self.config.cache_enabled {
            let cached = self.embeddings.lock().get(text);
            if let Some(embedding) = cached {
                self.stats.record_embedding_hit();
                return embedding;
            }
        }

        let raw = self.embedder.embed(text);
        debug_assert_eq!(raw.len(), self.config.dimension, "embedder returned wrong dimension");
        let embedding = Embedding::from_raw(raw);
        self.stats.record_embedding_computed();

        if self.config.cache_enabled {
            let outcome = self
                .embeddings
                .lock()
                .insert(text.to_string(), embedding.clone());
            self.record_insert(outcome);
        }
        embedding
    }

    /// Similarity of two texts as `|embed(a) · embed(b)|`, in `[0, 1]`.
    ///
    /// Symmetric: `(a, b)` and `(b, a)` share one cache entry.
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        let key = self.config.cache_enabled.then(|| PairRef::ordered(a, b));

        if let Some(key) = &key {
            let cached = self.similarities.lock().get(key);
            if let Some(score) = cached {
                self.stats.record_similarity_hit();
                return score;
            }
        }

        // Similarity lock is released before the embedding cache is touched
        let score = self.embed(a).similarity(&self.embed(b));
        self.stats.record_similarity_computed();

        if let Some(key) = key {
            let outcome = self.similarities.lock().insert(key.to_key(), score);
            self.record_insert(outcome);
        }
        score
    }

    /// Whether an embedding for `text` is currently cached
    pub fn is_cached(&self, text: &str) -> bool {
        self.embeddings.lock().contains_key(text)
    }

    /// Counters plus current cache sizes
    pub fn stats(&self) -> StatsSnapshot {
        let cache_size = self.embeddings.lock().len();
        let similarity_cache_size = self.similarities.lock().len();
        self.stats.snapshot(cache_size, similarity_cache_size)
    }

    /// Empty both caches. Counters keep accumulating.
    pub fn clear_cache(&self) {
        let mut embeddings = self.embeddings.lock();
        let mut similarities = self.similarities.lock();
        debug!(
            embeddings = embeddings.len(),
            similarities = similarities.len(),
            "Clearing kernel caches"
        );
        embeddings.clear();
        similarities.clear();
    }

    /// Zero all counters without touching cached entries
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Caller-supplied threshold, or the configured default when absent,
    /// negative or NaN
    pub(crate) fn resolve_threshold(&self, threshold: Option<f32>) -> f32 {
        match threshold {
            Some(t) if t >= 0.0 => t,
            _ => self.config.similarity_threshold,
        }
    }

    fn record_insert(&self, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Evicted => {
                trace!("Evicted least recently used cache entry");
                self.stats.record_eviction();
            }
            InsertOutcome::Rejected => self.stats.record_rejected_insert(),
            InsertOutcome::Stored | InsertOutcome::Updated => {}
        }
    }
}
