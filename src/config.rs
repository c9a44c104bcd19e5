//! Kernel Configuration

use crate::cache::EvictionPolicy;
use crate::error::KernelError;

/// Kernel configuration
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Embedding dimension
    pub dimension: usize,

    /// Maximum number of cached embeddings
    pub embedding_cache_capacity: usize,

    /// Maximum number of cached pair similarities
    pub similarity_cache_capacity: usize,

    /// Default edge threshold for relationship graphs and themes
    pub similarity_threshold: f32,

    /// Whether embeddings and similarities are memoized at all
    pub cache_enabled: bool,

    /// What happens when a cache is full
    pub eviction: EvictionPolicy,

    /// Number of scoring threads (0 = auto-detect)
    pub workers: usize,

    /// Minimum number of items before scoring fans out to worker threads
    pub parallel_threshold: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            dimension: 256,
            embedding_cache_capacity: 10_000,
            similarity_cache_capacity: 100_000,
            similarity_threshold: 0.7,
            cache_enabled: true,
            eviction: EvictionPolicy::Lru,
            workers: 0, // Auto-detect (num_cpus)
            parallel_threshold: 256,
        }
    }
}

impl KernelConfig {
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the same capacity for both caches
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.embedding_cache_capacity = capacity;
        self.similarity_cache_capacity = capacity;
        self
    }

    pub fn with_embedding_capacity(mut self, capacity: usize) -> Self {
        self.embedding_cache_capacity = capacity;
        self
    }

    pub fn with_similarity_capacity(mut self, capacity: usize) -> Self {
        self.similarity_cache_capacity = capacity;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_eviction(mut self, policy: EvictionPolicy) -> Self {
        self.eviction = policy;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_parallel_threshold(mut self, items: usize) -> Self {
        self.parallel_threshold = items;
        self
    }

    /// Resolved worker count
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }

    /// Reject configurations the kernel cannot run with
    pub fn validate(&self) -> Result<(), KernelError> {
        if self.dimension == 0 {
            return Err(KernelError::InvalidConfig(
                "dimension must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(KernelError::InvalidConfig(format!(
                "similarity threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}
