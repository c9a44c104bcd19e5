//! SCRIPTURA - Embedding and Similarity Caching Kernel
//!
//! Deterministic text embeddings with bounded memoization, pairwise
//! similarity, top-k neighbor search, relationship graphs and greedy theme
//! clustering for scripture study tools.

pub mod cache;
pub mod config;
pub mod corpus;
pub mod error;
pub mod kernel;
pub mod metrics;
pub mod vector;

pub use cache::{BoundedCache, EvictionPolicy};
pub use config::KernelConfig;
pub use error::KernelError;
pub use kernel::{Kernel, Neighbor, Relation, RelationshipGraph, ThemeCluster};
pub use metrics::StatsSnapshot;
pub use vector::{Embedder, Embedding, HashEmbedder};
