//! Vector Module
//!
//! Text embeddings and the vector math used to compare them.

mod embedding;
mod similarity;

pub use embedding::{Embedder, Embedding, HashEmbedder};
pub use similarity::{abs_similarity, dot_product, magnitude, normalize_vector};
