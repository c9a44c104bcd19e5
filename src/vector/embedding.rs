//! Text Embeddings
//!
//! Deterministic text-to-vector functions and the shared embedding value.

use std::ops::Deref;
use std::sync::Arc;

use super::similarity::{abs_similarity, magnitude, normalize_vector};

/// Turns text into a raw (not necessarily normalized) vector.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector. The kernel normalizes whatever is returned, so a trained
/// sentence-embedding model can stand in for [`HashEmbedder`] without any
/// other change.
pub trait Embedder: Send + Sync {
    /// Length of every vector this embedder returns
    fn dimension(&self) -> usize;

    /// Compute the raw vector for `text`
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// L2-normalized embedding, cheap to clone
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Arc<[f32]>);

impl Embedding {
    /// Normalize a raw vector. An all-zero vector stays zero.
    pub fn from_raw(mut raw: Vec<f32>) -> Self {
        normalize_vector(&mut raw);
        Self(raw.into())
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Get embedding dimension
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn norm(&self) -> f32 {
        magnitude(&self.0)
    }

    /// True for the degenerate zero vector (e.g. the empty string)
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|x| *x == 0.0)
    }

    /// `|self · other|` in `[0, 1]`
    pub fn similarity(&self, other: &Embedding) -> f32 {
        abs_similarity(&self.0, &other.0)
    }
}

impl Deref for Embedding {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const CHAR_PREFIX: &[u8] = b"c:";
const WORD_PREFIX: &[u8] = b"w:";

const CHAR_WEIGHT: f32 = 0.5;
const WORD_WEIGHT: f32 = 1.0;

/// Feature-hashing embedder over character trigrams and words.
///
/// The text is lowercased; each character trigram (or each character, for
/// texts shorter than three) adds `0.5` and each alphanumeric word adds `1.0`
/// to bucket `fnv1a(feature) % dimension`. All weights are positive, so any
/// non-empty text produces a non-zero vector. This is lexical overlap, not
/// semantics.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    #[inline]
    fn bucket(&self, prefix: &[u8], feature: &str) -> usize {
        (fnv1a(prefix, feature.as_bytes()) % self.dimension as u64) as usize
    }
}

impl Embedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }

        let lower = text.to_lowercase();
        let chars: Vec<char> = lower.chars().collect();

        let mut feature = String::new();
        if chars.len() >= 3 {
            for window in chars.windows(3) {
                feature.clear();
                feature.extend(window);
                vector[self.bucket(CHAR_PREFIX, &feature)] += CHAR_WEIGHT;
            }
        } else {
            for c in &chars {
                feature.clear();
                feature.push(*c);
                vector[self.bucket(CHAR_PREFIX, &feature)] += CHAR_WEIGHT;
            }
        }

        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            vector[self.bucket(WORD_PREFIX, word)] += WORD_WEIGHT;
        }

        vector
    }
}

/// 64-bit FNV-1a over `prefix ++ bytes`
fn fnv1a(prefix: &[u8], bytes: &[u8]) -> u64 {
    prefix
        .iter()
        .chain(bytes)
        .fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
        })
}
