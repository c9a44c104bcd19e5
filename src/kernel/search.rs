//! Neighbor Search
//!
//! Top-k ranking of a candidate list against a query text.

use super::parallel::parallel_map;
use super::Kernel;

/// A ranked candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Candidate text as supplied by the caller
    pub text: String,
    /// Similarity to the query, in `[0, 1]`
    pub similarity: f32,
}

impl Kernel {
    /// Rank `candidates` by similarity to `query` and keep the best `top_k`.
    ///
    /// Every candidate is scored independently, so duplicates may each appear
    /// in the result. Ties keep their input order. `top_k == 0` or an empty
    /// candidate list yields an empty result.
    pub fn find_similar<S>(&self, query: &str, candidates: &[S], top_k: usize) -> Vec<Neighbor>
    where
        S: AsRef<str> + Sync,
    {
        if top_k == 0 || candidates.is_empty() {
            return Vec::new();
        }

        let scores = parallel_map(
            candidates,
            self.config.effective_workers(),
            self.config.parallel_threshold,
            |candidate| self.similarity(query, candidate.as_ref()),
        );

        let mut ranked: Vec<Neighbor> = candidates
            .iter()
            .zip(scores)
            .map(|(candidate, similarity)| Neighbor {
                text: candidate.as_ref().to_string(),
                similarity,
            })
            .collect();

        // Stable: equal scores stay in candidate order
        ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        ranked.truncate(top_k);
        ranked
    }
}
