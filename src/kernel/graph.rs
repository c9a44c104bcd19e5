//! Relationship Graph
//!
//! All-pairs thresholded similarity graph over a text collection.

use hashbrown::HashMap;
use tracing::debug;

use super::parallel::parallel_map;
use super::Kernel;

/// An edge from one text to a related text
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub text: String,
    pub similarity: f32,
}

/// Adjacency lists keyed by text.
///
/// Every input text has an entry (possibly empty). Lists are sorted by
/// similarity, highest first.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    adjacency: HashMap<String, Vec<Relation>>,
    /// Distinct texts in first-appearance order
    order: Vec<String>,
    threshold: f32,
}

impl RelationshipGraph {
    /// Edge threshold the graph was built with
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Related texts for `text`, empty if unknown
    pub fn neighbors(&self, text: &str) -> &[Relation] {
        self.adjacency.get(text).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, text: &str) -> bool {
        self.adjacency.contains_key(text)
    }

    /// Adjacency lists in first-appearance order of the input texts
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Relation])> + '_ {
        self.order
            .iter()
            .map(|text| (text.as_str(), self.neighbors(text)))
    }

    /// Number of distinct texts
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }
}

/// A short row paired with its long mirror: rows `i` and `n - 1 - i`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowGroup {
    first: usize,
    mirror: Option<usize>,
}

impl RowGroup {
    fn rows(self) -> impl Iterator<Item = usize> {
        std::iter::once(self.first).chain(self.mirror)
    }
}

/// Pair row `i` with row `n - 1 - i` so each group scores `n - 1` pairs
/// (the middle row of an odd `n` stands alone with half that)
fn mirrored_row_groups(n: usize) -> Vec<RowGroup> {
    (0..n.div_ceil(2))
        .map(|i| {
            let mirror = n - 1 - i;
            RowGroup {
                first: i,
                mirror: (mirror != i).then_some(mirror),
            }
        })
        .collect()
}

impl Kernel {
    /// Link every pair of input positions whose similarity reaches
    /// `threshold`.
    ///
    /// `None`, negative or NaN thresholds fall back to the configured
    /// default. Positions are never linked to themselves, but a string that
    /// appears twice is linked to its own copy.
    pub fn build_relationship_graph<S>(&self, texts: &[S], threshold: Option<f32>) -> RelationshipGraph
    where
        S: AsRef<str> + Sync,
    {
        let threshold = self.resolve_threshold(threshold);
        let n = texts.len();

        // Row i scores pairs (i, j) for j > i. Rows are fanned out in
        // mirrored groups so every group carries n - 1 pairs.
        let groups = mirrored_row_groups(n);
        let scored: Vec<Vec<(usize, Vec<(usize, f32)>)>> = parallel_map(
            &groups,
            self.config.effective_workers(),
            self.config.parallel_threshold.div_ceil(2),
            |group| {
                group
                    .rows()
                    .map(|i| {
                        let row: Vec<(usize, f32)> = ((i + 1)..n)
                            .filter_map(|j| {
                                let score = self.similarity(texts[i].as_ref(), texts[j].as_ref());
                                (score >= threshold).then_some((j, score))
                            })
                            .collect();
                        (i, row)
                    })
                    .collect()
            },
        );

        let mut edges: Vec<Vec<(usize, f32)>> = vec![Vec::new(); n];
        for (i, row) in scored.into_iter().flatten() {
            edges[i] = row;
        }

        let mut graph = RelationshipGraph {
            threshold,
            ..Default::default()
        };
        for text in texts {
            let text = text.as_ref();
            if !graph.adjacency.contains_key(text) {
                graph.adjacency.insert(text.to_string(), Vec::new());
                graph.order.push(text.to_string());
            }
        }

        for (i, row) in edges.into_iter().enumerate() {
            let a = texts[i].as_ref();
            for (j, similarity) in row {
                let b = texts[j].as_ref();
                if let Some(list) = graph.adjacency.get_mut(a) {
                    list.push(Relation {
                        text: b.to_string(),
                        similarity,
                    });
                }
                if let Some(list) = graph.adjacency.get_mut(b) {
                    list.push(Relation {
                        text: a.to_string(),
                        similarity,
                    });
                }
            }
        }

        for list in graph.adjacency.values_mut() {
            list.sort_by(|x, y| y.similarity.total_cmp(&x.similarity));
        }

        debug!(
            texts = n,
            edges = graph.edge_count(),
            threshold,
            "Built relationship graph"
        );
        graph
    }
}
