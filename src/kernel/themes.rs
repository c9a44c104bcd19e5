//! Theme Discovery
//!
//! Greedy ego-network clustering over a relationship graph.
//!
//! This is deliberately not connected-component clustering. Each cluster is
//! one seed text plus its direct, still-unassigned neighbors; a neighbor of
//! a neighbor is only included if it is also adjacent to the seed. Chains of
//! related texts can therefore split into several clusters, and results
//! depend on input order.

use std::fmt;

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use super::Kernel;

/// Label used when no member word is long enough to name a theme
pub const FALLBACK_LABEL: &str = "General Theme";

const LABEL_WORDS: usize = 3;
const MIN_LABEL_WORD_CHARS: usize = 4;

/// A discovered group of related texts
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeCluster {
    pub label: String,
    /// Seed first, then neighbors by descending similarity to the seed
    pub members: Vec<String>,
    pub size: usize,
    /// Mean similarity over all distinct member pairs
    pub confidence: f32,
}

impl fmt::Display for ThemeCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} members, confidence {:.3})",
            self.label, self.size, self.confidence
        )
    }
}

impl Kernel {
    /// Cluster `texts` using the configured similarity threshold.
    ///
    /// Clusters smaller than `min_cluster_size` are dropped.
    pub fn discover_themes<S>(&self, texts: &[S], min_cluster_size: usize) -> Vec<ThemeCluster>
    where
        S: AsRef<str> + Sync,
    {
        self.discover_themes_with_threshold(texts, min_cluster_size, None)
    }

    /// Cluster `texts` with an explicit edge threshold.
    ///
    /// Texts are visited in input order. An unassigned text seeds a cluster
    /// and claims every unassigned direct neighbor at or above the
    /// threshold. Assignment is by string, so repeated texts join at most
    /// one cluster.
    pub fn discover_themes_with_threshold<S>(
        &self,
        texts: &[S],
        min_cluster_size: usize,
        threshold: Option<f32>,
    ) -> Vec<ThemeCluster>
    where
        S: AsRef<str> + Sync,
    {
        let threshold = self.resolve_threshold(threshold);
        let graph = self.build_relationship_graph(texts, Some(threshold));
        let min_cluster_size = min_cluster_size.max(1);

        let mut assigned: HashSet<&str> = HashSet::new();
        let mut clusters = Vec::new();

        for text in texts {
            let seed = text.as_ref();
            if !assigned.insert(seed) {
                continue;
            }

            let mut members = vec![seed.to_string()];
            for relation in graph.neighbors(seed) {
                if relation.similarity >= threshold && assigned.insert(relation.text.as_str()) {
                    members.push(relation.text.clone());
                }
            }

            if members.len() < min_cluster_size {
                continue;
            }

            clusters.push(ThemeCluster {
                label: extract_label(&members),
                confidence: self.mean_pairwise_similarity(&members),
                size: members.len(),
                members,
            });
        }

        debug!(
            texts = texts.len(),
            clusters = clusters.len(),
            threshold,
            "Discovered themes"
        );
        clusters
    }

    fn mean_pairwise_similarity(&self, members: &[String]) -> f32 {
        let mut total = 0.0f32;
        let mut pairs = 0usize;
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                total += self.similarity(a, b);
                pairs += 1;
            }
        }
        if pairs == 0 {
            0.0
        } else {
            total / pairs as f32
        }
    }
}

/// Name a group of texts after its most frequent longer words.
///
/// Words are lowercased alphanumeric runs of at least four characters. The
/// three most frequent (ties broken by first appearance) are title-cased and
/// joined with spaces. Falls back to [`FALLBACK_LABEL`].
pub fn extract_label<S: AsRef<str>>(texts: &[S]) -> String {
    // word -> (count, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut position = 0usize;

    for text in texts {
        let lower = text.as_ref().to_lowercase();
        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= MIN_LABEL_WORD_CHARS)
        {
            counts
                .entry(word.to_string())
                .or_insert((0, position))
                .0 += 1;
            position += 1;
        }
    }

    if counts.is_empty() {
        return FALLBACK_LABEL.to_string();
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .iter()
        .take(LABEL_WORDS)
        .map(|(word, _, _)| title_case(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEXTS: [&str; 8] = [
        "God is love",
        "God is love and light",
        "Love is patient",
        "Love is patient and kind",
        "The sky is blue",
        "The sky is very blue",
        "Faith hope and love",
        "Blessed are the meek",
    ];

    #[test]
    fn test_default_threshold_clusters() {
        let kernel = Kernel::with_defaults();
        let themes = kernel.discover_themes(&TEXTS, 2);

        assert_eq!(themes.len(), 3);
        assert_eq!(themes[0].members, vec!["God is love", "God is love and light"]);
        assert_eq!(themes[1].members, vec!["Love is patient", "Love is patient and kind"]);
        assert_eq!(themes[2].members, vec!["The sky is blue", "The sky is very blue"]);

        assert_eq!(themes[2].label, "Blue Very");
        for theme in &themes {
            assert_eq!(theme.size, theme.members.len());
            assert!(theme.confidence >= 0.7);
        }
    }

    #[test]
    fn test_greedy_not_transitive() {
        let kernel = Kernel::with_defaults();
        let themes = kernel.discover_themes_with_threshold(&TEXTS[..4], 1, Some(0.5));

        // "Love is patient and kind" is adjacent to two members of the first
        // cluster but not to its seed, so it ends up on its own
        assert_eq!(themes.len(), 2);
        assert_eq!(
            themes[0].members,
            vec!["God is love", "God is love and light", "Love is patient"]
        );
        assert_eq!(themes[0].label, "Love Light Patient");
        assert_eq!(themes[1].members, vec!["Love is patient and kind"]);
        assert_eq!(themes[1].confidence, 0.0);

        let expected = (kernel.similarity("God is love", "God is love and light")
            + kernel.similarity("God is love", "Love is patient")
            + kernel.similarity("God is love and light", "Love is patient"))
            / 3.0;
        assert!((themes[0].confidence - expected).abs() < 1e-6);
    }

    #[test]
    fn test_min_cluster_size_filters() {
        let kernel = Kernel::with_defaults();
        assert!(kernel.discover_themes(&TEXTS, 3).is_empty());
        assert_eq!(kernel.discover_themes(&TEXTS, 1).len(), 5);
        // Zero behaves like one
        assert_eq!(kernel.discover_themes(&TEXTS, 0).len(), 5);
    }

    #[test]
    fn test_repeated_text_joins_once() {
        let kernel = Kernel::with_defaults();
        let themes = kernel.discover_themes(&["amen", "amen", "selah"], 1);
        assert_eq!(themes.len(), 2);
        assert_eq!(themes[0].members, vec!["amen"]);
        assert_eq!(themes[1].members, vec!["selah"]);
    }

    #[test]
    fn test_empty_input() {
        let kernel = Kernel::with_defaults();
        let texts: Vec<String> = Vec::new();
        assert!(kernel.discover_themes(&texts, 2).is_empty());
    }

    #[test]
    fn test_extract_label() {
        assert_eq!(
            extract_label(&["Grace and peace", "grace, mercy and peace", "Grace abounds"]),
            "Grace Peace Mercy"
        );
        assert_eq!(extract_label(&["a is to be", "of it"]), FALLBACK_LABEL);
        let empty: [&str; 0] = [];
        assert_eq!(extract_label(&empty), FALLBACK_LABEL);
    }

    #[test]
    fn test_display() {
        let theme = ThemeCluster {
            label: "Love".to_string(),
            members: vec!["a".to_string(), "b".to_string()],
            size: 2,
            confidence: 0.75,
        };
        assert_eq!(theme.to_string(), "Love (2 members, confidence 0.750)");
    }

    proptest! {
        #[test]
        fn prop_clusters_respect_size_floor(
            texts in proptest::collection::vec("[a-z]{1,6}( [a-z]{1,6}){0,3}", 0..10),
            min_size in 1usize..4,
            threshold in 0.0f32..1.0,
        ) {
            let kernel = Kernel::with_defaults();
            let themes = kernel.discover_themes_with_threshold(&texts, min_size, Some(threshold));
            let mut seen = std::collections::HashSet::new();
            for theme in &themes {
                prop_assert!(theme.size >= min_size);
                prop_assert_eq!(theme.size, theme.members.len());
                prop_assert!((0.0..=1.0).contains(&theme.confidence));
                for member in &theme.members {
                    prop_assert!(seen.insert(member.clone()));
                }
            }
        }
    }
}
