//! Embeddings, partitions, clustering results, and autotune trial types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::collections::{FxHashMap, FxHashSet};
use crate::errors::EmbedError;

/// Mapping from article id to cluster id. Cluster ids may be sparse and
/// non-contiguous after tiny-cluster merging.
pub type Partition = FxHashMap<String, usize>;

/// Ordered set of (article id, vector) pairs, all vectors the same
/// dimension. Built once per run and shared read-only across all
/// autotune trials — embeddings do not depend on k or resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSet {
    ids: Vec<String>,
    vectors: Vec<Vec<f64>>,
    dim: usize,
}

impl EmbeddingSet {
    /// Build from ordered pairs, validating id uniqueness and uniform
    /// vector dimension.
    pub fn from_pairs(pairs: Vec<(String, Vec<f64>)>) -> Result<Self, EmbedError> {
        let dim = pairs.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for (id, vector) in &pairs {
            if !seen.insert(id.as_str()) {
                return Err(EmbedError::DuplicateId { id: id.clone() });
            }
            if vector.len() != dim {
                return Err(EmbedError::DimensionMismatch {
                    id: id.clone(),
                    expected: dim,
                    actual: vector.len(),
                });
            }
        }
        let (ids, vectors) = pairs.into_iter().unzip();
        Ok(Self { ids, vectors, dim })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn vectors(&self) -> &[Vec<f64>] {
        &self.vectors
    }
}

/// Finalized, scored clustering for one parameter configuration.
/// Created once by the postprocessor and immutable afterward; report
/// writers and renderers only read from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Article id -> final cluster id.
    pub assignment: Partition,
    /// Cluster id -> member ids, members in stable article order.
    pub clusters: BTreeMap<usize, Vec<String>>,
    /// Cluster id -> human-readable label.
    pub labels: BTreeMap<usize, String>,
    /// Weighted modularity of the final partition.
    pub modularity: f64,
    /// `1 - max_cluster_size / total`; a giant cluster drives this to 0.
    pub balance_score: f64,
    /// Fraction of final clusters still under the size threshold.
    pub small_cluster_fraction: f64,
    /// `alpha*modularity + beta*balance - gamma*small_fraction`.
    pub score_final: f64,
    /// Article id -> sum of edge weights to co-members of its cluster.
    pub centrality: FxHashMap<String, f64>,
}

impl ClusteringResult {
    /// Total number of clustered articles.
    pub fn total_articles(&self) -> usize {
        self.assignment.len()
    }

    /// Size of the largest cluster, 0 for an empty result.
    pub fn max_cluster_size(&self) -> usize {
        self.clusters.values().map(Vec::len).max().unwrap_or(0)
    }
}

/// One point of the autotune hyperparameter grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Neighbor count for the k-NN similarity graph.
    pub k: usize,
    /// Louvain resolution; higher favors more, smaller communities.
    pub resolution: f64,
    /// Clusters under this size are dissolved during post-processing.
    pub min_cluster_size: usize,
}

/// Flat scalar summary of a `ClusteringResult`, used to rank trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub n_clusters: usize,
    pub max_cluster_fraction: f64,
    pub modularity: f64,
    pub balance_score: f64,
    pub small_cluster_fraction: f64,
    pub score_final: f64,
}

/// Outcome of one autotune trial: its configuration plus either a
/// summary or the error that sank it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    pub config: TrialConfig,
    pub summary: Option<TrialSummary>,
    pub error: Option<String>,
}

impl TrialResult {
    /// Composite score, `None` for failed trials.
    pub fn score(&self) -> Option<f64> {
        self.summary.as_ref().map(|s| s.score_final)
    }
}

/// Weights of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of modularity.
    pub alpha: f64,
    /// Weight of the balance score.
    pub beta: f64,
    /// Penalty weight of the small-cluster fraction.
    pub gamma: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 0.5,
            gamma: 0.5,
        }
    }
}

impl ScoreWeights {
    /// Combine the three metrics into the scalar autotune optimizes.
    pub fn combine(&self, modularity: f64, balance: f64, small_fraction: f64) -> f64 {
        self.alpha * modularity + self.beta * balance - self.gamma * small_fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_set_rejects_duplicate_ids() {
        let pairs = vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("a".to_string(), vec![0.0, 1.0]),
        ];
        assert!(matches!(
            EmbeddingSet::from_pairs(pairs),
            Err(EmbedError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_embedding_set_rejects_mixed_dimensions() {
        let pairs = vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![0.0, 1.0, 2.0]),
        ];
        assert!(matches!(
            EmbeddingSet::from_pairs(pairs),
            Err(EmbedError::DimensionMismatch { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_embedding_set_preserves_order() {
        let pairs = vec![
            ("b".to_string(), vec![0.0]),
            ("a".to_string(), vec![1.0]),
        ];
        let set = EmbeddingSet::from_pairs(pairs).unwrap();
        assert_eq!(set.ids(), &["b".to_string(), "a".to_string()]);
        assert_eq!(set.dim(), 1);
    }

    #[test]
    fn test_score_weights_default_combine() {
        let w = ScoreWeights::default();
        let score = w.combine(0.4, 0.5, 0.2);
        assert!((score - (0.4 + 0.25 - 0.1)).abs() < 1e-12);
    }
}
