//! Per-subsystem configuration sections.

use serde::{Deserialize, Serialize};

use crate::types::ScoreWeights;

/// Configuration for the embedding subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding dimension. Default: 64.
    pub dim: Option<usize>,
    /// Algorithm tag used in cache keys. Default: "hash".
    pub algorithm: Option<String>,
}

impl EmbeddingConfig {
    /// Returns the effective dimension, defaulting to 64.
    pub fn effective_dim(&self) -> usize {
        self.dim.unwrap_or(64)
    }

    /// Returns the effective algorithm tag, defaulting to "hash".
    pub fn effective_algorithm(&self) -> &str {
        self.algorithm.as_deref().unwrap_or("hash")
    }
}

/// Configuration for similarity-graph construction.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphConfig {
    /// Neighbor count for the k-NN graph. Default: 6.
    pub k: Option<usize>,
}

impl GraphConfig {
    /// Returns the effective neighbor count, defaulting to 6.
    pub fn effective_k(&self) -> usize {
        self.k.unwrap_or(6)
    }
}

/// Configuration for community detection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DetectionConfig {
    /// Louvain resolution. Default: 1.0.
    pub resolution: Option<f64>,
    /// Traversal seed; `None` uses the stable node order.
    pub seed: Option<u64>,
}

impl DetectionConfig {
    /// Returns the effective resolution, defaulting to 1.0.
    pub fn effective_resolution(&self) -> f64 {
        self.resolution.unwrap_or(1.0)
    }
}

/// Configuration for cluster post-processing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PostprocessConfig {
    /// Clusters under this size are dissolved. Default: 2.
    pub min_cluster_size: Option<usize>,
    /// Repeat the tiny-cluster merge until stable instead of a single
    /// pass. Default: false.
    pub merge_until_stable: Option<bool>,
}

impl PostprocessConfig {
    /// Returns the effective minimum cluster size, defaulting to 2.
    pub fn effective_min_cluster_size(&self) -> usize {
        self.min_cluster_size.unwrap_or(2)
    }

    /// Returns whether merging repeats to a fixed point, defaulting to false.
    pub fn effective_merge_until_stable(&self) -> bool {
        self.merge_until_stable.unwrap_or(false)
    }
}

/// Weights of the composite score.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Modularity weight. Default: 1.0.
    pub alpha: Option<f64>,
    /// Balance weight. Default: 0.5.
    pub beta: Option<f64>,
    /// Small-cluster penalty weight. Default: 0.5.
    pub gamma: Option<f64>,
}

impl ScoringConfig {
    /// Returns the effective weights, defaulting to (1.0, 0.5, 0.5).
    pub fn effective_weights(&self) -> ScoreWeights {
        let defaults = ScoreWeights::default();
        ScoreWeights {
            alpha: self.alpha.unwrap_or(defaults.alpha),
            beta: self.beta.unwrap_or(defaults.beta),
            gamma: self.gamma.unwrap_or(defaults.gamma),
        }
    }
}

/// Configuration for the autotune grid search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Neighbor counts to try.
    pub k_values: Vec<usize>,
    /// Resolutions to try.
    pub resolution_values: Vec<f64>,
    /// Minimum cluster sizes to try.
    pub min_cluster_size_values: Vec<usize>,
    /// Worker-parallelism limit. Default: 4.
    pub max_workers: Option<usize>,
    /// Abort the grid on the first trial failure instead of recording
    /// it and continuing. Default: false.
    pub fail_fast: Option<bool>,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            k_values: vec![4, 6, 8],
            resolution_values: vec![0.8, 1.0, 1.2],
            min_cluster_size_values: vec![2, 3],
            max_workers: None,
            fail_fast: None,
        }
    }
}

impl TuningConfig {
    /// Returns the effective worker limit, defaulting to 4.
    pub fn effective_max_workers(&self) -> usize {
        self.max_workers.unwrap_or(4)
    }

    /// Returns whether trial failures abort the grid, defaulting to false.
    pub fn effective_fail_fast(&self) -> bool {
        self.fail_fast.unwrap_or(false)
    }
}
