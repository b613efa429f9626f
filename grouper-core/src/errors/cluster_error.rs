//! Clustering pipeline errors.

use super::embed_error::EmbedError;

/// Configuration and input errors for one clustering run.
///
/// All variants are raised synchronously before or during the run; a
/// degenerate but valid clustering (one giant cluster, all singletons)
/// is a low-scoring result, never an error.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("No articles to cluster")]
    EmptyItems,

    #[error("Similarity graph has no nodes")]
    EmptyGraph,

    #[error("Neighbor count k must be >= 1, got {k}")]
    InvalidK { k: usize },

    #[error("Resolution must be a positive finite number, got {resolution}")]
    InvalidResolution { resolution: f64 },

    #[error("Minimum cluster size must be >= 1, got {min_cluster_size}")]
    InvalidThreshold { min_cluster_size: usize },

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbedError),
}
