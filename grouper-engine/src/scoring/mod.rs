//! Reduction of a clustering result to comparable scalars.

use grouper_core::types::{ClusteringResult, TrialSummary};

/// Flatten a `ClusteringResult` into the scalar record autotune ranks
/// by. Pure field extraction plus the largest-cluster fraction; an
/// empty result yields a fraction of 0.
pub fn summarize(result: &ClusteringResult) -> TrialSummary {
    let total: usize = result.clusters.values().map(Vec::len).sum();
    let max_cluster = result.max_cluster_size();
    let max_cluster_fraction = if total == 0 {
        0.0
    } else {
        max_cluster as f64 / total as f64
    };

    TrialSummary {
        n_clusters: result.clusters.len(),
        max_cluster_fraction,
        modularity: result.modularity,
        balance_score: result.balance_score,
        small_cluster_fraction: result.small_cluster_fraction,
        score_final: result.score_final,
    }
}
