//! Cluster quality metrics.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::SimilarityGraph;

/// `1 - max_cluster_size / total`. 0 for a single giant cluster,
/// approaching 1 as clusters shrink relative to the corpus.
pub(crate) fn balance_score(clusters: &BTreeMap<usize, Vec<String>>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let max_size = clusters.values().map(Vec::len).max().unwrap_or(0);
    1.0 - (max_size as f64 / total as f64)
}

/// Fraction of clusters still under the size threshold.
pub(crate) fn small_cluster_fraction(
    clusters: &BTreeMap<usize, Vec<String>>,
    min_size: usize,
) -> f64 {
    let tiny = clusters
        .values()
        .filter(|members| members.len() < min_size)
        .count();
    tiny as f64 / clusters.len().max(1) as f64
}

/// Per-member sum of edge weights to co-members of its own cluster.
/// Edges leaving the cluster are ignored. A local importance proxy for
/// ranking and display, not a graph-wide centrality measure.
pub(crate) fn centrality(
    graph: &SimilarityGraph,
    clusters: &BTreeMap<usize, Vec<String>>,
) -> FxHashMap<String, f64> {
    let mut centrality = FxHashMap::default();
    for members in clusters.values() {
        let member_set: FxHashSet<&str> = members.iter().map(String::as_str).collect();
        for member in members {
            let score: f64 = graph
                .neighbors(member)
                .iter()
                .filter(|(neighbor, _)| member_set.contains(neighbor))
                .map(|(_, weight)| weight)
                .sum();
            centrality.insert(member.clone(), score);
        }
    }
    centrality
}
