//! Cluster post-processing: tiny-cluster merge, quality metrics,
//! labeling, centrality, and the composite score.

pub mod labels;
pub mod merge;
pub mod metrics;

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use grouper_core::errors::ClusterError;
use grouper_core::types::{ArticleRecord, ClusteringResult, Partition, ScoreWeights};

use crate::community;
use crate::graph::SimilarityGraph;

pub use merge::MergePolicy;

/// Turn a raw partition into a finalized, scored `ClusteringResult`.
///
/// The caller's partition is never mutated; merging produces a fresh
/// mapping. A threshold at or above the item count dissolves every
/// cluster and usually produces degenerate output — allowed, but logged.
pub fn finalize_clustering(
    raw: &Partition,
    graph: &SimilarityGraph,
    articles: &[ArticleRecord],
    min_cluster_size: usize,
    weights: ScoreWeights,
    merge_policy: MergePolicy,
) -> Result<ClusteringResult, ClusterError> {
    if articles.is_empty() {
        return Err(ClusterError::EmptyItems);
    }
    if graph.is_empty() {
        return Err(ClusterError::EmptyGraph);
    }
    if min_cluster_size < 1 {
        return Err(ClusterError::InvalidThreshold { min_cluster_size });
    }
    if min_cluster_size >= raw.len() {
        tracing::warn!(
            min_cluster_size,
            total = raw.len(),
            "threshold dissolves every cluster; expect degenerate output"
        );
    }

    let assignment = match merge_policy {
        MergePolicy::SinglePass => merge::merge_tiny_clusters(raw, graph, min_cluster_size),
        MergePolicy::UntilStable => merge::merge_until_stable(raw, graph, min_cluster_size),
    };

    let clusters = invert_partition(&assignment, graph);

    let modularity = community::modularity(graph, &assignment);
    let total = assignment.len();
    let balance_score = metrics::balance_score(&clusters, total);
    let small_cluster_fraction = metrics::small_cluster_fraction(&clusters, min_cluster_size);

    let by_id: FxHashMap<&str, &ArticleRecord> =
        articles.iter().map(|a| (a.id.as_str(), a)).collect();
    let cluster_labels: BTreeMap<usize, String> = clusters
        .iter()
        .map(|(&cid, members)| (cid, labels::label_cluster(cid, members, &by_id)))
        .collect();

    let centrality = metrics::centrality(graph, &clusters);
    let score_final = weights.combine(modularity, balance_score, small_cluster_fraction);

    tracing::debug!(
        clusters = clusters.len(),
        modularity,
        balance_score,
        small_cluster_fraction,
        score_final,
        "finalized clustering"
    );

    Ok(ClusteringResult {
        assignment,
        clusters,
        labels: cluster_labels,
        modularity,
        balance_score,
        small_cluster_fraction,
        score_final,
        centrality,
    })
}

/// Invert a partition to cluster id -> members, members in the graph's
/// stable node order.
pub(crate) fn invert_partition(
    assignment: &Partition,
    graph: &SimilarityGraph,
) -> BTreeMap<usize, Vec<String>> {
    let mut clusters: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for id in graph.node_ids() {
        if let Some(&cid) = assignment.get(id) {
            clusters.entry(cid).or_default().push(id.to_string());
        }
    }
    clusters
}
