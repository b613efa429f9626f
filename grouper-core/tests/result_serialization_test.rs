//! ClusteringResult is the hand-off surface to report writers and graph
//! renderers; it must serialize with every field intact.

use std::collections::BTreeMap;

use grouper_core::types::collections::FxHashMap;
use grouper_core::types::ClusteringResult;

#[test]
fn test_clustering_result_json_round_trip() {
    let mut assignment = FxHashMap::default();
    assignment.insert("a".to_string(), 0);
    assignment.insert("b".to_string(), 0);
    assignment.insert("c".to_string(), 1);

    let mut clusters = BTreeMap::new();
    clusters.insert(0, vec!["a".to_string(), "b".to_string()]);
    clusters.insert(1, vec!["c".to_string()]);

    let mut labels = BTreeMap::new();
    labels.insert(0, "graphs / learning".to_string());
    labels.insert(1, "cluster_1".to_string());

    let mut centrality = FxHashMap::default();
    centrality.insert("a".to_string(), 0.9);
    centrality.insert("b".to_string(), 0.9);
    centrality.insert("c".to_string(), 0.0);

    let result = ClusteringResult {
        assignment,
        clusters,
        labels,
        modularity: 0.42,
        balance_score: 0.33,
        small_cluster_fraction: 0.5,
        score_final: 0.335,
        centrality,
    };

    let json = serde_json::to_string(&result).unwrap();
    let back: ClusteringResult = serde_json::from_str(&json).unwrap();

    assert_eq!(back.assignment, result.assignment);
    assert_eq!(back.clusters, result.clusters);
    assert_eq!(back.labels, result.labels);
    assert_eq!(back.modularity, result.modularity);
    assert_eq!(back.score_final, result.score_final);
    assert_eq!(back.total_articles(), 3);
    assert_eq!(back.max_cluster_size(), 2);
}
