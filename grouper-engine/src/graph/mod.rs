//! k-NN similarity graph over pairwise cosine similarity.

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Undirected;
use rustc_hash::FxHashMap;

use grouper_core::errors::ClusterError;
use grouper_core::types::EmbeddingSet;

/// Undirected weighted similarity graph over article ids.
///
/// Node insertion order matches the embedding order, so index-based
/// traversal is deterministic across runs.
pub struct SimilarityGraph {
    graph: Graph<String, f64, Undirected>,
    index: FxHashMap<String, NodeIndex>,
}

impl SimilarityGraph {
    fn with_nodes(ids: &[String]) -> Self {
        let mut graph = Graph::new_undirected();
        let mut index = FxHashMap::default();
        for id in ids {
            let node = graph.add_node(id.clone());
            index.insert(id.clone(), node);
        }
        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Article ids in stable insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(move |n| self.graph[n].as_str())
    }

    /// Neighbors of `id` with edge weights, in edge insertion order.
    /// Empty for isolated or unknown nodes.
    pub fn neighbors(&self, id: &str) -> Vec<(&str, f64)> {
        let Some(&node) = self.index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges(node)
            .map(|edge| {
                let other = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other].as_str(), *edge.weight())
            })
            .collect()
    }

    /// Weight of the edge between two ids, if present.
    pub fn weight_between(&self, a: &str, b: &str) -> Option<f64> {
        let (&na, &nb) = (self.index.get(a)?, self.index.get(b)?);
        let edge = self.graph.find_edge(na, nb)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Sum of all edge weights.
    pub fn total_weight(&self) -> f64 {
        self.graph.edge_weights().sum()
    }

    /// Sum of edge weights incident on `id`.
    pub fn weighted_degree(&self, id: &str) -> f64 {
        self.neighbors(id).iter().map(|(_, w)| w).sum()
    }

    /// Add an undirected edge, keeping the max weight when both
    /// endpoints independently proposed the same pair.
    fn upsert_max_edge(&mut self, a: NodeIndex, b: NodeIndex, weight: f64) {
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                let existing = &mut self.graph[edge];
                if weight > *existing {
                    *existing = weight;
                }
            }
            None => {
                self.graph.add_edge(a, b, weight);
            }
        }
    }

    pub(crate) fn inner(&self) -> &Graph<String, f64, Undirected> {
        &self.graph
    }
}

/// Build the k-NN similarity graph for an embedding set.
///
/// Each node selects its k most cosine-similar others (ties broken by
/// original order, self excluded; k larger than N-1 clamps implicitly).
/// The undirected edge set is the union of the directed selections;
/// mutual selections keep the max of the two proposed weights rather
/// than the average, which avoids under-weighting near-duplicates.
pub fn build_knn_graph(embeddings: &EmbeddingSet, k: usize) -> Result<SimilarityGraph, ClusterError> {
    if k < 1 {
        return Err(ClusterError::InvalidK { k });
    }
    if embeddings.is_empty() {
        return Err(ClusterError::EmptyItems);
    }

    let mut graph = SimilarityGraph::with_nodes(embeddings.ids());
    let n = embeddings.len();
    if n <= 1 {
        return Ok(graph);
    }

    let sims = pairwise_cosine(embeddings.vectors());
    let selections = select_neighbors(&sims, k);

    tracing::debug!(nodes = n, k, "building k-NN similarity graph");

    // Insertion order matches the embedding order, so index i maps to
    // the i-th node.
    let nodes: Vec<NodeIndex> = graph.graph.node_indices().collect();
    for (i, neighbors) in selections.iter().enumerate() {
        for &j in neighbors {
            graph.upsert_max_edge(nodes[i], nodes[j], sims[i][j]);
        }
    }

    Ok(graph)
}

/// Full pairwise cosine similarity matrix. O(N²D).
fn pairwise_cosine(vectors: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let norms: Vec<f64> = vectors
        .iter()
        .map(|v| v.iter().map(|x| x * x).sum::<f64>().sqrt())
        .collect();

    let n = vectors.len();
    let mut sims = vec![vec![0.0; n]; n];
    for i in 0..n {
        sims[i][i] = 1.0;
        for j in (i + 1)..n {
            let dot: f64 = vectors[i].iter().zip(&vectors[j]).map(|(a, b)| a * b).sum();
            let denom = norms[i] * norms[j];
            let sim = if denom > 0.0 { dot / denom } else { 0.0 };
            sims[i][j] = sim;
            sims[j][i] = sim;
        }
    }
    sims
}

/// For each row, the indices of the k most similar other rows.
/// Ties break toward the lower (earlier) index; self is excluded, so
/// each selection holds at most min(k, N-1) entries.
fn select_neighbors(sims: &[Vec<f64>], k: usize) -> Vec<Vec<usize>> {
    let n = sims.len();
    (0..n)
        .map(|i| {
            let mut candidates: Vec<usize> = (0..n).filter(|&j| j != i).collect();
            candidates.sort_by(|&a, &b| {
                sims[i][b]
                    .partial_cmp(&sims[i][a])
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.cmp(&b))
            });
            candidates.truncate(k);
            candidates
        })
        .collect()
}
