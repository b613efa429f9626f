//! Tiny-cluster merging.

use rustc_hash::FxHashSet;

use grouper_core::types::Partition;

use crate::graph::SimilarityGraph;

/// How tiny-cluster merging iterates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// One pass over the dissolved clusters. A member whose neighbors
    /// were all in dissolved clusters stays put, so the output may
    /// still contain under-threshold clusters.
    #[default]
    SinglePass,
    /// Repeat passes until the partition stops changing.
    UntilStable,
}

/// Single merge pass: dissolve every cluster under `min_size`,
/// reassigning each member to the cluster of its highest-weight
/// neighbor that is not itself in a dissolved cluster. Returns a fresh
/// partition; the input is untouched.
pub(crate) fn merge_tiny_clusters(
    assignment: &Partition,
    graph: &SimilarityGraph,
    min_size: usize,
) -> Partition {
    let clusters = super::invert_partition(assignment, graph);
    let tiny: FxHashSet<usize> = clusters
        .iter()
        .filter(|(_, members)| members.len() < min_size)
        .map(|(&cid, _)| cid)
        .collect();

    let mut reassigned = assignment.clone();
    if tiny.is_empty() {
        return reassigned;
    }

    tracing::debug!(dissolved = tiny.len(), min_size, "merging tiny clusters");

    for (cid, members) in &clusters {
        if !tiny.contains(cid) {
            continue;
        }
        for member in members {
            let mut best_cid = None;
            let mut best_weight = -1.0;
            for (neighbor, weight) in graph.neighbors(member) {
                // Eligibility is judged against the original assignment,
                // not against earlier reassignments in this same pass.
                let Some(&neighbor_cid) = assignment.get(neighbor) else {
                    continue;
                };
                if tiny.contains(&neighbor_cid) {
                    continue;
                }
                if weight > best_weight {
                    best_weight = weight;
                    best_cid = Some(neighbor_cid);
                }
            }
            if let Some(target) = best_cid {
                reassigned.insert(member.clone(), target);
            }
        }
    }

    reassigned
}

/// Repeat single passes to a fixed point. Bounded by the node count,
/// since every effective pass removes at least one cluster.
pub(crate) fn merge_until_stable(
    assignment: &Partition,
    graph: &SimilarityGraph,
    min_size: usize,
) -> Partition {
    let mut current = assignment.clone();
    for _ in 0..graph.node_count() {
        let next = merge_tiny_clusters(&current, graph, min_size);
        if next == current {
            break;
        }
        current = next;
    }
    current
}
