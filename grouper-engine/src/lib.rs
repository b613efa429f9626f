//! grouper-engine: the clustering-and-autotune engine.
//!
//! - Embed: deterministic hash embedder behind the provider seam
//! - Graph: k-NN similarity graph over pairwise cosine similarity
//! - Community: weight-aware Louvain with a deterministic mode
//! - Postprocess: tiny-cluster merge, metrics, labels, centrality, score
//! - Scoring: reduction of a result to comparable scalars
//! - Autotune: parallel grid search over (k, resolution, min size)
//!
//! Data flows one way: articles → embeddings → graph → raw partition →
//! finalized clustering → summary. The autotune engine drives that chain
//! once per grid point with no shared mutable state between trials.

pub mod autotune;
pub mod community;
pub mod embed;
pub mod graph;
pub mod pipeline;
pub mod postprocess;
pub mod scoring;

// Re-exports for convenience
pub use autotune::{
    AutotuneEngine, ParamGrid, TrialFailurePolicy, TuneOptions, TuneOutcome,
};
pub use community::{modularity, Louvain};
pub use embed::HashEmbedder;
pub use graph::{build_knn_graph, SimilarityGraph};
pub use pipeline::{autotune, cluster, embed_articles, ClusterOptions};
pub use postprocess::{finalize_clustering, MergePolicy};
pub use scoring::summarize;
