//! Public entry points: one clustering run, and the autotune wrapper.

use std::time::Instant;

use grouper_core::config::GrouperConfig;
use grouper_core::errors::{ClusterError, EmbedError, TuneError};
use grouper_core::events::{EmbeddingCompleteEvent, EmbeddingStartedEvent, EventDispatcher};
use grouper_core::traits::EmbeddingProvider;
use grouper_core::types::{
    ArticleRecord, ClusteringResult, EmbeddingSet, ScoreWeights, TrialConfig,
};

use crate::autotune::{AutotuneEngine, ParamGrid, TuneOptions, TuneOutcome};
use crate::community::Louvain;
use crate::graph::build_knn_graph;
use crate::postprocess::{finalize_clustering, MergePolicy};

/// Knobs for one clustering run that are not part of the tuned grid.
#[derive(Debug, Clone, Default)]
pub struct ClusterOptions {
    pub weights: ScoreWeights,
    pub merge_policy: MergePolicy,
    /// Community-detection traversal seed; `None` uses the stable
    /// node order (still deterministic).
    pub seed: Option<u64>,
}

impl ClusterOptions {
    /// Derive run options from a resolved configuration.
    pub fn from_config(config: &GrouperConfig) -> Self {
        Self {
            weights: config.scoring.effective_weights(),
            merge_policy: if config.postprocess.effective_merge_until_stable() {
                MergePolicy::UntilStable
            } else {
                MergePolicy::SinglePass
            },
            seed: config.detection.seed,
        }
    }
}

/// Embed a batch of articles through a provider, emitting progress
/// events around the call.
pub fn embed_articles(
    provider: &dyn EmbeddingProvider,
    articles: &[ArticleRecord],
    events: &EventDispatcher,
) -> Result<EmbeddingSet, EmbedError> {
    let start = Instant::now();
    events.emit_embedding_started(&EmbeddingStartedEvent {
        article_count: articles.len(),
    });

    let embeddings = provider.embed(articles)?;

    events.emit_embedding_complete(&EmbeddingCompleteEvent {
        article_count: embeddings.len(),
        dim: embeddings.dim(),
        duration_ms: start.elapsed().as_millis() as u64,
    });
    Ok(embeddings)
}

/// Run the full chain for one configuration:
/// graph → communities → finalized, scored result.
///
/// All parameters are validated before any computation begins.
pub fn cluster(
    articles: &[ArticleRecord],
    embeddings: &EmbeddingSet,
    config: &TrialConfig,
    options: &ClusterOptions,
) -> Result<ClusteringResult, ClusterError> {
    if articles.is_empty() {
        return Err(ClusterError::EmptyItems);
    }
    if !config.resolution.is_finite() || config.resolution <= 0.0 {
        return Err(ClusterError::InvalidResolution {
            resolution: config.resolution,
        });
    }
    if config.min_cluster_size < 1 {
        return Err(ClusterError::InvalidThreshold {
            min_cluster_size: config.min_cluster_size,
        });
    }

    tracing::debug!(
        k = config.k,
        resolution = config.resolution,
        min_cluster_size = config.min_cluster_size,
        articles = articles.len(),
        "clustering"
    );

    let graph = build_knn_graph(embeddings, config.k)?;

    let mut detector = Louvain::new(config.resolution);
    if let Some(seed) = options.seed {
        detector = detector.with_seed(seed);
    }
    let raw = detector.detect(&graph);

    finalize_clustering(
        &raw,
        &graph,
        articles,
        config.min_cluster_size,
        options.weights,
        options.merge_policy,
    )
}

/// Grid-search the hyperparameter space and return the best-scoring
/// configuration alongside every trial's outcome.
pub fn autotune(
    articles: &[ArticleRecord],
    embeddings: &EmbeddingSet,
    grid: &ParamGrid,
    options: &TuneOptions,
) -> Result<TuneOutcome, TuneError> {
    AutotuneEngine::new(options.clone()).run(articles, embeddings, grid)
}
