//! Parallel hyperparameter grid search.
//!
//! Trials are embarrassingly parallel: each gets the shared read-only
//! embedding set and its own (k, resolution, min_cluster_size) point,
//! builds a fresh graph, and never touches another trial's state.
//! Results are collected in completion order, not submission order.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use grouper_core::config::{GrouperConfig, TuningConfig};
use grouper_core::errors::{ClusterError, TuneError};
use grouper_core::events::{EventDispatcher, TrialCompleteEvent, TrialStartedEvent, TuneCompleteEvent};
use grouper_core::types::{
    ArticleRecord, ClusteringResult, EmbeddingSet, ScoreWeights, TrialConfig, TrialResult,
    TrialSummary,
};

use crate::pipeline::{cluster, ClusterOptions};
use crate::postprocess::MergePolicy;
use crate::scoring::summarize;

/// What to do when a single trial fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrialFailurePolicy {
    /// Record the failure as a scoreless `TrialResult` and keep going.
    #[default]
    RecordAndContinue,
    /// Surface the first failure as a `TuneError::Trial`, aborting the
    /// whole grid.
    Propagate,
}

/// The three parameter lists whose cartesian product forms the trial set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamGrid {
    pub k_values: Vec<usize>,
    pub resolution_values: Vec<f64>,
    pub min_cluster_size_values: Vec<usize>,
}

impl ParamGrid {
    /// Build a grid from the tuning section of the config.
    pub fn from_tuning(tuning: &TuningConfig) -> Self {
        Self {
            k_values: tuning.k_values.clone(),
            resolution_values: tuning.resolution_values.clone(),
            min_cluster_size_values: tuning.min_cluster_size_values.clone(),
        }
    }

    /// All grid points, k-major then resolution then min size.
    pub fn configs(&self) -> Vec<TrialConfig> {
        let mut configs =
            Vec::with_capacity(self.len());
        for &k in &self.k_values {
            for &resolution in &self.resolution_values {
                for &min_cluster_size in &self.min_cluster_size_values {
                    configs.push(TrialConfig {
                        k,
                        resolution,
                        min_cluster_size,
                    });
                }
            }
        }
        configs
    }

    pub fn len(&self) -> usize {
        self.k_values.len() * self.resolution_values.len() * self.min_cluster_size_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Engine-level options shared by every trial of one search.
#[derive(Debug, Clone)]
pub struct TuneOptions {
    /// Worker-parallelism limit for trial evaluation.
    pub max_workers: usize,
    pub weights: ScoreWeights,
    pub merge_policy: MergePolicy,
    /// Shared detection seed, so trials differ only in their grid point.
    pub seed: Option<u64>,
    pub failure_policy: TrialFailurePolicy,
}

impl Default for TuneOptions {
    fn default() -> Self {
        Self {
            max_workers: 4,
            weights: ScoreWeights::default(),
            merge_policy: MergePolicy::default(),
            seed: None,
            failure_policy: TrialFailurePolicy::default(),
        }
    }
}

impl TuneOptions {
    /// Derive search options from a resolved configuration.
    pub fn from_config(config: &GrouperConfig) -> Self {
        Self {
            max_workers: config.tuning.effective_max_workers(),
            weights: config.scoring.effective_weights(),
            merge_policy: if config.postprocess.effective_merge_until_stable() {
                MergePolicy::UntilStable
            } else {
                MergePolicy::SinglePass
            },
            seed: config.detection.seed,
            failure_policy: if config.tuning.effective_fail_fast() {
                TrialFailurePolicy::Propagate
            } else {
                TrialFailurePolicy::RecordAndContinue
            },
        }
    }
}

/// Everything a search produces: the winning result and configuration,
/// plus one `TrialResult` per grid point in completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuneOutcome {
    pub best: ClusteringResult,
    pub best_config: TrialConfig,
    pub trials: Vec<TrialResult>,
}

/// Parallel grid-search engine.
pub struct AutotuneEngine {
    options: TuneOptions,
    events: EventDispatcher,
}

impl AutotuneEngine {
    pub fn new(options: TuneOptions) -> Self {
        Self {
            options,
            events: EventDispatcher::new(),
        }
    }

    /// Access the dispatcher to register progress handlers.
    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    /// Evaluate every grid point and pick the best composite score.
    ///
    /// Trials run on a dedicated bounded thread pool and report over a
    /// channel, so `trials` comes back in completion order. Selection
    /// keeps the first strict maximum encountered in that order; ties
    /// therefore resolve to whichever tied trial finished first.
    pub fn run(
        &self,
        articles: &[ArticleRecord],
        embeddings: &EmbeddingSet,
        grid: &ParamGrid,
    ) -> Result<TuneOutcome, TuneError> {
        if articles.is_empty() {
            return Err(TuneError::Cluster(ClusterError::EmptyItems));
        }
        let configs = grid.configs();
        if configs.is_empty() {
            return Err(TuneError::EmptyGrid);
        }

        let start = Instant::now();
        let total = configs.len();
        tracing::info!(trials = total, workers = self.options.max_workers, "starting autotune");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.max_workers)
            .build()
            .map_err(|e| TuneError::WorkerPool(e.to_string()))?;

        let cluster_options = ClusterOptions {
            weights: self.options.weights,
            merge_policy: self.options.merge_policy,
            seed: self.options.seed,
        };

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut trials: Vec<TrialResult> = Vec::with_capacity(total);
        let mut best: Option<(TrialConfig, ClusteringResult, f64)> = None;
        let mut failed = 0usize;
        let mut fatal: Option<TuneError> = None;

        pool.scope(|scope| {
            for config in &configs {
                self.events.emit_trial_started(&TrialStartedEvent {
                    config: config.clone(),
                });
                let tx = tx.clone();
                let cluster_options = &cluster_options;
                scope.spawn(move |_| {
                    let outcome = evaluate_trial(articles, embeddings, config, cluster_options);
                    // The receiver outlives the scope; a send failure
                    // would only mean the search was torn down.
                    let _ = tx.send((config.clone(), outcome));
                });
            }
            drop(tx);

            // Drained on the caller thread while workers are still
            // running, so each completion event fires as its trial
            // lands rather than after the whole batch.
            for (config, outcome) in rx.iter() {
                let trial = match outcome {
                    Ok((result, summary)) => {
                        let score = summary.score_final;
                        let is_better = best.as_ref().map(|(_, _, b)| score > *b).unwrap_or(true);
                        if is_better {
                            best = Some((config.clone(), result, score));
                        }
                        TrialResult {
                            config: config.clone(),
                            summary: Some(summary),
                            error: None,
                        }
                    }
                    Err(error) => {
                        if self.options.failure_policy == TrialFailurePolicy::Propagate {
                            // Outstanding trials still run to completion
                            // before the scope returns; their results are
                            // discarded.
                            fatal = Some(TuneError::Trial {
                                config,
                                message: error.to_string(),
                            });
                            break;
                        }
                        failed += 1;
                        tracing::warn!(?config, %error, "trial failed; recorded and skipped");
                        TrialResult {
                            config: config.clone(),
                            summary: None,
                            error: Some(error.to_string()),
                        }
                    }
                };

                self.events.emit_trial_complete(&TrialCompleteEvent {
                    config,
                    score: trial.score(),
                    completed: trials.len() + 1,
                    total,
                });
                trials.push(trial);
            }
        });

        if let Some(err) = fatal {
            return Err(err);
        }

        let (best_config, best, best_score) = best.ok_or(TuneError::NoSuccessfulTrial)?;

        self.events.emit_tune_complete(&TuneCompleteEvent {
            best_config: best_config.clone(),
            best_score,
            trial_count: trials.len(),
            failed_count: failed,
            duration_ms: start.elapsed().as_millis() as u64,
        });
        tracing::info!(
            ?best_config,
            best_score,
            failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "autotune complete"
        );

        Ok(TuneOutcome {
            best,
            best_config,
            trials,
        })
    }
}

/// One isolated trial: fresh graph, detection, postprocess, and the
/// scalar summary used for ranking.
fn evaluate_trial(
    articles: &[ArticleRecord],
    embeddings: &EmbeddingSet,
    config: &TrialConfig,
    options: &ClusterOptions,
) -> Result<(ClusteringResult, TrialSummary), ClusterError> {
    let result = cluster(articles, embeddings, config, options)?;
    let summary = summarize(&result);
    Ok((result, summary))
}
