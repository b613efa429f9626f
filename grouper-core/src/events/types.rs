//! Event payload types.

use crate::types::TrialConfig;

/// Payload for `on_embedding_started`.
#[derive(Debug, Clone)]
pub struct EmbeddingStartedEvent {
    pub article_count: usize,
}

/// Payload for `on_embedding_complete`.
#[derive(Debug, Clone)]
pub struct EmbeddingCompleteEvent {
    pub article_count: usize,
    pub dim: usize,
    pub duration_ms: u64,
}

/// Payload for `on_trial_started`.
#[derive(Debug, Clone)]
pub struct TrialStartedEvent {
    pub config: TrialConfig,
}

/// Payload for `on_trial_complete`.
#[derive(Debug, Clone)]
pub struct TrialCompleteEvent {
    pub config: TrialConfig,
    /// Composite score, `None` if the trial failed.
    pub score: Option<f64>,
    pub completed: usize,
    pub total: usize,
}

/// Payload for `on_tune_complete`.
#[derive(Debug, Clone)]
pub struct TuneCompleteEvent {
    pub best_config: TrialConfig,
    pub best_score: f64,
    pub trial_count: usize,
    pub failed_count: usize,
    pub duration_ms: u64,
}
