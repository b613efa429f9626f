//! Autotune errors.

use super::cluster_error::ClusterError;
use crate::types::TrialConfig;

/// Errors from the autotune grid search.
#[derive(Debug, thiserror::Error)]
pub enum TuneError {
    #[error("Hyperparameter grid is empty")]
    EmptyGrid,

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    /// A single trial failed and the failure policy is `Propagate`.
    #[error("Trial {config:?} failed: {message}")]
    Trial { config: TrialConfig, message: String },

    #[error("Every trial in the grid failed")]
    NoSuccessfulTrial,

    #[error("Clustering error: {0}")]
    Cluster(#[from] ClusterError),
}
