//! Core data types shared across the engine.

pub mod article;
pub mod clustering;
pub mod collections;

pub use article::ArticleRecord;
pub use clustering::{
    ClusteringResult, EmbeddingSet, Partition, ScoreWeights, TrialConfig, TrialResult,
    TrialSummary,
};
