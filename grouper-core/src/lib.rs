//! grouper-core: shared foundation for the grouper clustering engine.
//!
//! - Types: articles, embeddings, partitions, clustering results, trials
//! - Errors: one enum per subsystem, `thiserror` only, zero `anyhow`
//! - Config: layered TOML/env/CLI resolution
//! - Traits: embedding provider and vector cache seams
//! - Events: synchronous dispatch for progress reporting
//! - Observability: tracing initialization

pub mod config;
pub mod errors;
pub mod events;
pub mod observability;
pub mod traits;
pub mod types;

pub use config::{CliOverrides, GrouperConfig};
pub use errors::{ClusterError, ConfigError, EmbedError, TuneError};
pub use traits::{CacheKey, EmbeddingProvider, MemoryCache, NullCache, VectorCache};
pub use types::{
    ArticleRecord, ClusteringResult, EmbeddingSet, Partition, ScoreWeights, TrialConfig,
    TrialResult, TrialSummary,
};
