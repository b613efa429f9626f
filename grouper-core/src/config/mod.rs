//! Configuration: per-subsystem sections plus the layered top-level config.

pub mod grouper_config;
pub mod sections;

pub use grouper_config::{CliOverrides, GrouperConfig};
pub use sections::{
    DetectionConfig, EmbeddingConfig, GraphConfig, PostprocessConfig, ScoringConfig,
    TuningConfig,
};
