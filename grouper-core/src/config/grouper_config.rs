//! Top-level grouper configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::sections::{
    DetectionConfig, EmbeddingConfig, GraphConfig, PostprocessConfig, ScoringConfig,
    TuningConfig,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`GROUPER_*`)
/// 3. Project config (`grouper.toml` in project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GrouperConfig {
    pub embedding: EmbeddingConfig,
    pub graph: GraphConfig,
    pub detection: DetectionConfig,
    pub postprocess: PostprocessConfig,
    pub scoring: ScoringConfig,
    pub tuning: TuningConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub k: Option<usize>,
    pub resolution: Option<f64>,
    pub min_cluster_size: Option<usize>,
    pub max_workers: Option<usize>,
}

impl GrouperConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Project config
        let project_path = root.join("grouper.toml");
        if project_path.exists() {
            let text = std::fs::read_to_string(&project_path).map_err(|e| ConfigError::Io {
                path: project_path.display().to_string(),
                message: e.to_string(),
            })?;
            config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: project_path.display().to_string(),
                message: e.to_string(),
            })?;
        }

        // Environment variables
        Self::apply_env_overrides(&mut config);

        // CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn apply_env_overrides(config: &mut Self) {
        if let Some(dim) = env_parse::<usize>("GROUPER_EMBEDDING_DIM") {
            config.embedding.dim = Some(dim);
        }
        if let Some(k) = env_parse::<usize>("GROUPER_GRAPH_K") {
            config.graph.k = Some(k);
        }
        if let Some(resolution) = env_parse::<f64>("GROUPER_DETECTION_RESOLUTION") {
            config.detection.resolution = Some(resolution);
        }
        if let Some(seed) = env_parse::<u64>("GROUPER_DETECTION_SEED") {
            config.detection.seed = Some(seed);
        }
        if let Some(size) = env_parse::<usize>("GROUPER_MIN_CLUSTER_SIZE") {
            config.postprocess.min_cluster_size = Some(size);
        }
        if let Some(workers) = env_parse::<usize>("GROUPER_TUNING_MAX_WORKERS") {
            config.tuning.max_workers = Some(workers);
        }
    }

    fn apply_cli_overrides(config: &mut Self, cli: &CliOverrides) {
        if let Some(k) = cli.k {
            config.graph.k = Some(k);
        }
        if let Some(resolution) = cli.resolution {
            config.detection.resolution = Some(resolution);
        }
        if let Some(size) = cli.min_cluster_size {
            config.postprocess.min_cluster_size = Some(size);
        }
        if let Some(workers) = cli.max_workers {
            config.tuning.max_workers = Some(workers);
        }
    }

    /// Validate the configuration values.
    pub fn validate(config: &Self) -> Result<(), ConfigError> {
        if config.embedding.effective_dim() < 8 {
            return Err(ConfigError::ValidationFailed {
                field: "embedding.dim".to_string(),
                message: "must be at least 8".to_string(),
            });
        }
        if config.graph.effective_k() < 1 {
            return Err(ConfigError::ValidationFailed {
                field: "graph.k".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        let resolution = config.detection.effective_resolution();
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(ConfigError::ValidationFailed {
                field: "detection.resolution".to_string(),
                message: "must be a positive finite number".to_string(),
            });
        }
        if config.postprocess.effective_min_cluster_size() < 1 {
            return Err(ConfigError::ValidationFailed {
                field: "postprocess.min_cluster_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        let weights = config.scoring.effective_weights();
        for (field, value) in [
            ("scoring.alpha", weights.alpha),
            ("scoring.beta", weights.beta),
            ("scoring.gamma", weights.gamma),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be finite".to_string(),
                });
            }
        }
        let tuning = &config.tuning;
        if tuning.k_values.is_empty()
            || tuning.resolution_values.is_empty()
            || tuning.min_cluster_size_values.is_empty()
        {
            return Err(ConfigError::ValidationFailed {
                field: "tuning".to_string(),
                message: "k_values, resolution_values, and min_cluster_size_values must be non-empty"
                    .to_string(),
            });
        }
        if tuning.effective_max_workers() < 1 {
            return Err(ConfigError::ValidationFailed {
                field: "tuning.max_workers".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}
