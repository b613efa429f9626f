//! Error handling for grouper.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod cluster_error;
pub mod config_error;
pub mod embed_error;
pub mod tune_error;

pub use cluster_error::ClusterError;
pub use config_error::ConfigError;
pub use embed_error::EmbedError;
pub use tune_error::TuneError;
