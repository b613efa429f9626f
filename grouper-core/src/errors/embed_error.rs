//! Embedding errors.

/// Errors from embedding providers and `EmbeddingSet` construction.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("Duplicate article id in embedding set: {id}")]
    DuplicateId { id: String },

    #[error("Vector for {id} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Embedding provider failed: {0}")]
    Provider(String),
}
