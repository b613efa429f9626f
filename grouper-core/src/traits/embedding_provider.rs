//! Pluggable embedding strategy.

use crate::errors::EmbedError;
use crate::types::{ArticleRecord, EmbeddingSet};

/// Maps an ordered batch of articles to an `EmbeddingSet`.
///
/// The engine never assumes anything about the vectors beyond uniform
/// dimension, so a deterministic hash fallback and a real semantic
/// model are interchangeable behind this trait — swapping providers
/// must not require changes to any downstream component.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed each article's `text_repr` into a fixed-dimension vector,
    /// preserving input order.
    fn embed(&self, articles: &[ArticleRecord]) -> Result<EmbeddingSet, EmbedError>;

    /// Short tag identifying the algorithm, used in cache keys.
    fn algorithm(&self) -> &str;
}
