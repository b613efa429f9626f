//! Deterministic hash embedder.
//!
//! Structural fallback for when no semantic model is wired up: identical
//! text always maps to a byte-identical vector, so the rest of the
//! pipeline can be exercised (and tested) without model weights. No
//! semantic similarity is promised. A real sentence-embedding model
//! plugs in behind the same `EmbeddingProvider` trait.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use grouper_core::errors::EmbedError;
use grouper_core::traits::{CacheKey, EmbeddingProvider, NullCache, VectorCache};
use grouper_core::types::{ArticleRecord, EmbeddingSet};

const ALGORITHM: &str = "hash";

/// Digest-based embedder: sha256 of the text, repeated to fill the
/// target dimension, scaled by the sample standard deviation of the
/// digest bytes.
pub struct HashEmbedder {
    dim: usize,
    cache: Arc<dyn VectorCache>,
}

impl HashEmbedder {
    /// Create an embedder with no cache backend.
    pub fn new(dim: usize) -> Self {
        Self::with_cache(dim, Arc::new(NullCache))
    }

    /// Create an embedder consulting the given cache before computing.
    /// Cache misses and backend failures only skip the speed-up.
    pub fn with_cache(dim: usize, cache: Arc<dyn VectorCache>) -> Self {
        Self { dim, cache }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed one text, bypassing the cache.
    fn compute(&self, text: &str) -> Vec<f64> {
        let digest = Sha256::digest(text.as_bytes());
        let denom = scale_denominator(&digest);
        (0..self.dim)
            .map(|i| digest[i % digest.len()] as f64 / denom)
            .collect()
    }

    fn embed_text(&self, text: &str) -> Vec<f64> {
        let key = CacheKey::new(ALGORITHM, self.dim, text);
        if let Some(vector) = self.cache.get(&key) {
            if vector.len() == self.dim {
                return vector;
            }
            // Stale entry from a different configuration; recompute.
        }
        let vector = self.compute(text);
        self.cache.put(&key, &vector);
        vector
    }
}

/// Sample standard deviation (n-1 denominator) of the byte values,
/// floored at 1.0 so a flat digest cannot divide by ~0.
fn scale_denominator(bytes: &[u8]) -> f64 {
    let n = bytes.len() as f64;
    let mean = bytes.iter().map(|&b| b as f64).sum::<f64>() / n;
    let variance = bytes
        .iter()
        .map(|&b| (b as f64 - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    variance.sqrt().max(1.0)
}

impl EmbeddingProvider for HashEmbedder {
    fn embed(&self, articles: &[ArticleRecord]) -> Result<EmbeddingSet, EmbedError> {
        let pairs = articles
            .iter()
            .map(|a| (a.id.clone(), self.embed_text(&a.text_repr)))
            .collect();
        EmbeddingSet::from_pairs(pairs)
    }

    fn algorithm(&self) -> &str {
        ALGORITHM
    }
}
