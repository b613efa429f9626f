//! Trait seams between the engine and its external collaborators.

pub mod embedding_provider;
pub mod vector_cache;

pub use embedding_provider::EmbeddingProvider;
pub use vector_cache::{CacheKey, MemoryCache, NullCache, VectorCache};
