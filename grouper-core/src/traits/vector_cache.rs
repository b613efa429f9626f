//! Content-addressed embedding cache.
//!
//! The cache is consulted opportunistically: a miss or a broken backend
//! only skips the speed-up, it never fails an embedding run. Backends
//! swallow their own I/O errors and report them as misses.

use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::types::collections::FxHashMap;

/// Content key for one cached vector: sha256 over the algorithm tag,
/// the target dimension, and the full text, hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(algorithm: &str, dim: usize, text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(algorithm.as_bytes());
        hasher.update(dim.to_string().as_bytes());
        hasher.update(text.as_bytes());
        let digest = hasher.finalize();
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            use std::fmt::Write;
            let _ = write!(hex, "{:02x}", byte);
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Get/put interface for cached embedding vectors.
pub trait VectorCache: Send + Sync {
    /// Look up a vector by key. `None` means miss.
    fn get(&self, key: &CacheKey) -> Option<Vec<f64>>;

    /// Store a vector under a key. Infallible by contract.
    fn put(&self, key: &CacheKey, vector: &[f64]);
}

/// Cache that never hits. The default when no backend is wired up.
#[derive(Debug, Default)]
pub struct NullCache;

impl VectorCache for NullCache {
    fn get(&self, _key: &CacheKey) -> Option<Vec<f64>> {
        None
    }

    fn put(&self, _key: &CacheKey, _vector: &[f64]) {}
}

/// In-memory cache backed by a mutexed map. Used by tests and by
/// long-running hosts that re-embed the same corpus repeatedly.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<FxHashMap<CacheKey, Vec<f64>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VectorCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Vec<f64>> {
        // A poisoned lock is treated as a miss.
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &CacheKey, vector: &[f64]) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.clone(), vector.to_vec());
        }
    }
}
