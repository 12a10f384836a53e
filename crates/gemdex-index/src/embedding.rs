//! Embedding provider trait, mock implementation, and capability factory.
//!
//! The embedding capability is optional: the factory resolves the configured
//! provider exactly once at store construction, and a `None` result means
//! every dependent operation degrades (sentinel id on add, empty results on
//! search) instead of failing deep inside index code.

use crate::flat::normalize;
use crate::types::IndexConfig;
use async_trait::async_trait;
use gemdex_core::Result;
use std::sync::Arc;
use tracing::warn;

/// Trait for generating text embeddings.
///
/// Implementations wrap specific embedding libraries and provide a uniform
/// async interface. `Send + Sync` is required so a provider handle can be
/// shared across async tasks.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for a batch of texts.
    ///
    /// Default implementation calls `embed` for each text sequentially.
    /// Backends with native batching should override this.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The embedding dimension, fixed for the provider's lifetime.
    fn dimension(&self) -> usize;

    /// The model identifier for diagnostics and stats.
    fn name(&self) -> &str;
}

// ============================================================================
// Mock provider
// ============================================================================

/// A deterministic embedding provider for tests and degraded environments.
///
/// Embeds text as a hashed bag-of-words: each lowercased alphanumeric token
/// is hashed (FNV-1a) into one of `dimension` buckets and the resulting
/// count vector is unit-normalized. Texts sharing tokens therefore get a
/// positive cosine similarity, which is enough structure for ranking tests
/// without a real model.
pub struct MockEmbeddingProvider {
    dimension: usize,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn bag_of_words(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = fnv1a(token.to_lowercase().as_bytes()) % self.dimension as u64;
            embedding[bucket as usize] += 1.0;
        }

        normalize(&mut embedding);
        embedding
    }
}

/// FNV-1a 64-bit hash.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.bag_of_words(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.bag_of_words(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Capability factory
// ============================================================================

/// Resolve the configured embedding provider.
///
/// Called once at store construction. `None` means the capability is
/// unavailable for the lifetime of the store instance: the coordinator
/// degrades rather than erroring (see `DiscoveryIndex`).
pub fn create_embedding_provider(config: &IndexConfig) -> Option<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "mock" => Some(Arc::new(MockEmbeddingProvider::new(config.dimension))),

        #[cfg(feature = "embed-fastembed")]
        "fastembed" => match crate::fastembed::FastEmbedProvider::new(
            &config.model,
            config.cache_path.as_deref(),
        ) {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                warn!(model = %config.model, error = %e, "failed to set up fastembed provider; embedding capability unavailable");
                None
            }
        },

        #[cfg(not(feature = "embed-fastembed"))]
        "fastembed" => {
            warn!("fastembed provider requested but the embed-fastembed feature is disabled; embedding capability unavailable");
            None
        }

        other => {
            warn!(provider = other, "unknown embedding provider; embedding capability unavailable");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
