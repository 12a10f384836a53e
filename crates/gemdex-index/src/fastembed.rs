//! FastEmbed embedding provider.
//!
//! Wraps the `fastembed` crate for local embedding generation via
//! pre-trained models. Loading a model is expensive (download + ONNX
//! session), so it is deferred until the first `embed` call rather than
//! done at construction.
//!
//! # Thread Safety
//!
//! `fastembed::TextEmbedding` is not `Send + Sync`, so the handle lives in
//! `Arc<Mutex<>>` and all embedding work goes through
//! `tokio::task::spawn_blocking`.
//!
//! # Feature Gate
//!
//! This module requires the `embed-fastembed` feature.

use crate::embedding::EmbeddingProvider;
use async_trait::async_trait;
use gemdex_core::{Error, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Map a model name string to a fastembed model variant and its dimension.
///
/// The dimension is known per model, which lets `dimension()` answer
/// without forcing a load.
fn resolve_model(name: &str) -> Result<(fastembed::EmbeddingModel, usize)> {
    match name {
        "all-minilm-l6-v2" | "AllMiniLML6V2" => Ok((fastembed::EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" | "BGESmallENV15" => Ok((fastembed::EmbeddingModel::BGESmallENV15, 384)),
        "bge-base-en-v1.5" | "BGEBaseENV15" => Ok((fastembed::EmbeddingModel::BGEBaseENV15, 768)),
        "bge-large-en-v1.5" | "BGELargeENV15" => Ok((fastembed::EmbeddingModel::BGELargeENV15, 1024)),
        other => Err(Error::config(format!(
            "Unknown embedding model: '{other}'. Supported: all-minilm-l6-v2, bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5"
        ))),
    }
}

/// FastEmbed-based embedding provider with lazy model loading.
///
/// # Supported Models
///
/// | Name | Dimension | Size |
/// |------|-----------|------|
/// | `all-minilm-l6-v2` | 384 | ~80MB |
/// | `bge-small-en-v1.5` | 384 | ~50MB |
/// | `bge-base-en-v1.5` | 768 | ~130MB |
/// | `bge-large-en-v1.5` | 1024 | ~335MB |
pub struct FastEmbedProvider {
    model: Arc<Mutex<Option<fastembed::TextEmbedding>>>,
    model_enum: fastembed::EmbeddingModel,
    model_name: String,
    dimension: usize,
    cache_path: Option<PathBuf>,
}

impl FastEmbedProvider {
    /// Create a provider for the given model name.
    ///
    /// The model file itself is not touched here; download and session
    /// setup happen on the first embedding call.
    pub fn new(model_name: &str, cache_path: Option<&str>) -> Result<Self> {
        let (model_enum, dimension) = resolve_model(model_name)?;

        Ok(Self {
            model: Arc::new(Mutex::new(None)),
            model_enum,
            model_name: model_name.to_string(),
            dimension,
            cache_path: cache_path.map(PathBuf::from),
        })
    }

    /// Embed a batch of owned strings on a blocking thread, loading the
    /// model first if this is the initial call.
    async fn embed_owned(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = self.model.clone();
        let model_enum = self.model_enum.clone();
        let model_name = self.model_name.clone();
        let cache_path = self.cache_path.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = model
                .lock()
                .map_err(|e| Error::operation(format!("Mutex poisoned: {e}")))?;

            if guard.is_none() {
                info!(model = %model_name, "loading embedding model");
                let mut init = fastembed::InitOptions::new(model_enum);
                if let Some(path) = cache_path {
                    init = init.with_cache_dir(path);
                }
                let loaded = fastembed::TextEmbedding::try_new(init).map_err(|e| {
                    Error::operation(format!("Failed to initialize fastembed model: {e}"))
                })?;
                *guard = Some(loaded);
            }

            let loaded = guard
                .as_ref()
                .ok_or_else(|| Error::operation("Model handle missing after load"))?;
            loaded
                .embed(texts, None)
                .map_err(|e| Error::operation(format!("Embedding failed: {e}")))
        })
        .await
        .map_err(|e| Error::operation(format!("spawn_blocking failed: {e}")))?
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut results = self.embed_owned(vec![text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| Error::operation("No embedding returned"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        self.embed_owned(owned).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Debug for FastEmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedProvider")
            .field("model", &self.model_name)
            .field("dimension", &self.dimension)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
