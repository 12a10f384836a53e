//! Discovery index coordinator.
//!
//! `DiscoveryIndex` owns the invariant linking vector index positions to
//! metadata rows: every row's `vector_position` refers to exactly one live
//! vector, and each vector is referenced by at most one row. The index is
//! append-only, so replacing a gem by name re-embeds, appends a new vector,
//! and orphans the old slot; orphans are invisible to callers because all
//! resolution goes through `vector_position`.
//!
//! Single-writer model: `add` and `persist` take `&mut self` and must be
//! serialized by the caller. `add` performs (vector append) then (row
//! upsert) as two separate durable operations; a crash between them leaves
//! an orphaned vector that `search` detects and skips.

use crate::embedding::{create_embedding_provider, EmbeddingProvider};
use crate::flat::{normalize, FlatIndex};
use crate::store::{MetadataStore, NewGem};
use crate::text::{compose_embedding_text, truncate_chars, README_CHAR_BUDGET};
use crate::types::{GemInput, IndexConfig, IndexStats, SearchHit};
use gemdex_core::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Id returned by `add` when the embedding capability is unavailable.
/// Neither store is touched in that case.
pub const SENTINEL_ID: i64 = -1;

const METADATA_FILE: &str = "metadata.db";
const INDEX_FILE: &str = "vectors.json";

/// Coordinator over the vector index and the metadata store.
pub struct DiscoveryIndex {
    config: IndexConfig,
    provider: Option<Arc<dyn EmbeddingProvider>>,
    index: FlatIndex,
    store: MetadataStore,
    index_path: PathBuf,
}

impl std::fmt::Debug for DiscoveryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryIndex")
            .field("config", &self.config)
            .field("provider", &self.provider.as_ref().map(|_| "EmbeddingProvider"))
            .field("index", &self.index)
            .field("store", &self.store)
            .field("index_path", &self.index_path)
            .finish()
    }
}

impl DiscoveryIndex {
    /// Open (or create) a discovery index at the configured store path.
    ///
    /// The embedding capability is resolved exactly once here; its absence
    /// puts the instance into degraded mode rather than failing.
    ///
    /// A persisted index that cannot be read, mismatches the embedding
    /// dimension, or exists alongside an empty metadata table surfaces as
    /// `CorruptIndex`. It is never silently recreated.
    pub async fn open(config: IndexConfig) -> Result<Self> {
        let store_dir = PathBuf::from(&config.store_path);
        std::fs::create_dir_all(&store_dir).map_err(|e| Error::io_with_path(e, &store_dir))?;

        let provider = create_embedding_provider(&config);
        let dimension = provider
            .as_ref()
            .map(|p| p.dimension())
            .unwrap_or(config.dimension);

        let store = MetadataStore::open(&store_dir.join(METADATA_FILE)).await?;
        let index_path = store_dir.join(INDEX_FILE);

        let index = if index_path.exists() {
            let index = FlatIndex::load(&index_path, dimension)?;
            if !index.is_empty() && store.count().await? == 0 {
                return Err(Error::corrupt_index(format!(
                    "index file {} holds {} vectors but the metadata table is empty",
                    index_path.display(),
                    index.len()
                )));
            }
            debug!(vectors = index.len(), "loaded persisted vector index");
            index
        } else {
            FlatIndex::new(dimension)
        };

        Ok(Self {
            config,
            provider,
            index,
            store,
            index_path,
        })
    }

    /// Whether the embedding capability is available for this instance.
    pub fn embedding_available(&self) -> bool {
        self.provider.is_some()
    }

    /// The configured default search limit.
    pub fn default_limit(&self) -> usize {
        self.config.default_limit
    }

    /// Add a gem to the index, or replace the existing record of the same
    /// name. Returns the store-assigned row id, or [`SENTINEL_ID`] when the
    /// embedding capability is unavailable.
    ///
    /// The embedding text is composed from name, description, keywords, and
    /// a bounded README prefix; the vector is unit-normalized before
    /// insertion so inner product equals cosine similarity.
    ///
    /// Not atomic across the two stores: a crash after the vector append
    /// but before the row upsert leaves an orphan that `search` skips.
    pub async fn add(&mut self, input: &GemInput, readme: &str) -> Result<i64> {
        let provider = match &self.provider {
            Some(p) => Arc::clone(p),
            None => {
                warn!(name = %input.name, "embedding capability unavailable; gem not indexed");
                return Ok(SENTINEL_ID);
            }
        };

        if input.name.trim().is_empty() {
            return Err(Error::invalid_record("gem record is missing its name"));
        }

        let text = compose_embedding_text(&input.name, &input.description, &input.keywords, readme);
        let mut vector = provider.embed(&text).await?;
        normalize(&mut vector);

        let position = self.index.add(vector)?;

        let last_updated = input
            .last_updated
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        let id = self
            .store
            .upsert(&NewGem {
                name: &input.name,
                description: &input.description,
                readme_excerpt: truncate_chars(readme, README_CHAR_BUDGET),
                keywords: &input.keywords,
                version: &input.version,
                homepage: &input.homepage,
                source_uri: &input.source_uri,
                download_count: input.download_count,
                stars: input.stars,
                last_updated: &last_updated,
                vector_position: position as i64,
            })
            .await?;

        info!(name = %input.name, id, position, "gem indexed");
        Ok(id)
    }

    /// Return the `k` gems most semantically similar to the query, ranked
    /// by descending similarity.
    ///
    /// "No capability" and "nothing indexed" are both an empty, successful
    /// result; callers that need to distinguish can check
    /// [`embedding_available`](Self::embedding_available). A hit whose
    /// position has no metadata row (index/store desynchronization) is
    /// skipped and logged, never fatal.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let provider = match &self.provider {
            Some(p) => Arc::clone(p),
            None => {
                debug!("embedding capability unavailable; returning empty results");
                return Ok(Vec::new());
            }
        };

        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_vector = provider.embed(query).await?;
        normalize(&mut query_vector);

        let mut results = Vec::new();
        for (position, score) in self.index.search(&query_vector, k) {
            match self.store.get_by_position(position as i64).await? {
                Some(record) => {
                    let rank = results.len() + 1;
                    results.push(SearchHit {
                        name: record.name,
                        description: record.description,
                        keywords: record.keywords,
                        version: record.version,
                        homepage: record.homepage,
                        source_uri: record.source_uri,
                        download_count: record.download_count,
                        stars: record.stars,
                        last_updated: record.last_updated,
                        similarity_score: score,
                        rank,
                    });
                }
                None => {
                    warn!(position, "vector hit resolves to no metadata row; skipping");
                }
            }
        }

        Ok(results)
    }

    /// Write the vector index to its file. The metadata store is durable on
    /// every write already. The two persists are not transactional with
    /// each other.
    pub fn persist(&self) -> Result<()> {
        self.index.save(&self.index_path)?;
        info!(path = %self.index_path.display(), vectors = self.index.len(), "vector index persisted");
        Ok(())
    }

    /// Statistics about this store instance.
    pub async fn stats(&self) -> Result<IndexStats> {
        let model = match &self.provider {
            Some(p) => p.name().to_string(),
            None => self.config.model.clone(),
        };

        Ok(IndexStats {
            total_records: self.store.count().await?,
            index_size: self.index.len(),
            dimension: self.index.dimension(),
            model,
            store_path: self.config.store_path.clone(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mock_config(dir: &TempDir) -> IndexConfig {
        IndexConfig {
            store_path: dir.path().join("store").to_string_lossy().into_owned(),
            provider: "mock".to_string(),
            dimension: 384,
            ..Default::default()
        }
    }

    fn degraded_config(dir: &TempDir) -> IndexConfig {
        IndexConfig {
            store_path: dir.path().join("store").to_string_lossy().into_owned(),
            provider: "unavailable".to_string(),
            ..Default::default()
        }
    }

    fn alpha() -> GemInput {
        GemInput::new("alpha").with_description("web framework")
    }

    fn beta() -> GemInput {
        GemInput::new("beta").with_description("testing library")
    }

    #[tokio::test]
    async fn test_open_creates_empty_store() {
        let dir = TempDir::new().unwrap();
        let dx = DiscoveryIndex::open(mock_config(&dir)).await.unwrap();

        assert!(dx.embedding_available());
        let stats = dx.stats().await.unwrap();
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.index_size, 0);
        assert_eq!(stats.dimension, 384);
        assert_eq!(stats.model, "mock");
    }

    #[tokio::test]
    async fn test_add_then_round_trip_search() {
        let dir = TempDir::new().unwrap();
        let mut dx = DiscoveryIndex::open(mock_config(&dir)).await.unwrap();

        let id = dx.add(&alpha(), "").await.unwrap();
        assert!(id > 0);

        let results = dx.search("web framework", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "alpha");
        assert_eq!(results[0].rank, 1);
        assert!(results[0].similarity_score > 0.0);
    }

    #[tokio::test]
    async fn test_search_empty_store_returns_empty() {
        let dir = TempDir::new().unwrap();
        let dx = DiscoveryIndex::open(mock_config(&dir)).await.unwrap();

        assert!(dx.search("anything", 10).await.unwrap().is_empty());
        assert!(dx.search("", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concrete_scenario_alpha_beta() {
        let dir = TempDir::new().unwrap();
        let mut dx = DiscoveryIndex::open(mock_config(&dir)).await.unwrap();

        dx.add(&alpha(), "").await.unwrap();
        dx.add(&beta(), "").await.unwrap();

        let top = dx.search("framework", 1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "alpha");

        let all = dx.search("framework", 5).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "alpha");
        assert_eq!(all[1].name, "beta");
        assert!(all[0].similarity_score >= all[1].similarity_score);
        assert_eq!(all[0].rank, 1);
        assert_eq!(all[1].rank, 2);
    }

    #[tokio::test]
    async fn test_capacity_law() {
        let dir = TempDir::new().unwrap();
        let mut dx = DiscoveryIndex::open(mock_config(&dir)).await.unwrap();

        dx.add(&alpha(), "").await.unwrap();
        dx.add(&beta(), "").await.unwrap();

        assert_eq!(dx.search("framework", 1).await.unwrap().len(), 1);
        assert_eq!(dx.search("framework", 100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_add_rejects_missing_name() {
        let dir = TempDir::new().unwrap();
        let mut dx = DiscoveryIndex::open(mock_config(&dir)).await.unwrap();

        let err = dx.add(&GemInput::new("  "), "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRecord(_)));

        // Rejected before any store mutation.
        let stats = dx.stats().await.unwrap();
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.index_size, 0);
    }

    #[tokio::test]
    async fn test_replace_by_name_orphans_old_slot() {
        let dir = TempDir::new().unwrap();
        let mut dx = DiscoveryIndex::open(mock_config(&dir)).await.unwrap();

        let first_id = dx.add(&alpha(), "").await.unwrap();
        let second_id = dx
            .add(&alpha().with_description("minimal web framework"), "")
            .await
            .unwrap();
        assert_eq!(first_id, second_id);

        let stats = dx.stats().await.unwrap();
        // Distinct-name count is stable; the index keeps the orphaned slot.
        assert_eq!(stats.total_records, 1);
        assert_eq!(stats.index_size, 2);

        // The hit resolves through the new position to the new metadata,
        // and the orphaned slot is skipped rather than surfaced twice.
        let results = dx.search("web framework", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].description, "minimal web framework");
    }

    #[tokio::test]
    async fn test_degraded_add_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let mut dx = DiscoveryIndex::open(degraded_config(&dir)).await.unwrap();

        assert!(!dx.embedding_available());
        assert_eq!(dx.add(&alpha(), "").await.unwrap(), SENTINEL_ID);

        let stats = dx.stats().await.unwrap();
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.index_size, 0);
    }

    #[tokio::test]
    async fn test_degraded_search_is_empty_not_an_error() {
        let dir = TempDir::new().unwrap();
        let dx = DiscoveryIndex::open(degraded_config(&dir)).await.unwrap();
        assert!(dx.search("framework", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let config = mock_config(&dir);

        let before = {
            let mut dx = DiscoveryIndex::open(config.clone()).await.unwrap();
            dx.add(&alpha(), "").await.unwrap();
            dx.add(&beta(), "").await.unwrap();
            dx.persist().unwrap();
            dx.search("framework", 5).await.unwrap()
        };

        let dx = DiscoveryIndex::open(config).await.unwrap();
        let after = dx.search("framework", 5).await.unwrap();

        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.name, a.name);
            assert_eq!(b.rank, a.rank);
            assert!((b.similarity_score - a.similarity_score).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_unpersisted_vectors_are_lost_on_reload() {
        let dir = TempDir::new().unwrap();
        let config = mock_config(&dir);

        {
            let mut dx = DiscoveryIndex::open(config.clone()).await.unwrap();
            dx.add(&alpha(), "").await.unwrap();
            // No persist.
        }

        let dx = DiscoveryIndex::open(config).await.unwrap();
        let stats = dx.stats().await.unwrap();
        // Metadata survives (SQLite is durable per write); vectors do not.
        assert_eq!(stats.total_records, 1);
        assert_eq!(stats.index_size, 0);
        assert!(dx.search("web framework", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_rejects_garbage_index_file() {
        let dir = TempDir::new().unwrap();
        let config = mock_config(&dir);

        let store_dir = PathBuf::from(&config.store_path);
        std::fs::create_dir_all(&store_dir).unwrap();
        std::fs::write(store_dir.join(INDEX_FILE), "garbage").unwrap();

        let err = DiscoveryIndex::open(config).await.unwrap_err();
        assert!(matches!(err, Error::CorruptIndex(_)));
    }

    #[tokio::test]
    async fn test_open_rejects_index_without_metadata() {
        let dir = TempDir::new().unwrap();
        let config = mock_config(&dir);

        // Persist a non-empty index, then wipe the metadata database.
        {
            let mut dx = DiscoveryIndex::open(config.clone()).await.unwrap();
            dx.add(&alpha(), "").await.unwrap();
            dx.persist().unwrap();
        }
        let store_dir = PathBuf::from(&config.store_path);
        for entry in std::fs::read_dir(&store_dir).unwrap() {
            let path = entry.unwrap().path();
            if path.file_name().is_some_and(|n| n != INDEX_FILE) {
                std::fs::remove_file(path).unwrap();
            }
        }

        let err = DiscoveryIndex::open(config).await.unwrap_err();
        assert!(matches!(err, Error::CorruptIndex(_)));
    }

    #[tokio::test]
    async fn test_scores_non_increasing_over_many_records() {
        let dir = TempDir::new().unwrap();
        let mut dx = DiscoveryIndex::open(mock_config(&dir)).await.unwrap();

        for (name, desc) in [
            ("one", "web framework for building applications"),
            ("two", "testing library"),
            ("three", "background job queue"),
            ("four", "web server toolkit"),
        ] {
            dx.add(&GemInput::new(name).with_description(desc), "")
                .await
                .unwrap();
        }

        let results = dx.search("web framework", 10).await.unwrap();
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].similarity_score >= pair[1].similarity_score);
        }
        for (i, hit) in results.iter().enumerate() {
            assert_eq!(hit.rank, i + 1);
        }
    }
}
