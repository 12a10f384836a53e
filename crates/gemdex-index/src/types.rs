//! Common types for the discovery index.
//!
//! These types are shared by the coordinator, the metadata store, and the
//! CLI, and are always available regardless of feature flags.

use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration
// ============================================================================

/// Discovery index configuration.
///
/// Controls the store directory, embedding provider selection, and search
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding the metadata database and the serialized index.
    pub store_path: String,

    /// Embedding provider: "fastembed" or "mock".
    pub provider: String,

    /// Embedding model name (e.g., "all-minilm-l6-v2").
    pub model: String,

    /// Embedding dimension used when no provider is available and for the
    /// mock provider.
    pub dimension: usize,

    /// Cache directory for downloaded embedding models.
    pub cache_path: Option<String>,

    /// Default search result limit.
    pub default_limit: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            store_path: "vector_store".to_string(),
            provider: "fastembed".to_string(),
            model: "all-minilm-l6-v2".to_string(),
            dimension: 384,
            cache_path: None,
            default_limit: 5,
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// Caller-supplied gem metadata, as accepted by `DiscoveryIndex::add`.
///
/// `name` is the business key; everything else defaults to empty/zero so
/// sparse JSON payloads deserialize cleanly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GemInput {
    /// Unique gem name (business key).
    pub name: String,

    /// Short description.
    pub description: String,

    /// Ordered keyword list, may be empty.
    pub keywords: Vec<String>,

    /// Version string.
    pub version: String,

    /// Homepage URL.
    pub homepage: String,

    /// Source repository URL.
    pub source_uri: String,

    /// Download count, non-negative.
    pub download_count: i64,

    /// Star count, non-negative.
    pub stars: i64,

    /// Last-update timestamp (RFC 3339); current time is used if absent.
    pub last_updated: Option<String>,
}

impl GemInput {
    /// Create an input with just the business key set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the keyword list.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// A full gem record as stored in the metadata table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemRecord {
    /// Store-assigned row id.
    pub id: i64,

    /// Unique gem name.
    pub name: String,

    /// Short description.
    pub description: String,

    /// Bounded README excerpt used for embedding.
    pub readme_excerpt: String,

    /// Keyword list (stored as a JSON array in a single column).
    pub keywords: Vec<String>,

    /// Version string.
    pub version: String,

    /// Homepage URL.
    pub homepage: String,

    /// Source repository URL.
    pub source_uri: String,

    /// Download count.
    pub download_count: i64,

    /// Star count.
    pub stars: i64,

    /// Last-update timestamp.
    pub last_updated: Option<String>,

    /// Store-assigned creation timestamp.
    pub created_at: String,

    /// Ordinal slot in the append-only vector index.
    pub vector_position: i64,
}

// ============================================================================
// Search results
// ============================================================================

/// A single ranked search result, as consumed by the gateway collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Gem name.
    pub name: String,

    /// Short description.
    pub description: String,

    /// Keyword list.
    pub keywords: Vec<String>,

    /// Version string.
    pub version: String,

    /// Homepage URL.
    pub homepage: String,

    /// Source repository URL.
    pub source_uri: String,

    /// Download count.
    pub download_count: i64,

    /// Star count.
    pub stars: i64,

    /// Last-update timestamp.
    pub last_updated: Option<String>,

    /// Raw inner-product similarity against the query vector.
    pub similarity_score: f32,

    /// 1-based rank within the result list.
    pub rank: usize,
}

// ============================================================================
// Statistics
// ============================================================================

/// Statistics about a discovery index instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of rows in the metadata table (distinct names).
    pub total_records: i64,

    /// Number of vectors in the index, orphaned slots included.
    pub index_size: usize,

    /// Embedding dimension.
    pub dimension: usize,

    /// Embedding model identifier, or the configured model name when the
    /// capability is unavailable.
    pub model: String,

    /// Store directory path.
    pub store_path: String,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // IndexConfig tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_index_config_default() {
        let config = IndexConfig::default();
        assert_eq!(config.store_path, "vector_store");
        assert_eq!(config.provider, "fastembed");
        assert_eq!(config.model, "all-minilm-l6-v2");
        assert_eq!(config.dimension, 384);
        assert!(config.cache_path.is_none());
        assert_eq!(config.default_limit, 5);
    }

    #[test]
    fn test_index_config_deserialization_with_defaults() {
        let json = r#"{"provider": "mock"}"#;
        let config: IndexConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.provider, "mock");
        assert_eq!(config.dimension, 384);
        assert_eq!(config.default_limit, 5);
    }

    // ------------------------------------------------------------------------
    // GemInput tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_gem_input_builder() {
        let input = GemInput::new("rails")
            .with_description("Ruby on Rails is a web application framework.")
            .with_keywords(["web", "framework"])
            .with_version("7.0.0");

        assert_eq!(input.name, "rails");
        assert_eq!(input.keywords.len(), 2);
        assert_eq!(input.version, "7.0.0");
        assert_eq!(input.download_count, 0);
        assert!(input.last_updated.is_none());
    }

    #[test]
    fn test_gem_input_sparse_json() {
        let json = r#"{"name": "rspec", "stars": 12000}"#;
        let input: GemInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.name, "rspec");
        assert_eq!(input.stars, 12000);
        assert!(input.description.is_empty());
        assert!(input.keywords.is_empty());
    }

    // ------------------------------------------------------------------------
    // SearchHit tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_search_hit_serialization() {
        let hit = SearchHit {
            name: "rails".to_string(),
            description: "web framework".to_string(),
            keywords: vec!["web".to_string()],
            version: "7.0.0".to_string(),
            homepage: "https://rubyonrails.org".to_string(),
            source_uri: String::new(),
            download_count: 500,
            stars: 55,
            last_updated: None,
            similarity_score: 0.91,
            rank: 1,
        };

        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("\"rank\":1"));
        assert!(json.contains("similarity_score"));

        let back: SearchHit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "rails");
        assert_eq!(back.rank, 1);
    }

    #[test]
    fn test_index_stats_serialization() {
        let stats = IndexStats {
            total_records: 5,
            index_size: 5,
            dimension: 384,
            model: "all-minilm-l6-v2".to_string(),
            store_path: "/tmp/store".to_string(),
        };

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"total_records\":5"));
        assert!(json.contains("384"));
    }
}
