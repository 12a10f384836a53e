//! Configuration for the gemdex CLI.
//!
//! Loads from TOML files, environment variables, and defaults using the
//! `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `GEMDEX_CONFIG` environment variable
//! 3. XDG default: `~/.config/gemdex/config.toml`
//! 4. Built-in defaults

use confyg::{env, Confygery};
use gemdex_core::{Error, Result};
use gemdex_index::IndexConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the gemdex CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GemdexConfig {
    /// Project name, used for env var prefixes and default paths.
    pub project_name: String,

    /// Store location configuration.
    pub store: StoreConfig,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,

    /// Search defaults.
    pub search: SearchConfig,
}

/// Store location configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the metadata database and the serialized index.
    pub path: String,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider: "fastembed" or "mock".
    pub provider: String,

    /// Model name (e.g., "all-minilm-l6-v2").
    pub model: String,

    /// Embedding dimension for the mock provider.
    pub dimension: usize,

    /// Cache directory for downloaded models.
    pub cache_path: Option<String>,
}

/// Search defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default result limit.
    pub default_limit: usize,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for GemdexConfig {
    fn default() -> Self {
        Self {
            project_name: "gemdex".to_string(),
            store: StoreConfig::default(),
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "vector_store".to_string(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "fastembed".to_string(),
            model: "all-minilm-l6-v2".to_string(),
            dimension: 384,
            cache_path: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 5 }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl GemdexConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// Loading priority:
    /// 1. Explicit `config_path` (from `--config` flag)
    /// 2. `GEMDEX_CONFIG` env var
    /// 3. XDG default: `~/.config/gemdex/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("GEMDEX");
        env_opts.add_section("store");
        env_opts.add_section("embedding");
        env_opts.add_section("search");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        // 1. Explicit --config flag
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        // 2. GEMDEX_CONFIG env var
        if let Ok(path) = std::env::var("GEMDEX_CONFIG") {
            return Some(PathBuf::from(path));
        }

        // 3. XDG default
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gemdex").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Map this config onto the index-level configuration.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            store_path: self.store.path.clone(),
            provider: self.embedding.provider.clone(),
            model: self.embedding.model.clone(),
            dimension: self.embedding.dimension,
            cache_path: self.embedding.cache_path.clone(),
            default_limit: self.search.default_limit,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
