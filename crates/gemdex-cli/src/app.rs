//! Gemdex CLI application.
//!
//! Wires configuration, logging, and the discovery index behind the
//! `build`, `search`, and `stats` commands.

use crate::cli::{CliArgs, Command};
use crate::config::GemdexConfig;
use gemdex_core::Result;
use gemdex_index::{demo_readme, sample_gems, DiscoveryIndex};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// GemdexApp
// ============================================================================

/// CLI application over the discovery index.
pub struct GemdexApp {
    name: String,
    config: GemdexConfig,
    version: String,
}

impl GemdexApp {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = GemdexConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: GemdexConfig) -> Self {
        Self {
            name: name.into(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &GemdexConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Build) => self.handle_build().await,
            Some(Command::Search { query, limit }) => self.handle_search(&query, limit).await,
            Some(Command::Stats) => self.handle_stats().await,
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            None => {
                println!("{} {} — use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    /// Build the index from the bundled sample gems and persist it.
    async fn handle_build(&self) -> Result<()> {
        let mut index = DiscoveryIndex::open(self.config.index_config()).await?;

        if !index.embedding_available() {
            println!("Embedding capability unavailable; nothing will be indexed.");
        }

        for gem in sample_gems() {
            let readme = demo_readme(&gem);
            index.add(&gem, &readme).await?;
        }
        index.persist()?;

        let stats = index.stats().await?;
        println!(
            "Index built: {} gems, {} vectors, dimension {}",
            stats.total_records, stats.index_size, stats.dimension
        );

        // Smoke query against the freshly built index.
        for hit in index.search("web framework", 3).await? {
            info!(name = %hit.name, score = hit.similarity_score, "smoke query hit");
        }
        Ok(())
    }

    /// Search the index and print ranked results.
    async fn handle_search(&self, query: &str, limit: Option<usize>) -> Result<()> {
        let index = DiscoveryIndex::open(self.config.index_config()).await?;
        let k = limit.unwrap_or_else(|| index.default_limit());

        let results = index.search(query, k).await?;
        if results.is_empty() {
            println!("No results for '{query}'.");
            return Ok(());
        }

        println!("Search results for '{query}':");
        for hit in &results {
            println!(
                "- {}: {} (score: {:.3})",
                hit.name, hit.description, hit.similarity_score
            );
        }
        Ok(())
    }

    /// Print index statistics.
    async fn handle_stats(&self) -> Result<()> {
        let index = DiscoveryIndex::open(self.config.index_config()).await?;
        let stats = index.stats().await?;

        println!("Vector Store Statistics:");
        println!("  total_records: {}", stats.total_records);
        println!("  index_size: {}", stats.index_size);
        println!("  dimension: {}", stats.dimension);
        println!("  model: {}", stats.model);
        println!("  store_path: {}", stats.store_path);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
