//! Semantic discovery index for gem metadata.
//!
//! This crate turns textual package metadata (name, description, keywords,
//! README excerpt) into fixed-dimension unit vectors, stores them in an
//! append-only inner-product index, keeps a parallel durable SQLite record
//! of each gem, and answers natural-language queries with the k most
//! semantically similar gems.
//!
//! # Features
//!
//! - `embed-fastembed`: Enable local embedding generation via fastembed
//!
//! The embedding capability is optional: without a usable provider,
//! mutating operations degrade to a documented no-op and queries return
//! empty results instead of failing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      gemdex-index                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider trait                                 │
//! │  ├── MockEmbeddingProvider (always available)            │
//! │  └── FastEmbedProvider (feature: embed-fastembed)        │
//! ├──────────────────────────────────────────────────────────┤
//! │  FlatIndex: append-only exact inner-product search       │
//! │  MetadataStore: SQLite table keyed by name/position      │
//! ├──────────────────────────────────────────────────────────┤
//! │  DiscoveryIndex: add / search / persist / stats,         │
//! │  owns the position-to-row mapping                        │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod coordinator;
pub mod embedding;
pub mod flat;
pub mod sample;
pub mod store;
pub mod text;
pub mod types;

// Feature-gated provider module
#[cfg(feature = "embed-fastembed")]
pub mod fastembed;

// Re-exports: core types
pub use types::{GemInput, GemRecord, IndexConfig, IndexStats, SearchHit};

// Re-exports: components
pub use coordinator::DiscoveryIndex;
pub use embedding::{create_embedding_provider, EmbeddingProvider, MockEmbeddingProvider};
pub use flat::{normalize, FlatIndex};
pub use sample::{demo_readme, sample_gems};
pub use store::MetadataStore;
pub use text::compose_embedding_text;

// Feature-gated re-exports
#[cfg(feature = "embed-fastembed")]
pub use fastembed::FastEmbedProvider;
