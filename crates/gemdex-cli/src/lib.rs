//! Command-line interface for the gemdex discovery index.
//!
//! Provides the `gemdex` binary with `build`, `search`, and `stats`
//! commands over a [`gemdex_index::DiscoveryIndex`].

pub mod app;
pub mod cli;
pub mod config;

pub use app::GemdexApp;
pub use cli::{CliArgs, Command};
pub use config::GemdexConfig;
