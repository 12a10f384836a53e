//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "GEMDEX_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Discovery index commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the index from the bundled sample gems.
    Build,

    /// Search the index for gems matching a query.
    Search {
        /// Natural-language search query.
        #[arg(short, long)]
        query: String,

        /// Maximum number of results (defaults to the configured limit).
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show index statistics.
    Stats,

    /// Print version information.
    Version,
}

// ============================================================================
// Tests
// ============================================================================
