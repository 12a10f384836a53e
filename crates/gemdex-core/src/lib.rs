//! Shared error types and Result alias for Gemdex crates.
//!
//! This crate provides the foundational types used across all Gemdex crates.
//! It has no internal Gemdex dependencies (dependency level 0).

pub mod error;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
