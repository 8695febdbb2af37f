//! Common types and utilities shared across the package layers.

// Submodule declarations
pub mod digest;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
