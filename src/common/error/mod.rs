//! Unified error types for the package library.
//!
//! Each layer reports failures through its own error enum
//! ([`PackageError`](crate::pkg::PackageError),
//! [`CatalogError`](crate::res::CatalogError)); this module folds them into a
//! single type for callers that do not care which layer failed.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
