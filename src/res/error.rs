//! Error types for resource catalog operations
use crate::pkg::PackageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("Malformed resource catalog {file}: {reason}")]
    MalformedCatalog { file: &'static str, reason: String },

    #[error("Object identifiers exhausted: high-water mark is {0}")]
    IdentifiersExhausted(u32),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
