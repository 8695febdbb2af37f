//! Unified error type definitions.
use thiserror::Error;

/// Main error type for package operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// Existing package state could not be understood
    #[error("Corrupted package: {0}")]
    CorruptedPackage(String),

    /// Entry name or location rejected by the package grammar
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for package operations.
pub type Result<T> = std::result::Result<T, Error>;
