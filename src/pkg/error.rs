//! Error types for package container operations
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Invalid entry name: '{0}'")]
    InvalidName(String),

    #[error("Malformed structured object at {location}: {reason}")]
    MalformedObject { location: String, reason: String },

    #[error("No free name for '{name}' after {attempts} attempts")]
    NameExhausted { name: String, attempts: u32 },

    #[error("Options error: {0}")]
    Options(String),
}

pub type Result<T> = std::result::Result<T, PackageError>;
