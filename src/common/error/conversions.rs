//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from the
//! per-layer error types to the unified Error type.

use super::types::Error;
use crate::pkg::PackageError;
use crate::res::CatalogError;

impl From<PackageError> for Error {
    fn from(err: PackageError) -> Self {
        match err {
            PackageError::Io(e) => Error::Io(e),
            PackageError::MalformedObject { location, reason } => {
                Error::CorruptedPackage(format!("{location}: {reason}"))
            },
            PackageError::InvalidName(s) => Error::InvalidLocation(s),
            _ => Error::Other(err.to_string()),
        }
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Package(e) => Error::from(e),
            CatalogError::MalformedCatalog { .. } => Error::CorruptedPackage(err.to_string()),
            CatalogError::IdentifiersExhausted(_) => Error::Other(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlError(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::XmlError(format!("Invalid UTF-8: {err}"))
    }
}
