//! Structured-object layer.
//!
//! Package descriptors and resource catalogs are XML documents. This module
//! provides the small element tree the rest of the crate reads, edits and
//! fingerprints; it knows nothing about the schema of any
//! particular file.

pub mod element;

pub use element::{Element, ElementBase, XML_DECLARATION};
