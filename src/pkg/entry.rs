//! Entries staged inside a container.
//!
//! A staged file keeps a reference to its byte source until the owning
//! container is flushed; a staged object keeps its element tree plus the
//! digest of the bytes that are already on disk for it, so that unchanged
//! objects are never rewritten.

use crate::common::digest::{Digest256, sha256};
use crate::element::Element;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pending byte source of a staged file.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file outside the package, copied in on flush
    External(PathBuf),
    /// Bytes held in memory (shared via Arc for cheap lookups)
    Memory(Arc<Vec<u8>>),
}

impl FileSource {
    /// Read the full content.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        match self {
            FileSource::External(path) => std::fs::read(path),
            FileSource::Memory(bytes) => Ok(bytes.as_ref().clone()),
        }
    }

    /// Digest of the content.
    pub fn digest(&self) -> io::Result<Digest256> {
        match self {
            FileSource::External(path) => Ok(sha256(&std::fs::read(path)?)),
            FileSource::Memory(bytes) => Ok(sha256(bytes)),
        }
    }

    /// Materialize the content at `target`.
    pub(crate) fn write_to(&self, target: &Path) -> io::Result<()> {
        match self {
            // Staging a file that already sits at its target must not truncate it.
            FileSource::External(path) if same_file(path, target) => Ok(()),
            FileSource::External(path) => std::fs::copy(path, target).map(|_| ()),
            FileSource::Memory(bytes) => std::fs::write(target, bytes.as_slice()),
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// A file entry found by a container lookup.
#[derive(Debug, Clone)]
pub enum FileRef {
    /// Staged external file, not yet copied into the package
    External(PathBuf),
    /// Staged bytes or a structured object, not yet flushed
    Memory(Arc<Vec<u8>>),
    /// File present in the package directory
    Disk(PathBuf),
}

impl FileRef {
    /// Real filesystem path currently holding the bytes, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FileRef::External(path) | FileRef::Disk(path) => Some(path),
            FileRef::Memory(_) => None,
        }
    }

    /// Whether the bytes already live inside the package directory.
    pub fn is_materialized(&self) -> bool {
        matches!(self, FileRef::Disk(_))
    }

    /// Read the full content.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        match self {
            FileRef::External(path) | FileRef::Disk(path) => std::fs::read(path),
            FileRef::Memory(bytes) => Ok(bytes.as_ref().clone()),
        }
    }
}

impl From<&FileSource> for FileRef {
    fn from(source: &FileSource) -> Self {
        match source {
            FileSource::External(path) => FileRef::External(path.clone()),
            FileSource::Memory(bytes) => FileRef::Memory(Arc::clone(bytes)),
        }
    }
}

/// A structured object held by a container.
#[derive(Debug, Clone)]
pub(crate) struct StagedObject {
    pub(crate) element: Element,
    /// Digest of the canonical form matching what is on disk, if anything is
    pub(crate) persisted: Option<Digest256>,
}

impl StagedObject {
    /// Object put by a caller; always written on the next flush.
    pub(crate) fn fresh(element: Element) -> Self {
        Self { element, persisted: None }
    }

    /// Object read from disk; only written once it changes.
    pub(crate) fn loaded(element: Element) -> Self {
        let persisted = Some(sha256(element.to_xml_string().as_bytes()));
        Self { element, persisted }
    }

    /// Digest of the current canonical form.
    pub(crate) fn digest(&self) -> Digest256 {
        sha256(self.element.to_xml_string().as_bytes())
    }

    /// Whether the in-memory tree differs from what was last persisted.
    pub(crate) fn is_dirty(&self) -> bool {
        self.persisted != Some(self.digest())
    }
}
