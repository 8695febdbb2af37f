//! Object identifiers and the shared identifier counter.
//!
//! Every cataloged resource carries a document-unique `ID`. Identifiers come
//! from one counter per document, seeded from the `MaxUnitID` high-water mark
//! recorded in `Document.xml`.

use crate::element::{Element, ElementBase};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// A document-unique object identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Parse an `ID` attribute value; `None` when it is not a number.
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok().map(Self)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = itoa::Buffer::new();
        f.write_str(buf.format(self.0))
    }
}

impl From<ObjectId> for u32 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

/// Cloneable handle over a shared, atomically incremented counter.
///
/// Clones share the same value, so a page writer and a resource catalog can
/// draw identifiers from one sequence.
#[derive(Debug, Clone, Default)]
pub struct IdCounter {
    value: Arc<AtomicU32>,
}

impl IdCounter {
    /// Counter whose next identifier is `start + 1`.
    pub fn new(start: u32) -> Self {
        Self { value: Arc::new(AtomicU32::new(start)) }
    }

    /// Seed a counter from a `Document.xml` object.
    ///
    /// Reads `CommonData/MaxUnitID`; a missing or unparsable value starts the
    /// counter at zero.
    pub fn from_document(document: &Element) -> Self {
        let max = document
            .first_child("CommonData")
            .and_then(|common| common.first_child("MaxUnitID"))
            .and_then(|max| max.text().trim().parse().ok())
            .unwrap_or(0);
        Self::new(max)
    }

    /// Allocate the next identifier.
    ///
    /// Returns `None` once the high-water mark is `u32::MAX`; the counter is
    /// left unchanged in that case.
    pub fn next(&self) -> Option<ObjectId> {
        self.value
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_add(1))
            .ok()
            .map(|prev| ObjectId(prev + 1))
    }

    /// The most recently allocated identifier value (the high-water mark).
    pub fn current(&self) -> u32 {
        self.value.load(Ordering::SeqCst)
    }

    /// Raise the high-water mark to at least `id`.
    ///
    /// Used when existing objects are discovered, so that new identifiers
    /// never collide with them.
    pub fn observe(&self, id: ObjectId) {
        self.value.fetch_max(id.0, Ordering::SeqCst);
    }
}
