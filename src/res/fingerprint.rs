//! Content fingerprints of resource objects.
//!
//! A fingerprint is the SHA-256 of an element's canonical serialized form with
//! its `ID` attribute removed. Two objects that differ only by identifier share
//! a fingerprint; any other difference, including attribute order or
//! whitespace in text, yields a different one.

use crate::common::digest::{Digest256, sha256, to_hex};
use crate::element::{Element, ElementBase};
use crate::pkg::constants::ID_ATTR;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(Digest256);

impl Fingerprint {
    /// Fingerprint of `element`, ignoring its `ID` attribute.
    pub fn of(element: &Element) -> Self {
        if element.has_attribute(ID_ATTR) {
            let mut stripped = element.clone();
            stripped.remove_attribute(ID_ATTR);
            Self::of_canonical(&stripped)
        } else {
            Self::of_canonical(element)
        }
    }

    fn of_canonical(element: &Element) -> Self {
        Self(sha256(element.to_xml_string().as_bytes()))
    }

    pub fn as_bytes(&self) -> &Digest256 {
        &self.0
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({})", to_hex(&self.0))
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_hex(&self.0))
    }
}
