//! XML text helpers shared by the element layer.

pub mod escape;

pub use escape::{escape_text, escape_xml, resolve_entity};
