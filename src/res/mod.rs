//! Resource catalogs of a logical document.
//!
//! Shared resources are registered once per document and referenced by
//! identifier everywhere else:
//!
//! - fonts and color spaces go to the public catalog (`PublicRes.xml`)
//! - images, draw parameters and vector-graphic units go to the document
//!   catalog (`DocumentRes.xml`)
//!
//! [`ResourceCatalog`] deduplicates by content, so adding the same resource
//! twice yields one entry and one identifier.

pub mod catalog;
pub mod error;
pub mod fingerprint;
pub mod font;
pub mod id;
pub mod kind;
pub mod media;

// Re-export commonly used types
pub use catalog::ResourceCatalog;
pub use error::{CatalogError, Result};
pub use fingerprint::Fingerprint;
pub use font::{ExistingFont, FontDescriptor, FontFlags};
pub use id::{IdCounter, ObjectId};
pub use kind::{CatalogScope, ResourceKind, ResourceObject};
pub use media::image_format;
