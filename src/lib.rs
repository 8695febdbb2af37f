//! ofd-package - Storage core for OFD fixed-layout document packages
//!
//! An OFD package is a directory tree of XML structured objects plus binary
//! media, laid out by a fixed convention and cross-referenced by location
//! strings. This library provides the layers needed to write such a package:
//!
//! # Features
//!
//! - **Locations**: the package path grammar (absolute, relative, `.`/`..`)
//! - **Containers**: a virtual directory tree that stages files and objects
//!   in memory and writes them to disk only on flush
//! - **Resource catalogs**: content-deduplicated registration of fonts,
//!   images, draw parameters, color spaces and vector graphics, with stable
//!   identifiers
//! - **Element tree**: an ordered XML element model with a canonical form
//!
//! # Example - Registering resources
//!
//! ```no_run
//! use ofd_package::element::Element;
//! use ofd_package::pkg::PackageDir;
//! use ofd_package::res::{FontDescriptor, ResourceCatalog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pkg = PackageDir::open("out/package");
//! let doc = pkg.obtain_doc(0)?;
//! doc.set_document(Element::new("ofd:Document"))?;
//!
//! let mut catalog = ResourceCatalog::open_document(doc)?;
//! let font = catalog.add_font(&FontDescriptor::new("SimSun").with_file("simsun.ttf"))?;
//! let again = catalog.add_font(&FontDescriptor::new("SimSun").with_file("simsun.ttf"))?;
//! assert_eq!(font, again);
//!
//! catalog.commit()?;
//! pkg.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Resolving locations
//!
//! ```no_run
//! use ofd_package::pkg::Container;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Container::open("out/package");
//! let page = root
//!     .obtain_child("Doc_0", |_| {})?
//!     .obtain_child("Pages", |_| {})?
//!     .obtain_child("Page_0", |_| {})?;
//!
//! // Relative lookups fall back to enclosing containers.
//! if let Some(found) = page.get_file("Res/image_1.png") {
//!     println!("{} bytes", found.read()?.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Shared utilities: unified errors, hashing and XML text helpers
pub mod common;

/// Ordered XML element tree used for structured objects
pub mod element;

/// Locations, containers and the package directory layout
pub mod pkg;

/// Resource catalogs and identifier assignment
pub mod res;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use element::{Element, ElementBase};
pub use pkg::{Container, DocDir, Location, PackageDir, PackageOptions};
pub use res::{IdCounter, ObjectId, ResourceCatalog};
