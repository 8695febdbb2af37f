//! Package storage: locations, containers and the directory layout.
//!
//! This module provides the storage core of a package:
//!
//! - [`Location`]: path values following the package location grammar
//! - [`Container`]: a virtual directory tree that stages files and structured
//!   objects and only touches the filesystem on flush
//! - [`PackageDir`] / [`DocDir`]: typed views over the fixed layout
//!
//! # Example
//!
//! ```no_run
//! use ofd_package::element::Element;
//! use ofd_package::pkg::PackageDir;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pkg = PackageDir::open("out/package");
//! let doc = pkg.obtain_doc(0)?;
//! doc.set_document(Element::new("ofd:Document"))?;
//! let name = doc.add_resource("logo.png")?;
//! println!("stored as Res/{}", name);
//! pkg.close()?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod container;
pub mod entry;
pub mod error;
pub mod layout;
pub mod loc;
pub mod options;

// Re-export commonly used types
pub use container::Container;
pub use entry::{FileRef, FileSource};
pub use error::{PackageError, Result};
pub use layout::{DocDir, PackageDir};
pub use loc::Location;
pub use options::PackageOptions;
