//! Typed views over the fixed package directory layout.
//!
//! ```text
//! /                     PackageDir
//! ├── OFD.xml           package index
//! └── Doc_0/            DocDir
//!     ├── Document.xml
//!     ├── PublicRes.xml
//!     ├── DocumentRes.xml
//!     └── Res/          binary media
//! ```

use crate::element::Element;
use crate::pkg::constants::{
    DOC_DIR_PREFIX, DOCUMENT_FILE, DOCUMENT_RES_FILE, INDEX_FILE, PUBLIC_RES_FILE, RES_DIR,
};
use crate::pkg::container::Container;
use crate::pkg::error::Result;
use crate::pkg::loc::Location;
use crate::pkg::options::PackageOptions;
use std::path::Path;

/// Root of a package.
#[derive(Debug, Clone)]
pub struct PackageDir {
    root: Container,
}

impl PackageDir {
    /// Open a package rooted at `dir` with default options.
    pub fn open<P: AsRef<Path>>(dir: P) -> Self {
        Self { root: Container::open(dir) }
    }

    /// Open a package rooted at `dir`.
    pub fn open_with<P: AsRef<Path>>(dir: P, options: PackageOptions) -> Self {
        Self { root: Container::open_with(dir, options) }
    }

    /// The underlying root container.
    pub fn container(&self) -> &Container {
        &self.root
    }

    /// The `OFD.xml` index object, if present.
    pub fn index(&self) -> Result<Option<Element>> {
        self.root.get_local_object(INDEX_FILE)
    }

    /// Replace the `OFD.xml` index object.
    pub fn set_index(&self, index: Element) -> Result<()> {
        self.root.put_object(INDEX_FILE, index)
    }

    /// An existing `Doc_N` directory.
    pub fn doc(&self, n: u32) -> Option<DocDir> {
        self.root.get_child(&doc_dir_name(n)).map(DocDir::new)
    }

    /// The `Doc_N` directory, declared if it does not exist yet.
    pub fn obtain_doc(&self, n: u32) -> Result<DocDir> {
        self.root
            .obtain_child(&doc_dir_name(n), |_| {})
            .map(DocDir::new)
    }

    /// Flush every container in the package.
    pub fn flush(&self) -> Result<()> {
        self.root.flush_all()
    }

    /// Flush everything and release in-memory state.
    pub fn close(&self) -> Result<()> {
        self.root.close()
    }
}

fn doc_dir_name(n: u32) -> String {
    let mut buf = itoa::Buffer::new();
    let mut name = String::from(DOC_DIR_PREFIX);
    name.push_str(buf.format(n));
    name
}

/// One logical document directory (`Doc_N`).
#[derive(Debug, Clone)]
pub struct DocDir {
    dir: Container,
}

impl DocDir {
    /// Wrap a container as a document directory.
    pub fn new(dir: Container) -> Self {
        Self { dir }
    }

    /// The underlying container.
    pub fn container(&self) -> &Container {
        &self.dir
    }

    /// Absolute location of this document directory.
    pub fn abs_loc(&self) -> Location {
        self.dir.abs_loc()
    }

    /// The package root container.
    pub fn root(&self) -> Container {
        self.dir.root()
    }

    /// Whether `name` exists directly in this directory.
    pub fn exists(&self, name: &str) -> bool {
        self.dir.exists(name)
    }

    pub fn document(&self) -> Result<Option<Element>> {
        self.dir.get_local_object(DOCUMENT_FILE)
    }

    pub fn set_document(&self, document: Element) -> Result<()> {
        self.dir.put_object(DOCUMENT_FILE, document)
    }

    /// The public resource catalog (`PublicRes.xml`), if present.
    pub fn public_res(&self) -> Result<Option<Element>> {
        self.dir.get_local_object(PUBLIC_RES_FILE)
    }

    pub fn set_public_res(&self, res: Element) -> Result<()> {
        self.dir.put_object(PUBLIC_RES_FILE, res)
    }

    /// The document resource catalog (`DocumentRes.xml`), if present.
    pub fn document_res(&self) -> Result<Option<Element>> {
        self.dir.get_local_object(DOCUMENT_RES_FILE)
    }

    pub fn set_document_res(&self, res: Element) -> Result<()> {
        self.dir.put_object(DOCUMENT_RES_FILE, res)
    }

    /// The `Res` media directory, declared on first use.
    pub fn res_dir(&self) -> Result<Container> {
        self.dir.obtain_child(RES_DIR, |_| {})
    }

    /// Stage a media file into `Res`.
    ///
    /// # Returns
    /// The name assigned inside `Res`, which differs from the source file name
    /// when a different file already uses that name.
    pub fn add_resource<P: AsRef<Path>>(&self, source: P) -> Result<String> {
        self.res_dir()?.stage_file(source)
    }
}
