//! Virtual containers over the package directory tree.
//!
//! A [`Container`] stands for one directory level of a package. Callers stage
//! files and structured objects into it and look entries up by [`Location`]
//! without caring whether an entry is still pending, cached in memory or
//! already on disk. The real filesystem is only written on [`Container::flush`],
//! [`Container::flush_all`] and [`Container::close`].
//!
//! Containers form a tree: a parent exclusively owns its children, while each
//! child keeps a weak back-pointer to its parent for upward resolution.
//! Handles are cheap to clone and share the same node.

use crate::common::digest::{Digest256, sha256};
use crate::element::Element;
use crate::pkg::entry::{FileRef, FileSource, StagedObject};
use crate::pkg::error::{PackageError, Result};
use crate::pkg::loc::{Location, Parts};
use crate::pkg::options::PackageOptions;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

/// Handle to one directory level of a package.
#[derive(Clone)]
pub struct Container {
    node: Arc<RwLock<Node>>,
}

struct Node {
    /// Directory name ("" only for a root opened at a filesystem root)
    name: String,
    /// Absolute location from the package root
    abs_loc: Location,
    /// Real directory backing this container
    sys_path: PathBuf,
    parent: Weak<RwLock<Node>>,
    options: Arc<PackageOptions>,
    children: BTreeMap<String, Container>,
    files: BTreeMap<String, FileSource>,
    objects: BTreeMap<String, StagedObject>,
}

impl Container {
    /// Open a package root over `dir` with default options.
    ///
    /// The directory is not created until the first flush.
    pub fn open<P: AsRef<Path>>(dir: P) -> Self {
        Self::open_with(dir, PackageOptions::default())
    }

    /// Open a package root over `dir`.
    pub fn open_with<P: AsRef<Path>>(dir: P, options: PackageOptions) -> Self {
        let sys_path = dir.as_ref().to_path_buf();
        let name = sys_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_node(Node {
            name,
            abs_loc: Location::root(),
            sys_path,
            parent: Weak::new(),
            options: Arc::new(options),
            children: BTreeMap::new(),
            files: BTreeMap::new(),
            objects: BTreeMap::new(),
        })
    }

    fn from_node(node: Node) -> Self {
        Self { node: Arc::new(RwLock::new(node)) }
    }

    fn new_child(&self, name: &str) -> Container {
        let parent = self.node.read();
        Self::from_node(Node {
            name: name.to_string(),
            abs_loc: parent.abs_loc.join(name),
            sys_path: parent.sys_path.join(name),
            parent: Arc::downgrade(&self.node),
            options: Arc::clone(&parent.options),
            children: BTreeMap::new(),
            files: BTreeMap::new(),
            objects: BTreeMap::new(),
        })
    }

    /// Directory name of this container.
    pub fn name(&self) -> String {
        self.node.read().name.clone()
    }

    /// Absolute location from the package root ("/" for the root).
    pub fn abs_loc(&self) -> Location {
        self.node.read().abs_loc.clone()
    }

    /// Real on-disk directory of this container.
    pub fn sys_path(&self) -> PathBuf {
        self.node.read().sys_path.clone()
    }

    /// Options shared by the whole tree.
    pub fn options(&self) -> Arc<PackageOptions> {
        Arc::clone(&self.node.read().options)
    }

    /// Parent container, or `None` at the package root.
    pub fn parent(&self) -> Option<Container> {
        self.node.read().parent.upgrade().map(|node| Container { node })
    }

    /// Whether this container is the package root.
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// This container followed by each ancestor up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Container> + use<> {
        std::iter::successors(Some(self.clone()), Container::parent)
    }

    /// The package root container.
    pub fn root(&self) -> Container {
        self.ancestors().last().unwrap_or_else(|| self.clone())
    }

    /// Whether both handles point at the same node.
    pub fn same_as(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    // ------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------

    /// Get an existing child: registered, or present as a directory on disk.
    pub fn get_child(&self, name: &str) -> Option<Container> {
        let path = {
            let node = self.node.read();
            if let Some(child) = node.children.get(name) {
                return Some(child.clone());
            }
            node.sys_path.join(name)
        };
        if check_name(name).is_err() || !path.is_dir() {
            return None;
        }
        Some(self.register(name, self.new_child(name)))
    }

    /// Get an existing child or declare a new one.
    ///
    /// `init` runs once, right after a new child is registered, so callers can
    /// seed it. Declaring a child does not touch the disk.
    pub fn obtain_child<F>(&self, name: &str, init: F) -> Result<Container>
    where
        F: FnOnce(&Container),
    {
        check_name(name)?;
        if let Some(child) = self.get_child(name) {
            return Ok(child);
        }
        let child = self.register(name, self.new_child(name));
        tracing::trace!(container = %child.abs_loc(), "declared child container");
        init(&child);
        Ok(child)
    }

    fn register(&self, name: &str, child: Container) -> Container {
        self.node
            .write()
            .children
            .entry(name.to_string())
            .or_insert(child)
            .clone()
    }

    /// Registered children in name order.
    pub fn children(&self) -> Vec<Container> {
        self.node.read().children.values().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// Stage an external file under its own file name.
    ///
    /// Staging a file whose name and content match an existing entry is a
    /// no-op. A name clash with different content picks the first free (or
    /// content-identical) name among `stem_1.ext`, `stem_2.ext`, ... The name
    /// actually used is returned so callers can update their references.
    pub fn stage_file<P: AsRef<Path>>(&self, source: P) -> Result<String> {
        let source = source.as_ref();
        if !source.is_file() {
            return Err(PackageError::SourceNotFound(source.to_path_buf()));
        }
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PackageError::InvalidName(source.display().to_string()))?
            .to_string();
        check_name(&name)?;

        let options = self.options();
        if !options.dedupe_staged_files {
            self.insert_file(&name, FileSource::External(source.to_path_buf()));
            return Ok(name);
        }

        let digest = sha256(&std::fs::read(source)?);
        for attempt in 0..=options.max_rename_attempts {
            let candidate = if attempt == 0 {
                name.clone()
            } else {
                renamed(&name, attempt)
            };
            match self.existing_digest(&candidate)? {
                None => {
                    if attempt > 0 {
                        tracing::debug!(
                            container = %self.abs_loc(),
                            requested = %name,
                            assigned = %candidate,
                            "renamed staged file with conflicting content"
                        );
                    }
                    self.insert_file(&candidate, FileSource::External(source.to_path_buf()));
                    return Ok(candidate);
                },
                Some(existing) if existing == digest => return Ok(candidate),
                Some(_) => {},
            }
        }

        Err(PackageError::NameExhausted {
            name,
            attempts: options.max_rename_attempts,
        })
    }

    /// Stage in-memory bytes under `name`, replacing any prior entry.
    pub fn stage_bytes(&self, name: &str, bytes: impl Into<Vec<u8>>) -> Result<()> {
        check_name(name)?;
        self.insert_file(name, FileSource::Memory(Arc::new(bytes.into())));
        Ok(())
    }

    fn insert_file(&self, name: &str, source: FileSource) {
        let mut node = self.node.write();
        node.objects.remove(name);
        node.files.insert(name.to_string(), source);
    }

    /// Digest of whatever currently answers to `name` in this container.
    fn existing_digest(&self, name: &str) -> Result<Option<Digest256>> {
        let path = {
            let node = self.node.read();
            if let Some(source) = node.files.get(name) {
                return Ok(Some(source.digest()?));
            }
            if let Some(object) = node.objects.get(name) {
                let bytes = object.element.to_document_bytes(node.options.xml_declaration);
                return Ok(Some(sha256(&bytes)));
            }
            node.sys_path.join(name)
        };
        if path.is_file() {
            Ok(Some(sha256(&std::fs::read(path)?)))
        } else {
            Ok(None)
        }
    }

    /// Whether an entry named `name` exists directly in this container.
    pub fn exists(&self, name: &str) -> bool {
        self.get_local_file(name).is_some()
    }

    /// Resolve a file by location.
    ///
    /// Absolute locations resolve from the package root. Relative locations
    /// resolve from this container first and then from each ancestor in turn,
    /// since some references are only unambiguous relative to an enclosing
    /// scope. Returns `None` when nothing matches.
    pub fn get_file<L: AsRef<str>>(&self, loc: L) -> Option<FileRef> {
        let loc = Location::parse(loc.as_ref())?;
        let parts = loc.parts();
        self.scopes(&loc).into_iter().find_map(|scope| {
            scope
                .descend(&parts)
                .and_then(|(container, name)| container.get_local_file(name))
        })
    }

    /// Resolve a file by location and read it.
    pub fn read_file<L: AsRef<str>>(&self, loc: L) -> Result<Option<Vec<u8>>> {
        match self.get_file(loc) {
            Some(found) => Ok(Some(found.read()?)),
            None => Ok(None),
        }
    }

    /// Look up `name` in this container only, without walking ancestors.
    pub fn get_local_file(&self, name: &str) -> Option<FileRef> {
        let path = {
            let node = self.node.read();
            if let Some(source) = node.files.get(name) {
                return Some(FileRef::from(source));
            }
            if let Some(object) = node.objects.get(name)
                && object.is_dirty()
            {
                let bytes = object.element.to_document_bytes(node.options.xml_declaration);
                return Some(FileRef::Memory(Arc::new(bytes)));
            }
            node.sys_path.join(name)
        };
        path.is_file().then_some(FileRef::Disk(path))
    }

    // ------------------------------------------------------------------
    // Structured objects
    // ------------------------------------------------------------------

    /// Stage a structured object under `name`, replacing any prior entry.
    pub fn put_object(&self, name: &str, element: Element) -> Result<()> {
        check_name(name)?;
        let mut node = self.node.write();
        node.files.remove(name);
        let mut object = StagedObject::fresh(element);
        // Keep what is known about the disk copy so an unchanged put stays clean.
        object.persisted = node.objects.get(name).and_then(|o| o.persisted);
        node.objects.insert(name.to_string(), object);
        Ok(())
    }

    /// Resolve a structured object by location, with the same rules as
    /// [`get_file`](Self::get_file).
    ///
    /// The first read of an on-disk or staged file parses and caches it.
    /// Content that does not parse is an error; a missing entry is `Ok(None)`.
    pub fn get_object<L: AsRef<str>>(&self, loc: L) -> Result<Option<Element>> {
        let Some(loc) = Location::parse(loc.as_ref()) else {
            return Ok(None);
        };
        let parts = loc.parts();
        for scope in self.scopes(&loc) {
            if let Some((container, name)) = scope.descend(&parts)
                && let Some(element) = container.get_local_object(name)?
            {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    /// Structured object named `name` in this container only.
    pub fn get_local_object(&self, name: &str) -> Result<Option<Element>> {
        if let Some(object) = self.node.read().objects.get(name) {
            return Ok(Some(object.element.clone()));
        }
        let Some(found) = self.get_local_file(name) else {
            return Ok(None);
        };
        let bytes = found.read()?;
        let element =
            Element::from_bytes(&bytes).map_err(|e| PackageError::MalformedObject {
                location: self.abs_loc().join(name).to_string(),
                reason: e.to_string(),
            })?;
        self.node
            .write()
            .objects
            .insert(name.to_string(), StagedObject::loaded(element.clone()));
        Ok(Some(element))
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Containers to try, in order, for a location.
    fn scopes(&self, loc: &Location) -> Vec<Container> {
        if loc.is_root_path() {
            vec![self.root()]
        } else {
            self.ancestors().collect()
        }
    }

    /// Walk down the directory segments of `parts`, returning the container
    /// holding the last segment together with that segment.
    fn descend<'p>(&self, parts: &Parts<'p>) -> Option<(Container, &'p str)> {
        let (file, dirs) = parts.split_last()?;
        if matches!(*file, "." | "..") {
            return None;
        }
        let mut current = self.clone();
        for segment in dirs {
            current = match *segment {
                "." => current,
                ".." => current.parent()?,
                name => current.get_child(name)?,
            };
        }
        Some((current, *file))
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Write the entries owned directly by this container.
    ///
    /// Creates the directory if needed. Children are not flushed. Staged files
    /// are copied in and dropped from the staging area; objects are written
    /// only when their content differs from what was last persisted, so a
    /// repeated flush leaves the disk untouched.
    pub fn flush(&self) -> Result<()> {
        let mut guard = self.node.write();
        let node = &mut *guard;
        std::fs::create_dir_all(&node.sys_path)?;

        let staged: Vec<String> = node.files.keys().cloned().collect();
        for name in &staged {
            if let Some(source) = node.files.get(name) {
                source.write_to(&node.sys_path.join(name))?;
            }
            node.files.remove(name);
        }

        let declaration = node.options.xml_declaration;
        let mut written = 0usize;
        for (name, object) in node.objects.iter_mut() {
            let target = node.sys_path.join(name);
            let digest = object.digest();
            if object.persisted == Some(digest) && target.is_file() {
                continue;
            }
            std::fs::write(&target, object.element.to_document_bytes(declaration))?;
            object.persisted = Some(digest);
            written += 1;
        }

        tracing::debug!(
            container = %node.abs_loc,
            files = staged.len(),
            objects = written,
            "flushed container"
        );
        Ok(())
    }

    /// Flush this container and every descendant.
    pub fn flush_all(&self) -> Result<()> {
        self.flush()?;
        for child in self.children() {
            child.flush_all()?;
        }
        Ok(())
    }

    /// Flush everything below this container, then release in-memory state.
    pub fn close(&self) -> Result<()> {
        self.flush_all()?;
        self.release();
        Ok(())
    }

    fn release(&self) {
        let children = {
            let mut node = self.node.write();
            node.files.clear();
            node.objects.clear();
            std::mem::take(&mut node.children)
        };
        for child in children.values() {
            child.release();
        }
    }

    /// Delete this container's directory and drop all staged state.
    pub fn clean(&self) -> Result<()> {
        self.release();
        let path = self.sys_path();
        if path.exists() {
            std::fs::remove_dir_all(&path)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.node.read();
        f.debug_struct("Container")
            .field("abs_loc", &node.abs_loc)
            .field("sys_path", &node.sys_path)
            .field("children", &node.children.len())
            .field("files", &node.files.len())
            .field("objects", &node.objects.len())
            .finish()
    }
}

/// Entry and child names are single path segments.
fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains(['/', '\\']) || matches!(name, "." | "..") {
        return Err(PackageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// `image.png` -> `image_2.png`; `LICENSE` -> `LICENSE_2`.
fn renamed(name: &str, attempt: u32) -> String {
    let mut buf = itoa::Buffer::new();
    let n = buf.format(attempt);
    match name.rfind('.') {
        Some(pos) if pos > 0 => format!("{}_{}{}", &name[..pos], n, &name[pos..]),
        _ => format!("{}_{}", name, n),
    }
}
