//! Per-document resource catalog.
//!
//! `ResourceCatalog` deduplicates shared resource objects (fonts, images,
//! draw parameters, color spaces, vector-graphic units) as they are added to a
//! document, assigns each distinct object an identifier from the shared
//! counter and files it into the public or document catalog of its kind.
//!
//! Deduplication is by [`Fingerprint`]: the hash of an object's canonical form
//! with its `ID` stripped. On open, entries already present in the catalogs are
//! fingerprinted too, so re-adding an existing resource reuses its identifier.
//!
//! # Example
//!
//! ```no_run
//! use ofd_package::pkg::PackageDir;
//! use ofd_package::res::{FontDescriptor, ResourceCatalog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pkg = PackageDir::open("out/package");
//! let doc = pkg.obtain_doc(0)?;
//! let mut catalog = ResourceCatalog::open_document(doc)?;
//!
//! let font = catalog.add_font(&FontDescriptor::new("SimSun").with_file("simsun.ttf"))?;
//! let image = catalog.add_image("logo.png")?;
//! println!("font {} image {}", font, image);
//!
//! catalog.commit()?;
//! pkg.close()?;
//! # Ok(())
//! # }
//! ```

use crate::element::{Element, ElementBase};
use crate::pkg::constants::{ID_ATTR, OFD_NAMESPACE, RES_DIR, attr, tag};
use crate::pkg::{DocDir, FileRef, Location, PackageError};
use crate::res::error::{CatalogError, Result};
use crate::res::fingerprint::Fingerprint;
use crate::res::font::{ExistingFont, FontDescriptor, font_matches};
use crate::res::id::{IdCounter, ObjectId};
use crate::res::kind::{CatalogScope, ResourceKind, ResourceObject};
use crate::res::media::image_element;
use std::collections::HashMap;
use std::path::Path;

/// Registers shared resources of one logical document.
pub struct ResourceCatalog {
    doc: DocDir,
    counter: IdCounter,
    /// Catalog roots indexed by [`CatalogScope::index`]
    catalogs: [Option<Element>; 2],
    /// Catalogs created during this session
    created: [bool; 2],
    fingerprints: HashMap<Fingerprint, ObjectId>,
    new_ids: Vec<ObjectId>,
}

impl ResourceCatalog {
    /// Open the catalog of `doc`, drawing identifiers from `counter`.
    ///
    /// Existing `PublicRes.xml` and `DocumentRes.xml` entries are fingerprinted
    /// so they can be reused. A catalog file that cannot be parsed is an error;
    /// a missing one simply has no entries.
    pub fn open(doc: DocDir, counter: IdCounter) -> Result<Self> {
        let mut catalog = Self {
            doc,
            counter,
            catalogs: [None, None],
            created: [false, false],
            fingerprints: HashMap::new(),
            new_ids: Vec::new(),
        };

        for scope in CatalogScope::ALL {
            let loaded = load_catalog(&catalog.doc, scope)?;
            if let Some(res) = &loaded {
                catalog.hydrate(scope, res);
            }
            catalog.catalogs[scope.index()] = loaded;
        }

        tracing::debug!(
            document = %catalog.doc.abs_loc(),
            entries = catalog.fingerprints.len(),
            max_id = catalog.counter.current(),
            "opened resource catalog"
        );
        Ok(catalog)
    }

    /// Open the catalog of `doc` with a counter seeded from its `Document.xml`.
    pub fn open_document(doc: DocDir) -> Result<Self> {
        let counter = doc
            .document()?
            .map(|document| IdCounter::from_document(&document))
            .unwrap_or_default();
        Self::open(doc, counter)
    }

    fn hydrate(&mut self, scope: CatalogScope, res: &Element) {
        for list in res.children() {
            for entry in list.children() {
                let Some(id) = entry.get_attribute(ID_ATTR).and_then(ObjectId::parse) else {
                    tracing::warn!(
                        catalog = scope.file_name(),
                        tag = entry.tag_name(),
                        "skipping catalog entry without a valid identifier"
                    );
                    continue;
                };
                self.counter.observe(id);
                self.fingerprints.insert(Fingerprint::of(entry), id);
            }
        }
    }

    /// The document directory this catalog belongs to.
    pub fn doc_dir(&self) -> &DocDir {
        &self.doc
    }

    /// The shared identifier counter.
    pub fn counter(&self) -> &IdCounter {
        &self.counter
    }

    /// Root element of a catalog, if it exists.
    pub fn catalog_root(&self, scope: CatalogScope) -> Option<&Element> {
        self.catalogs[scope.index()].as_ref()
    }

    /// Identifiers assigned by this catalog, in assignment order.
    pub fn new_resource_ids(&self) -> &[ObjectId] {
        &self.new_ids
    }

    /// Catalog a resource object.
    ///
    /// Any identifier already on the object is discarded. If an object with
    /// the same content is known, its identifier is attached and returned and
    /// nothing is inserted. Otherwise a new identifier is allocated and the
    /// object is appended to the catalog of its kind.
    pub fn catalog(&mut self, object: &mut ResourceObject) -> Result<ObjectId> {
        let kind = object.kind();
        let element = object.element_mut();
        element.remove_attribute(ID_ATTR);
        let fingerprint = Fingerprint::of(element);

        if let Some(&id) = self.fingerprints.get(&fingerprint) {
            element.set_attribute(ID_ATTR, id.to_string());
            tracing::trace!(%id, ?kind, "reused cataloged resource");
            return Ok(id);
        }

        let id = self
            .counter
            .next()
            .ok_or_else(|| CatalogError::IdentifiersExhausted(self.counter.current()))?;
        element.set_attribute(ID_ATTR, id.to_string());
        self.fingerprints.insert(fingerprint, id);
        self.new_ids.push(id);
        self.insert(kind, object.element().clone())?;
        tracing::debug!(%id, ?kind, %fingerprint, "cataloged resource");
        Ok(id)
    }

    /// Classify and catalog a raw element.
    ///
    /// Elements of kinds the catalog does not host are left untouched and
    /// yield `Ok(None)` without consuming an identifier. Otherwise the
    /// assigned identifier is written back onto `element`.
    pub fn catalog_element(&mut self, element: &mut Element) -> Result<Option<ObjectId>> {
        let Some(kind) = ResourceKind::classify(element) else {
            tracing::trace!(tag = element.tag_name(), "ignoring unclassified element");
            return Ok(None);
        };
        let mut object = ResourceObject::new(kind, element.clone());
        let id = self.catalog(&mut object)?;
        *element = object.into_element();
        Ok(Some(id))
    }

    /// Register a font, embedding its file when allowed.
    pub fn add_font(&mut self, font: &FontDescriptor) -> Result<ObjectId> {
        let mut object = self.font_object(font)?;
        self.catalog(&mut object)
    }

    /// Like [`add_font`](Self::add_font), returning the cataloged entry.
    pub fn add_font_object(&mut self, font: &FontDescriptor) -> Result<Element> {
        let mut object = self.font_object(font)?;
        self.catalog(&mut object)?;
        Ok(object.into_element())
    }

    fn font_object(&self, font: &FontDescriptor) -> Result<ResourceObject> {
        let mut element = font.to_element();
        if font.embeddable
            && let Some(path) = &font.file
        {
            let name = self.doc.add_resource(path)?;
            let reference = self.media_reference(CatalogScope::Public, &name);
            element.add_child(Element::with_text(tag::FONT_FILE, reference));
        }
        Ok(ResourceObject::new(ResourceKind::Font, element))
    }

    /// Copy an image into the package and register it.
    pub fn add_image<P: AsRef<Path>>(&mut self, path: P) -> Result<ObjectId> {
        let name = self.doc.add_resource(path)?;
        let reference = self.media_reference(CatalogScope::Document, &name);
        let mut object = ResourceObject::new(ResourceKind::MultiMedia, image_element(&reference));
        self.catalog(&mut object)
    }

    /// Register a draw-parameter set. `params` itself is not modified.
    pub fn add_draw_param(&mut self, params: &Element) -> Result<ObjectId> {
        self.catalog(&mut ResourceObject::new(ResourceKind::DrawParam, params.clone()))
    }

    /// Register a color-space descriptor. `color_space` itself is not modified.
    pub fn add_color_space(&mut self, color_space: &Element) -> Result<ObjectId> {
        self.catalog(&mut ResourceObject::new(ResourceKind::ColorSpace, color_space.clone()))
    }

    /// Register a vector-graphic unit. `unit` itself is not modified.
    pub fn add_vector_graphic(&mut self, unit: &Element) -> Result<ObjectId> {
        self.catalog(&mut ResourceObject::new(
            ResourceKind::CompositeGraphicUnit,
            unit.clone(),
        ))
    }

    /// Find a registered font by font or family name, ignoring case.
    ///
    /// The public catalog is searched first; the document catalog only when
    /// the public one has no match. Within a catalog the last matching entry
    /// wins. The backing file is resolved from the package root when present.
    pub fn find_font(&self, name: &str) -> Option<ExistingFont> {
        if name.is_empty() {
            return None;
        }
        let lowered = name.to_lowercase();
        CatalogScope::ALL.into_iter().find_map(|scope| {
            let res = self.catalog_root(scope)?;
            let font = res
                .children_named("Fonts")
                .flat_map(|list| list.children_named("Font"))
                .filter(|font| font_matches(font, &lowered))
                .last()?;
            Some(ExistingFont {
                element: font.clone(),
                file: self.font_file(res, font),
            })
        })
    }

    fn font_file(&self, res: &Element, font: &Element) -> Option<FileRef> {
        let target = Location::parse(font.first_child("FontFile")?.text())?;
        let abs = self.absolute(res, &target);
        self.doc.root().get_file(abs)
    }

    /// Absolute location of `target` as referenced from the catalog `res`.
    fn absolute(&self, res: &Element, target: &Location) -> Location {
        if target.is_root_path() {
            return target.normalize();
        }
        let base = res.get_attribute(attr::BASE_LOC).and_then(Location::parse);
        let dir = match &base {
            Some(base) if base.is_root_path() => base.clone(),
            _ => self.doc.abs_loc().join_opt(base.as_ref()),
        };
        dir.join(target).normalize()
    }

    /// How a catalog refers to `name` inside `Res`.
    ///
    /// A bare name, unless the catalog exists with a `BaseLoc` other than
    /// `Res`, in which case the absolute location is used.
    fn media_reference(&self, scope: CatalogScope, name: &str) -> String {
        match self.catalog_root(scope) {
            Some(res) if res.get_attribute(attr::BASE_LOC).map(str::trim) != Some(RES_DIR) => {
                self.doc.abs_loc().join(RES_DIR).join(name).to_string()
            },
            _ => name.to_string(),
        }
    }

    fn insert(&mut self, kind: ResourceKind, element: Element) -> Result<()> {
        let scope = kind.scope();
        let res = self.obtain_catalog(scope);
        let list_name = kind.list_local_name();
        // Append to the last list of this kind; catalogs may carry several.
        let pos = match res
            .children()
            .iter()
            .rposition(|c| c.local_name() == list_name)
        {
            Some(pos) => pos,
            None => {
                res.add_child(Element::new(kind.list_tag()));
                res.children().len() - 1
            },
        };
        res.children_mut()[pos].add_child(element);
        self.sync(scope)
    }

    fn obtain_catalog(&mut self, scope: CatalogScope) -> &mut Element {
        let slot = scope.index();
        if self.catalogs[slot].is_none() {
            tracing::debug!(
                document = %self.doc.abs_loc(),
                catalog = scope.file_name(),
                "created resource catalog"
            );
            self.created[slot] = true;
        }
        self.catalogs[slot].get_or_insert_with(new_catalog)
    }

    /// Stage the in-memory catalog into the document directory.
    fn sync(&self, scope: CatalogScope) -> Result<()> {
        let Some(res) = self.catalog_root(scope) else {
            return Ok(());
        };
        match scope {
            CatalogScope::Public => self.doc.set_public_res(res.clone())?,
            CatalogScope::Document => self.doc.set_document_res(res.clone())?,
        }
        Ok(())
    }

    /// Record catalog bookkeeping in `Document.xml`.
    ///
    /// Catalogs created during this session are registered in `CommonData`
    /// (never twice) and `MaxUnitID` is raised to the counter's high-water
    /// mark. Without a `Document.xml` there is nothing to update.
    pub fn commit(&mut self) -> Result<()> {
        let Some(mut document) = self.doc.document()? else {
            tracing::debug!(
                document = %self.doc.abs_loc(),
                "no Document.xml, skipping catalog registration"
            );
            return Ok(());
        };

        let common = common_data_mut(&mut document);
        for scope in CatalogScope::ALL {
            if self.created[scope.index()] {
                register_catalog(common, scope);
            }
        }
        raise_max_unit_id(common, self.counter.current());

        self.doc.set_document(document)?;
        Ok(())
    }
}

impl std::fmt::Debug for ResourceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCatalog")
            .field("document", &self.doc.abs_loc())
            .field("entries", &self.fingerprints.len())
            .field("new_ids", &self.new_ids)
            .finish()
    }
}

fn load_catalog(doc: &DocDir, scope: CatalogScope) -> Result<Option<Element>> {
    let loaded = match scope {
        CatalogScope::Public => doc.public_res(),
        CatalogScope::Document => doc.document_res(),
    };
    loaded.map_err(|e| match e {
        PackageError::MalformedObject { reason, .. } => CatalogError::MalformedCatalog {
            file: scope.file_name(),
            reason,
        },
        other => CatalogError::Package(other),
    })
}

fn new_catalog() -> Element {
    Element::new(tag::RES)
        .attr(attr::XMLNS_OFD, OFD_NAMESPACE)
        .attr(attr::BASE_LOC, RES_DIR)
}

fn common_data_mut(document: &mut Element) -> &mut Element {
    let pos = match document
        .children()
        .iter()
        .position(|c| c.local_name() == "CommonData")
    {
        Some(pos) => pos,
        None => {
            document.children_mut().insert(0, Element::new(tag::COMMON_DATA));
            0
        },
    };
    &mut document.children_mut()[pos]
}

fn register_catalog(common: &mut Element, scope: CatalogScope) {
    let file = scope.file_name();
    let registration = scope.registration_tag();
    let local = registration.rsplit_once(':').map_or(registration, |(_, l)| l);
    let registered = common.children().iter().any(|c| {
        c.local_name() == local && Location::parse(c.text()).is_some_and(|loc| loc == file)
    });
    if registered {
        return;
    }
    // CommonData keeps MaxUnitID and PageArea ahead of the catalog entries,
    // and public catalogs ahead of document ones.
    let preceding: &[&str] = match scope {
        CatalogScope::Public => &["MaxUnitID", "PageArea", "PublicRes"],
        CatalogScope::Document => &["MaxUnitID", "PageArea", "PublicRes", "DocumentRes"],
    };
    let pos = common
        .children()
        .iter()
        .rposition(|c| preceding.iter().any(|p| *p == c.local_name()))
        .map_or(0, |p| p + 1);
    common
        .children_mut()
        .insert(pos, Element::with_text(registration, file));
}

fn raise_max_unit_id(common: &mut Element, current: u32) {
    let mut buf = itoa::Buffer::new();
    match common.first_child_mut("MaxUnitID") {
        Some(max) => {
            let existing: u32 = max.text().trim().parse().unwrap_or(0);
            max.set_text(buf.format(existing.max(current)));
        },
        None => common
            .children_mut()
            .insert(0, Element::with_text(tag::MAX_UNIT_ID, buf.format(current))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::PackageDir;
    use std::fs;

    const NS: &str = r#"xmlns:ofd="http://www.ofdspec.org/2016""#;

    fn document(max_unit_id: u32) -> Element {
        Element::new("ofd:Document").child(
            Element::new("ofd:CommonData")
                .child(Element::with_text("ofd:MaxUnitID", max_unit_id.to_string())),
        )
    }

    fn setup() -> (tempfile::TempDir, PackageDir, DocDir) {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = PackageDir::open(tmp.path());
        let doc = pkg.obtain_doc(0).unwrap();
        doc.set_document(document(0)).unwrap();
        (tmp, pkg, doc)
    }

    /// Package whose Doc_0 already holds the given catalog files on disk.
    fn existing(files: &[(&str, &str)]) -> (tempfile::TempDir, PackageDir) {
        let tmp = tempfile::tempdir().unwrap();
        let doc_dir = tmp.path().join("Doc_0");
        fs::create_dir_all(&doc_dir).unwrap();
        for (name, content) in files {
            fs::write(doc_dir.join(name), content).unwrap();
        }
        let pkg = PackageDir::open(tmp.path());
        (tmp, pkg)
    }

    fn draw_param(width: &str) -> Element {
        Element::new("ofd:DrawParam")
            .attr("LineWidth", width)
            .child(Element::new("ofd:StrokeColor").attr("Value", "0 0 0"))
    }

    fn entries<'a>(res: &'a Element, list: &'a str) -> Vec<&'a Element> {
        res.children_named(list).flat_map(|l| l.children()).collect()
    }

    #[test]
    fn test_identical_objects_share_identifier() {
        let (_tmp, _pkg, doc) = setup();
        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(0)).unwrap();

        let first = catalog.add_draw_param(&draw_param("0.5")).unwrap();
        let second = catalog
            .add_draw_param(&draw_param("0.5").attr("ID", "99"))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(catalog.new_resource_ids(), &[first]);

        let res = catalog.catalog_root(CatalogScope::Document).unwrap();
        assert_eq!(entries(res, "DrawParams").len(), 1);
    }

    #[test]
    fn test_distinct_objects_get_increasing_identifiers() {
        let (_tmp, _pkg, doc) = setup();
        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(5)).unwrap();

        let a = catalog.add_draw_param(&draw_param("0.5")).unwrap();
        let b = catalog.add_draw_param(&draw_param("0.75")).unwrap();
        assert_eq!(a, ObjectId::new(6));
        assert_eq!(b, ObjectId::new(7));
        assert_eq!(catalog.new_resource_ids(), &[a, b]);
    }

    #[test]
    fn test_draw_param_input_is_not_modified() {
        let (_tmp, _pkg, doc) = setup();
        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(0)).unwrap();
        let params = draw_param("1");
        catalog.add_draw_param(&params).unwrap();
        assert!(!params.has_attribute("ID"));
        // The caller may reuse its value for another insertion.
        assert_eq!(catalog.add_draw_param(&params).unwrap(), ObjectId::new(1));
    }

    #[test]
    fn test_objects_are_routed_by_kind() {
        let (tmp, pkg, doc) = setup();
        let src = tempfile::tempdir().unwrap();
        let image = src.path().join("icon.png");
        fs::write(&image, b"png").unwrap();

        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(0)).unwrap();
        catalog.add_font(&FontDescriptor::new("SimSun")).unwrap();
        catalog
            .add_color_space(&Element::new("ofd:ColorSpace").attr("Type", "RGB"))
            .unwrap();
        catalog.add_image(&image).unwrap();
        catalog
            .add_vector_graphic(&Element::new("ofd:CompositeGraphicUnit").attr("Width", "10"))
            .unwrap();
        catalog.add_draw_param(&draw_param("1")).unwrap();

        let public = catalog.catalog_root(CatalogScope::Public).unwrap();
        assert_eq!(entries(public, "Fonts").len(), 1);
        assert_eq!(entries(public, "ColorSpaces").len(), 1);
        assert!(public.first_child("MultiMedias").is_none());

        let document = catalog.catalog_root(CatalogScope::Document).unwrap();
        assert_eq!(entries(document, "MultiMedias").len(), 1);
        assert_eq!(entries(document, "CompositeGraphicUnits").len(), 1);
        assert_eq!(entries(document, "DrawParams").len(), 1);
        assert!(document.first_child("Fonts").is_none());

        pkg.close().unwrap();
        let written = fs::read_to_string(tmp.path().join("Doc_0").join("PublicRes.xml")).unwrap();
        assert!(written.starts_with(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><ofd:Res {NS} BaseLoc="Res"><ofd:Fonts><ofd:Font FontName="SimSun" ID="1"/></ofd:Fonts>"#
        )));
        assert!(tmp.path().join("Doc_0").join("DocumentRes.xml").is_file());
        assert!(tmp.path().join("Doc_0").join("Res").join("icon.png").is_file());
    }

    #[test]
    fn test_reopen_reuses_existing_identifiers() {
        let (tmp, pkg, doc) = setup();
        let mut catalog = ResourceCatalog::open_document(doc).unwrap();
        let id = catalog.add_draw_param(&draw_param("0.5")).unwrap();
        catalog.commit().unwrap();
        pkg.close().unwrap();

        let pkg = PackageDir::open(tmp.path());
        let doc = pkg.doc(0).unwrap();
        let mut catalog = ResourceCatalog::open_document(doc).unwrap();
        assert_eq!(catalog.counter().current(), 1);

        let again = catalog
            .add_draw_param(&draw_param("0.5").attr("ID", "500"))
            .unwrap();
        assert_eq!(again, id);
        assert!(catalog.new_resource_ids().is_empty());
        let res = catalog.catalog_root(CatalogScope::Document).unwrap();
        assert_eq!(entries(res, "DrawParams").len(), 1);

        let fresh = catalog.add_draw_param(&draw_param("2")).unwrap();
        assert_eq!(fresh, ObjectId::new(2));
    }

    #[test]
    fn test_unchanged_catalog_is_not_rewritten() {
        let (tmp, pkg, doc) = setup();
        let mut catalog = ResourceCatalog::open_document(doc).unwrap();
        catalog.add_draw_param(&draw_param("0.5")).unwrap();
        catalog.commit().unwrap();
        pkg.close().unwrap();
        let path = tmp.path().join("Doc_0").join("DocumentRes.xml");
        let before = fs::read(&path).unwrap();

        let pkg = PackageDir::open(tmp.path());
        let mut catalog = ResourceCatalog::open_document(pkg.doc(0).unwrap()).unwrap();
        catalog.add_draw_param(&draw_param("0.5")).unwrap();
        catalog.commit().unwrap();
        pkg.close().unwrap();
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_hydration_skips_entries_without_identifier() {
        let public = format!(
            r#"<ofd:Res {NS} BaseLoc="Res">
                 <ofd:Fonts>
                   <ofd:Font FontName="NoId"/>
                   <ofd:Font ID="40" FontName="Known"/>
                 </ofd:Fonts>
               </ofd:Res>"#
        );
        let (_tmp, pkg) = existing(&[("PublicRes.xml", public.as_str())]);
        let mut catalog = ResourceCatalog::open(pkg.doc(0).unwrap(), IdCounter::new(0)).unwrap();

        // The counter never hands out an identifier already in use.
        assert_eq!(catalog.counter().current(), 40);
        let known = catalog.add_font(&FontDescriptor::new("Known")).unwrap();
        assert_eq!(known, ObjectId::new(40));
        let unknown = catalog.add_font(&FontDescriptor::new("NoId")).unwrap();
        assert_eq!(unknown, ObjectId::new(41));
    }

    #[test]
    fn test_reopen_with_character_reference_reuses_identifier() {
        let public = format!(
            r#"<ofd:Res {NS} BaseLoc="Res"><ofd:Fonts><ofd:Font ID="1" FontName="A&#38;B"/></ofd:Fonts></ofd:Res>"#
        );
        let (tmp, pkg) = existing(&[("PublicRes.xml", public.as_str())]);
        let mut catalog = ResourceCatalog::open(pkg.doc(0).unwrap(), IdCounter::new(0)).unwrap();

        assert_eq!(catalog.find_font("a&b").unwrap().id(), Some(ObjectId::new(1)));
        let id = catalog.add_font(&FontDescriptor::new("A&B")).unwrap();
        assert_eq!(id, ObjectId::new(1));
        assert!(catalog.new_resource_ids().is_empty());

        catalog.add_font(&FontDescriptor::new("C")).unwrap();
        pkg.close().unwrap();
        let written = fs::read_to_string(tmp.path().join("Doc_0").join("PublicRes.xml")).unwrap();
        assert!(written.contains(r#"<ofd:Font ID="1" FontName="A&amp;B"/>"#));
        assert!(!written.contains("&amp;#38;"));
        assert_eq!(written.matches("<ofd:Font ").count(), 2);
    }

    #[test]
    fn test_exhausted_identifiers_are_an_error() {
        let public = format!(
            r#"<ofd:Res {NS} BaseLoc="Res"><ofd:Fonts><ofd:Font ID="4294967295" FontName="X"/></ofd:Fonts></ofd:Res>"#
        );
        let (_tmp, pkg) = existing(&[("PublicRes.xml", public.as_str())]);
        let mut catalog = ResourceCatalog::open(pkg.doc(0).unwrap(), IdCounter::new(0)).unwrap();

        let known = catalog.add_font(&FontDescriptor::new("X")).unwrap();
        assert_eq!(known, ObjectId::new(u32::MAX));
        let err = catalog.add_font(&FontDescriptor::new("Y")).unwrap_err();
        assert!(matches!(err, CatalogError::IdentifiersExhausted(u32::MAX)));
        assert!(catalog.new_resource_ids().is_empty());
        let res = catalog.catalog_root(CatalogScope::Public).unwrap();
        assert_eq!(entries(res, "Fonts").len(), 1);
    }

    #[test]
    fn test_malformed_catalog_is_fatal() {
        let (_tmp, pkg) = existing(&[("PublicRes.xml", "<ofd:Res><ofd:Fonts></ofd:Res>")]);
        let err = ResourceCatalog::open(pkg.doc(0).unwrap(), IdCounter::new(0)).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MalformedCatalog { file: "PublicRes.xml", .. }
        ));
    }

    #[test]
    fn test_unclassified_element_passes_through() {
        let (_tmp, _pkg, doc) = setup();
        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(3)).unwrap();
        let mut pattern = Element::new("ofd:Pattern").attr("Width", "4");
        assert_eq!(catalog.catalog_element(&mut pattern).unwrap(), None);
        assert!(!pattern.has_attribute("ID"));
        assert_eq!(catalog.counter().current(), 3);
        assert!(catalog.catalog_root(CatalogScope::Document).is_none());
    }

    #[test]
    fn test_catalog_element_attaches_identifier() {
        let (_tmp, _pkg, doc) = setup();
        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(0)).unwrap();
        let mut color = Element::new("ofd:ColorSpace").attr("Type", "GRAY").attr("ID", "77");
        let id = catalog.catalog_element(&mut color).unwrap().unwrap();
        assert_eq!(id, ObjectId::new(1));
        assert_eq!(color.get_attribute("ID"), Some("1"));
    }

    #[test]
    fn test_add_image_formats() {
        let (_tmp, _pkg, doc) = setup();
        let src = tempfile::tempdir().unwrap();
        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(0)).unwrap();

        for (name, content) in [("photo.JPG", "a"), ("scan.TIF", "b"), ("icon.png", "c")] {
            let path = src.path().join(name);
            fs::write(&path, content).unwrap();
            catalog.add_image(&path).unwrap();
        }

        let res = catalog.catalog_root(CatalogScope::Document).unwrap();
        let formats: Vec<_> = entries(res, "MultiMedias")
            .iter()
            .map(|m| m.get_attribute("Format").unwrap_or_default().to_string())
            .collect();
        assert_eq!(formats, ["JPEG", "TIFF", "PNG"]);
        let media: Vec<_> = entries(res, "MultiMedias")
            .iter()
            .map(|m| m.first_child("MediaFile").unwrap().text().to_string())
            .collect();
        assert_eq!(media, ["photo.JPG", "scan.TIF", "icon.png"]);
    }

    #[test]
    fn test_same_image_twice_is_one_entry() {
        let (_tmp, _pkg, doc) = setup();
        let src = tempfile::tempdir().unwrap();
        let path = src.path().join("logo.png");
        fs::write(&path, b"logo").unwrap();

        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(0)).unwrap();
        let a = catalog.add_image(&path).unwrap();
        let b = catalog.add_image(&path).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_absolute_reference_when_base_loc_differs() {
        let document_res = format!(r#"<ofd:Res {NS} BaseLoc="Media"/>"#);
        let (_tmp, pkg) = existing(&[("DocumentRes.xml", document_res.as_str())]);
        let src = tempfile::tempdir().unwrap();
        let path = src.path().join("photo.png");
        fs::write(&path, b"png").unwrap();

        let mut catalog = ResourceCatalog::open(pkg.doc(0).unwrap(), IdCounter::new(0)).unwrap();
        catalog.add_image(&path).unwrap();
        let res = catalog.catalog_root(CatalogScope::Document).unwrap();
        let media = entries(res, "MultiMedias")[0].first_child("MediaFile").unwrap();
        assert_eq!(media.text(), "/Doc_0/Res/photo.png");
    }

    #[test]
    fn test_family_name_flags() {
        let (_tmp, _pkg, doc) = setup();
        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(0)).unwrap();
        let font = catalog
            .add_font_object(&FontDescriptor::new("Courier").with_family("FixedWidth"))
            .unwrap();
        assert_eq!(font.get_attribute("FixedWidth"), Some("true"));
        assert_eq!(font.get_attribute("ID"), Some("1"));
    }

    #[test]
    fn test_non_embeddable_font_is_not_copied() {
        let (tmp, pkg, doc) = setup();
        let src = tempfile::tempdir().unwrap();
        let file = src.path().join("private.ttf");
        fs::write(&file, b"ttf").unwrap();

        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(0)).unwrap();
        let font = catalog
            .add_font_object(
                &FontDescriptor::new("Private")
                    .with_file(&file)
                    .with_embeddable(false),
            )
            .unwrap();
        assert!(font.first_child("FontFile").is_none());

        pkg.close().unwrap();
        assert!(!tmp.path().join("Doc_0").join("Res").exists());
    }

    #[test]
    fn test_find_font_resolves_embedded_file() {
        let (tmp, pkg, doc) = setup();
        let src = tempfile::tempdir().unwrap();
        let file = src.path().join("simsun.ttf");
        fs::write(&file, b"glyphs").unwrap();

        let mut catalog = ResourceCatalog::open(doc, IdCounter::new(0)).unwrap();
        catalog
            .add_font(&FontDescriptor::new("SimSun").with_family("宋体").with_file(&file))
            .unwrap();

        let found = catalog.find_font("SIMSUN").unwrap();
        assert_eq!(found.font_file(), Some("simsun.ttf"));
        assert_eq!(found.file.unwrap().read().unwrap(), b"glyphs");
        assert!(catalog.find_font("宋体").is_some());
        assert!(catalog.find_font("KaiTi").is_none());
        assert!(catalog.find_font("").is_none());

        catalog.commit().unwrap();
        pkg.close().unwrap();

        let pkg = PackageDir::open(tmp.path());
        let catalog = ResourceCatalog::open_document(pkg.doc(0).unwrap()).unwrap();
        let found = catalog.find_font("simsun").unwrap();
        let file = found.file.unwrap();
        assert!(file.is_materialized());
        assert_eq!(
            file.path().unwrap(),
            tmp.path().join("Doc_0").join("Res").join("simsun.ttf")
        );
    }

    #[test]
    fn test_find_font_last_match_wins_and_public_first() {
        let public = format!(
            r#"<ofd:Res {NS} BaseLoc="Res">
                 <ofd:Fonts>
                   <ofd:Font ID="1" FontName="SimSun"/>
                   <ofd:Font ID="2" FamilyName="simsun"/>
                 </ofd:Fonts>
               </ofd:Res>"#
        );
        let document = format!(
            r#"<ofd:Res {NS} BaseLoc="Res">
                 <ofd:Fonts>
                   <ofd:Font ID="3" FontName="SimSun"/>
                   <ofd:Font ID="4" FontName="KaiTi"/>
                 </ofd:Fonts>
               </ofd:Res>"#
        );
        let (_tmp, pkg) = existing(&[
            ("PublicRes.xml", public.as_str()),
            ("DocumentRes.xml", document.as_str()),
        ]);
        let catalog = ResourceCatalog::open(pkg.doc(0).unwrap(), IdCounter::new(0)).unwrap();

        assert_eq!(catalog.find_font("simsun").unwrap().id(), Some(ObjectId::new(2)));
        assert_eq!(catalog.find_font("KAITI").unwrap().id(), Some(ObjectId::new(4)));
    }

    #[test]
    fn test_find_font_with_rooted_base_loc() {
        let public = format!(
            r#"<ofd:Res {NS} BaseLoc="/Fonts">
                 <ofd:Fonts>
                   <ofd:Font ID="1" FontName="A"><ofd:FontFile>a.ttf</ofd:FontFile></ofd:Font>
                   <ofd:Font ID="2" FontName="B"><ofd:FontFile>missing.ttf</ofd:FontFile></ofd:Font>
                 </ofd:Fonts>
               </ofd:Res>"#
        );
        let (tmp, pkg) = existing(&[("PublicRes.xml", public.as_str())]);
        fs::create_dir_all(tmp.path().join("Fonts")).unwrap();
        fs::write(tmp.path().join("Fonts").join("a.ttf"), b"a").unwrap();

        let catalog = ResourceCatalog::open(pkg.doc(0).unwrap(), IdCounter::new(0)).unwrap();
        let a = catalog.find_font("a").unwrap();
        assert_eq!(a.file.unwrap().read().unwrap(), b"a");
        // Known font whose file cannot be resolved still comes back.
        let b = catalog.find_font("b").unwrap();
        assert!(b.file.is_none());
    }

    #[test]
    fn test_commit_registers_catalogs_once() {
        let (_tmp, _pkg, doc) = setup();
        let mut catalog = ResourceCatalog::open(doc.clone(), IdCounter::new(0)).unwrap();
        catalog.add_draw_param(&draw_param("1")).unwrap();
        catalog.add_font(&FontDescriptor::new("SimSun")).unwrap();
        catalog.commit().unwrap();
        catalog.commit().unwrap();

        let document = doc.document().unwrap().unwrap();
        assert_eq!(
            document.to_xml_string(),
            "<ofd:Document><ofd:CommonData>\
             <ofd:MaxUnitID>2</ofd:MaxUnitID>\
             <ofd:PublicRes>PublicRes.xml</ofd:PublicRes>\
             <ofd:DocumentRes>DocumentRes.xml</ofd:DocumentRes>\
             </ofd:CommonData></ofd:Document>"
        );
    }

    #[test]
    fn test_commit_creates_common_data() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = PackageDir::open(tmp.path());
        let doc = pkg.obtain_doc(0).unwrap();
        doc.set_document(Element::new("ofd:Document").child(Element::new("ofd:Pages")))
            .unwrap();

        let mut catalog = ResourceCatalog::open_document(doc.clone()).unwrap();
        assert_eq!(catalog.counter().current(), 0);
        catalog.add_draw_param(&draw_param("1")).unwrap();
        catalog.commit().unwrap();

        let document = doc.document().unwrap().unwrap();
        assert_eq!(document.children()[0].local_name(), "CommonData");
        assert_eq!(
            document.children()[0].to_xml_string(),
            "<ofd:CommonData><ofd:MaxUnitID>1</ofd:MaxUnitID>\
             <ofd:DocumentRes>DocumentRes.xml</ofd:DocumentRes></ofd:CommonData>"
        );
    }

    #[test]
    fn test_commit_without_document_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = PackageDir::open(tmp.path());
        let doc = pkg.obtain_doc(0).unwrap();
        let mut catalog = ResourceCatalog::open(doc.clone(), IdCounter::new(0)).unwrap();
        catalog.add_draw_param(&draw_param("1")).unwrap();
        catalog.commit().unwrap();
        assert!(doc.document().unwrap().is_none());
        assert!(doc.document_res().unwrap().is_some());
    }
}
