//! Resource kinds and the catalog each kind belongs to.

use crate::element::{Element, ElementBase};
use crate::pkg::constants::{DOCUMENT_RES_FILE, PUBLIC_RES_FILE, tag};
use phf::phf_map;

/// Closed set of resource kinds the catalog accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Font,
    ColorSpace,
    DrawParam,
    /// Images and other media
    MultiMedia,
    /// Vector-graphic units
    CompositeGraphicUnit,
}

/// Element local names mapped to their kind.
static KIND_BY_LOCAL_NAME: phf::Map<&'static str, ResourceKind> = phf_map! {
    "Font" => ResourceKind::Font,
    "ColorSpace" => ResourceKind::ColorSpace,
    "DrawParam" => ResourceKind::DrawParam,
    "MultiMedia" => ResourceKind::MultiMedia,
    "CompositeGraphicUnit" => ResourceKind::CompositeGraphicUnit,
};

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Font,
        ResourceKind::ColorSpace,
        ResourceKind::DrawParam,
        ResourceKind::MultiMedia,
        ResourceKind::CompositeGraphicUnit,
    ];

    /// Classify an element by its local name.
    pub fn classify(element: &Element) -> Option<Self> {
        KIND_BY_LOCAL_NAME.get(element.local_name()).copied()
    }

    /// The catalog hosting this kind.
    pub fn scope(self) -> CatalogScope {
        match self {
            ResourceKind::Font | ResourceKind::ColorSpace => CatalogScope::Public,
            ResourceKind::DrawParam
            | ResourceKind::MultiMedia
            | ResourceKind::CompositeGraphicUnit => CatalogScope::Document,
        }
    }

    /// Tag of a single entry.
    pub fn tag(self) -> &'static str {
        match self {
            ResourceKind::Font => tag::FONT,
            ResourceKind::ColorSpace => tag::COLOR_SPACE,
            ResourceKind::DrawParam => tag::DRAW_PARAM,
            ResourceKind::MultiMedia => tag::MULTI_MEDIA,
            ResourceKind::CompositeGraphicUnit => tag::COMPOSITE_GRAPHIC_UNIT,
        }
    }

    /// Tag of the typed sub-list holding entries of this kind.
    pub fn list_tag(self) -> &'static str {
        match self {
            ResourceKind::Font => tag::FONTS,
            ResourceKind::ColorSpace => tag::COLOR_SPACES,
            ResourceKind::DrawParam => tag::DRAW_PARAMS,
            ResourceKind::MultiMedia => tag::MULTI_MEDIAS,
            ResourceKind::CompositeGraphicUnit => tag::COMPOSITE_GRAPHIC_UNITS,
        }
    }

    pub(crate) fn list_local_name(self) -> &'static str {
        local(self.list_tag())
    }
}

fn local(tag: &'static str) -> &'static str {
    tag.rsplit_once(':').map_or(tag, |(_, local)| local)
}

/// The two per-document resource catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogScope {
    /// Resources reusable document-wide (`PublicRes.xml`)
    Public,
    /// Resources scoped to one logical document (`DocumentRes.xml`)
    Document,
}

impl CatalogScope {
    pub const ALL: [CatalogScope; 2] = [CatalogScope::Public, CatalogScope::Document];

    /// Catalog file name inside the document directory.
    pub fn file_name(self) -> &'static str {
        match self {
            CatalogScope::Public => PUBLIC_RES_FILE,
            CatalogScope::Document => DOCUMENT_RES_FILE,
        }
    }

    /// Tag registering the catalog in `Document.xml/CommonData`.
    pub fn registration_tag(self) -> &'static str {
        match self {
            CatalogScope::Public => tag::PUBLIC_RES,
            CatalogScope::Document => tag::DOCUMENT_RES,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            CatalogScope::Public => 0,
            CatalogScope::Document => 1,
        }
    }
}

/// A classified resource: its kind plus its element.
///
/// The element carries no `ID` until it has been cataloged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceObject {
    kind: ResourceKind,
    element: Element,
}

impl ResourceObject {
    pub fn new(kind: ResourceKind, element: Element) -> Self {
        Self { kind, element }
    }

    /// Classify a raw element; `None` for kinds the catalog does not host.
    pub fn from_element(element: Element) -> Option<Self> {
        ResourceKind::classify(&element).map(|kind| Self { kind, element })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub(crate) fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    pub fn into_element(self) -> Element {
        self.element
    }
}
