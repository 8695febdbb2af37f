//! Constant values of the package directory convention.
//!
//! This module contains the fixed file and directory names of a package, the
//! XML namespace of its structured objects, and the tag names the storage
//! core reads and writes.

/// Package index file at the package root
pub const INDEX_FILE: &str = "OFD.xml";

/// Primary descriptor of a logical document
pub const DOCUMENT_FILE: &str = "Document.xml";

/// Public resource catalog of a logical document
pub const PUBLIC_RES_FILE: &str = "PublicRes.xml";

/// Document resource catalog of a logical document
pub const DOCUMENT_RES_FILE: &str = "DocumentRes.xml";

/// Conventional binary-media directory inside a document directory
pub const RES_DIR: &str = "Res";

/// Prefix of logical document directories (`Doc_0`, `Doc_1`, ...)
pub const DOC_DIR_PREFIX: &str = "Doc_";

/// Namespace URI of package structured objects
pub const OFD_NAMESPACE: &str = "http://www.ofdspec.org/2016";

/// Namespace prefix used for every element
pub const OFD_PREFIX: &str = "ofd";

/// Identifier attribute carried by cataloged resources
pub const ID_ATTR: &str = "ID";

/// Qualified tag names
pub mod tag {
    pub const RES: &str = "ofd:Res";
    pub const FONTS: &str = "ofd:Fonts";
    pub const FONT: &str = "ofd:Font";
    pub const FONT_FILE: &str = "ofd:FontFile";
    pub const COLOR_SPACES: &str = "ofd:ColorSpaces";
    pub const COLOR_SPACE: &str = "ofd:ColorSpace";
    pub const DRAW_PARAMS: &str = "ofd:DrawParams";
    pub const DRAW_PARAM: &str = "ofd:DrawParam";
    pub const MULTI_MEDIAS: &str = "ofd:MultiMedias";
    pub const MULTI_MEDIA: &str = "ofd:MultiMedia";
    pub const MEDIA_FILE: &str = "ofd:MediaFile";
    pub const COMPOSITE_GRAPHIC_UNITS: &str = "ofd:CompositeGraphicUnits";
    pub const COMPOSITE_GRAPHIC_UNIT: &str = "ofd:CompositeGraphicUnit";
    pub const DOCUMENT: &str = "ofd:Document";
    pub const COMMON_DATA: &str = "ofd:CommonData";
    pub const MAX_UNIT_ID: &str = "ofd:MaxUnitID";
    pub const PUBLIC_RES: &str = "ofd:PublicRes";
    pub const DOCUMENT_RES: &str = "ofd:DocumentRes";
}

/// Attribute names
pub mod attr {
    pub const BASE_LOC: &str = "BaseLoc";
    pub const FONT_NAME: &str = "FontName";
    pub const FAMILY_NAME: &str = "FamilyName";
    pub const TYPE: &str = "Type";
    pub const FORMAT: &str = "Format";
    pub const XMLNS_OFD: &str = "xmlns:ofd";
}
