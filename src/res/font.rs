//! Font descriptors handed to the catalog and fonts found in it.

use crate::element::{Element, ElementBase};
use crate::pkg::FileRef;
use crate::pkg::constants::{ID_ATTR, attr, tag};
use crate::res::id::ObjectId;
use bitflags::bitflags;
use phf::phf_map;
use std::path::PathBuf;

bitflags! {
    /// Style flags written as boolean attributes of a font entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FontFlags: u8 {
        const ITALIC = 0x01;
        const BOLD = 0x02;
        const SERIF = 0x04;
        const FIXED_WIDTH = 0x08;
    }
}

/// Well-known family names that imply a style flag (lowercase keys).
static FAMILY_FLAGS: phf::Map<&'static str, FontFlags> = phf_map! {
    "serif" => FontFlags::SERIF,
    "bold" => FontFlags::BOLD,
    "italic" => FontFlags::ITALIC,
    "fixedwidth" => FontFlags::FIXED_WIDTH,
};

/// Attribute names in the order they are written.
const FLAG_ATTRIBUTES: [(FontFlags, &str); 4] = [
    (FontFlags::ITALIC, "Italic"),
    (FontFlags::BOLD, "Bold"),
    (FontFlags::SERIF, "Serif"),
    (FontFlags::FIXED_WIDTH, "FixedWidth"),
];

impl FontFlags {
    /// Flag implied by a family name, compared case-insensitively.
    pub fn for_family(family: &str) -> FontFlags {
        FAMILY_FLAGS
            .get(family.to_lowercase().as_str())
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn write_attributes(self, element: &mut Element) {
        for (flag, name) in FLAG_ATTRIBUTES {
            if self.contains(flag) {
                element.set_attribute(name, "true");
            }
        }
    }

    /// Flags set to `true` on an existing font entry.
    pub fn read_attributes(element: &Element) -> FontFlags {
        FLAG_ATTRIBUTES
            .iter()
            .filter(|(_, name)| element.get_bool_attribute(name) == Some(true))
            .fold(FontFlags::empty(), |acc, (flag, _)| acc | *flag)
    }
}

/// A font to register in the public catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    /// Font name (`FontName`)
    pub name: String,
    /// Family name (`FamilyName`)
    pub family_name: Option<String>,
    /// Backing font file, copied into the package when embeddable
    pub file: Option<PathBuf>,
    /// Whether the backing file may be embedded
    pub embeddable: bool,
    /// Explicit style flags, merged with those implied by the family name
    pub flags: FontFlags,
}

impl FontDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family_name: None,
            file: None,
            embeddable: true,
            flags: FontFlags::empty(),
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family_name = Some(family.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_embeddable(mut self, embeddable: bool) -> Self {
        self.embeddable = embeddable;
        self
    }

    pub fn with_flags(mut self, flags: FontFlags) -> Self {
        self.flags = flags;
        self
    }

    /// All flags of the entry: explicit ones plus those implied by the family.
    pub fn effective_flags(&self) -> FontFlags {
        let implied = self
            .family_name
            .as_deref()
            .map(FontFlags::for_family)
            .unwrap_or_default();
        self.flags | implied
    }

    /// Build the font entry, without `ID` and without a file reference.
    pub(crate) fn to_element(&self) -> Element {
        let mut element = Element::new(tag::FONT)
            .attr(attr::FONT_NAME, self.name.as_str());
        if let Some(family) = &self.family_name {
            element.set_attribute(attr::FAMILY_NAME, family.as_str());
        }
        self.effective_flags().write_attributes(&mut element);
        element
    }
}

/// A font entry found in a catalog.
#[derive(Debug, Clone)]
pub struct ExistingFont {
    /// The catalog entry, including its `ID`
    pub element: Element,
    /// The backing file, when it could be resolved inside the package
    pub file: Option<FileRef>,
}

impl ExistingFont {
    pub fn id(&self) -> Option<ObjectId> {
        self.element.get_attribute(ID_ATTR).and_then(ObjectId::parse)
    }

    pub fn font_name(&self) -> Option<&str> {
        self.element.get_attribute(attr::FONT_NAME)
    }

    pub fn family_name(&self) -> Option<&str> {
        self.element.get_attribute(attr::FAMILY_NAME)
    }

    pub fn flags(&self) -> FontFlags {
        FontFlags::read_attributes(&self.element)
    }

    /// The `FontFile` reference as written in the catalog.
    pub fn font_file(&self) -> Option<&str> {
        self.element.first_child("FontFile").map(|f| f.text())
    }
}

/// Case-insensitive match on `FontName` or `FamilyName`.
pub(crate) fn font_matches(element: &Element, lowered: &str) -> bool {
    [attr::FONT_NAME, attr::FAMILY_NAME]
        .iter()
        .filter_map(|name| element.get_attribute(name))
        .any(|value| value.to_lowercase() == lowered)
}
