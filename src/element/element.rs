//! Ordered XML element tree.
//!
//! Structured objects inside a package (descriptors, catalogs, page content)
//! are held as [`Element`] trees. Attribute order is preserved exactly as read
//! or inserted, so that serialization is deterministic: the serialized form
//! doubles as the canonical text used for fingerprinting.

use crate::common::xml::{escape_text, escape_xml, resolve_entity};
use crate::common::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;

/// XML declaration written in front of serialized package files.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Attribute storage. Most package elements carry a handful of attributes.
type Attributes = SmallVec<[(String, String); 4]>;

/// Read access shared by element-like values.
pub trait ElementBase {
    /// Get the tag name of this element (including any prefix)
    fn tag_name(&self) -> &str;

    /// Get the attributes of this element in document order
    fn attributes(&self) -> &[(String, String)];

    /// Get the text content of this element
    fn text(&self) -> &str;

    /// Get attribute value by name
    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check if element has attribute
    fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Get boolean attribute value
    fn get_bool_attribute(&self, name: &str) -> Option<bool> {
        self.get_attribute(name).and_then(|s| match s {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        })
    }

    /// Get integer attribute value
    fn get_int_attribute(&self, name: &str) -> Option<i64> {
        self.get_attribute(name).and_then(|s| s.trim().parse().ok())
    }

    /// Local part of the tag name (after the namespace prefix)
    fn local_name(&self) -> &str {
        let tag = self.tag_name();
        tag.rsplit_once(':').map_or(tag, |(_, local)| local)
    }
}

/// A parsed XML element with ordered attributes, text and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag_name: String,
    attributes: Attributes,
    text_content: String,
    children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: SmallVec::new(),
            text_content: String::new(),
            children: Vec::new(),
        }
    }

    /// Create a leaf element holding text
    pub fn with_text(tag_name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(tag_name);
        element.text_content = text.into();
        element
    }

    /// Set attribute value, keeping the position of an existing attribute.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Remove attribute, returning its previous value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Set the text content of this element
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text_content = text.into();
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Builder form of [`add_child`](Self::add_child).
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Get children
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Get mutable children
    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    /// Children whose local name matches
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.local_name() == local)
    }

    /// First child whose local name matches
    pub fn first_child(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == local)
    }

    /// First child whose local name matches, mutably
    pub fn first_child_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.local_name() == local)
    }

    /// Namespace prefix of the tag, if any (`ofd` for `ofd:Font`)
    pub fn prefix(&self) -> Option<&str> {
        self.tag_name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Create element from XML bytes.
    ///
    /// Text is trimmed per element and whitespace-only text between children
    /// is dropped, so indentation in the source does not survive a round trip.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_reader(bytes);
        let mut buf = Vec::new();
        // Open elements paired with their raw text accumulator.
        let mut stack: Vec<(Element, String)> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push((Self::open_tag(e)?, String::new()));
                },
                Ok(Event::Empty(ref e)) => {
                    let element = Self::open_tag(e)?;
                    match stack.last_mut() {
                        Some((parent, _)) => parent.children.push(element),
                        None => return Ok(element),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some((_, text)) = stack.last_mut() {
                        // References arrive as separate `GeneralRef` events.
                        text.push_str(std::str::from_utf8(t.as_ref())?);
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if let Some((_, text)) = stack.last_mut() {
                        text.push_str(std::str::from_utf8(t.as_ref())?);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some((_, text)) = stack.last_mut() {
                        let name = std::str::from_utf8(r)?;
                        let ch = resolve_entity(name).ok_or_else(|| {
                            Error::XmlError(format!("Unknown entity reference: &{name};"))
                        })?;
                        text.push(ch);
                    }
                },
                Ok(Event::End(_)) => {
                    if let Some((mut element, text)) = stack.pop() {
                        element.text_content = text.trim().to_string();
                        if let Some((parent, _)) = stack.last_mut() {
                            parent.children.push(element);
                        } else {
                            // This is the root element
                            return Ok(element);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlError(format!("XML parsing error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Err(Error::XmlError("No root element found".to_string()))
    }

    fn open_tag(e: &BytesStart<'_>) -> Result<Self> {
        let tag_name = std::str::from_utf8(e.name().as_ref())?.to_string();
        let mut element = Element::new(tag_name);
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = attr.unescape_value()?;
            element.attributes.push((key.to_string(), value.into_owned()));
        }
        Ok(element)
    }

    /// Serialize element to its canonical XML string (no declaration).
    pub fn to_xml_string(&self) -> String {
        let mut xml = String::with_capacity(self.estimated_xml_len());
        self.write_xml(&mut xml);
        xml
    }

    /// Serialize as a standalone file body.
    pub fn to_document_bytes(&self, declaration: bool) -> Vec<u8> {
        let body = self.to_xml_string();
        if !declaration {
            return body.into_bytes();
        }
        let mut out = String::with_capacity(XML_DECLARATION.len() + body.len());
        out.push_str(XML_DECLARATION);
        out.push_str(&body);
        out.into_bytes()
    }

    fn estimated_xml_len(&self) -> usize {
        let mut len = 2 * self.tag_name.len() + 5 + self.text_content.len();
        for (key, value) in &self.attributes {
            len += key.len() + value.len() + 4;
        }
        len + self.children.iter().map(Self::estimated_xml_len).sum::<usize>()
    }

    fn write_xml(&self, output: &mut String) {
        output.push('<');
        output.push_str(&self.tag_name);

        for (key, value) in &self.attributes {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape_xml(value));
            output.push('"');
        }

        if self.children.is_empty() && self.text_content.is_empty() {
            output.push_str("/>");
            return;
        }

        output.push('>');
        if !self.text_content.is_empty() {
            output.push_str(&escape_text(&self.text_content));
        }
        for child in &self.children {
            child.write_xml(output);
        }
        output.push_str("</");
        output.push_str(&self.tag_name);
        output.push('>');
    }
}

impl ElementBase for Element {
    fn tag_name(&self) -> &str {
        &self.tag_name
    }

    fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    fn text(&self) -> &str {
        &self.text_content
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_xml_string())
    }
}
