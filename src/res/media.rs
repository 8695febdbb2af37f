//! Multimedia entries for images.

use crate::element::Element;
use crate::pkg::constants::{attr, tag};
use phf::phf_map;

/// Extensions whose media format name differs from the upper-cased extension.
static FORMAT_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "JPG" => "JPEG",
    "TIF" => "TIFF",
};

/// Media type written for images.
pub const IMAGE_TYPE: &str = "Image";

/// Media format name for an image file name.
///
/// The upper-cased text after the last period, except `JPG` becomes `JPEG`
/// and `TIF` becomes `TIFF`. A name without a period is used whole.
pub fn image_format(file_name: &str) -> String {
    let ext = file_name.rsplit('.').next().unwrap_or(file_name).to_uppercase();
    match FORMAT_ALIASES.get(ext.as_str()) {
        Some(alias) => (*alias).to_string(),
        None => ext,
    }
}

/// Multimedia entry for an image stored at `media_file`.
pub(crate) fn image_element(media_file: &str) -> Element {
    Element::new(tag::MULTI_MEDIA)
        .attr(attr::TYPE, IMAGE_TYPE)
        .attr(attr::FORMAT, image_format(media_file))
        .child(Element::with_text(tag::MEDIA_FILE, media_file))
}
