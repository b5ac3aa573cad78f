//! Character reference decoding and markup escaping

use quick_xml::escape::{escape, partial_escape, unescape_with, EscapeError};

/// Decode the predefined XML entities and numeric character references.
///
/// `&nbsp;` is also recognized since it shows up in nearly every HTML panel.
/// Any other named reference is an error.
pub fn decode_entities(raw: &str) -> Result<String, EscapeError> {
    unescape_with(raw, resolve_entity).map(|text| text.into_owned())
}

fn resolve_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some("\u{a0}"),
        _ => None,
    }
}

/// Escape text content for re-emission as markup
pub fn escape_text(text: &str) -> String {
    partial_escape(text).into_owned()
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attribute(value: &str) -> String {
    escape(value).into_owned()
}
