//! Inner-markup collection for scanners.
//!
//! Scanners reassemble the markup between an element's open and close tags
//! into a string fragment, which the run-text extractor then walks on its
//! own. Reassembly preserves tag names, attributes, and escaped text.

use quick_xml::events::{BytesEnd, BytesStart};

pub(crate) fn push_start(fragment: &mut String, e: &BytesStart) {
    push_open_tag(fragment, e);
    fragment.push('>');
}

pub(crate) fn push_empty(fragment: &mut String, e: &BytesStart) {
    push_open_tag(fragment, e);
    fragment.push_str("/>");
}

pub(crate) fn push_end(fragment: &mut String, e: &BytesEnd) {
    fragment.push_str("</");
    fragment.push_str(&String::from_utf8_lossy(e.name().as_ref()));
    fragment.push('>');
}

fn push_open_tag(fragment: &mut String, e: &BytesStart) {
    fragment.push('<');
    fragment.push_str(&String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes().flatten() {
        fragment.push(' ');
        fragment.push_str(&String::from_utf8_lossy(attr.key.as_ref()));
        fragment.push_str("=\"");
        fragment.push_str(&String::from_utf8_lossy(&attr.value));
        fragment.push('"');
    }
}

/// Escape XML special characters in text re-emitted into a fragment.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
