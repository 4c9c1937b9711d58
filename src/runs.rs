//! Run-text extraction over markup fragments.
//!
//! A text run is the smallest unit of literal visible text in the markup.
//! These helpers pull run content out of any fragment, ignoring every other
//! element (formatting runs, breaks, properties).

use crate::error::{Error, Result};
use quick_xml::events::Event;

/// Concatenate the literal content of every `w:t` element in the fragment,
/// in document order.
///
/// Tolerates attributes on the text tag (`xml:space="preserve"` and the
/// like). Returns an empty string when the fragment holds no text runs.
pub fn run_text(fragment: &str) -> Result<String> {
    collect_text(fragment, b"w:t")
}

/// Delete-text variant of [`run_text`]: deleted runs record their content
/// under `w:delText` rather than `w:t`.
pub fn deleted_run_text(fragment: &str) -> Result<String> {
    collect_text(fragment, b"w:delText")
}

fn collect_text(fragment: &str, text_tag: &[u8]) -> Result<String> {
    let mut reader = quick_xml::Reader::from_str(fragment);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == text_tag => in_text = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == text_tag => in_text = false,
            Ok(Event::Text(ref e)) if in_text => {
                text.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(Error::ExtractionFailed(err.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}
