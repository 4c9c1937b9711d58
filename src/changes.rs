//! Change-block scanners over the document body.
//!
//! One generic scanner handles all four tracked-change kinds; each kind is a
//! separate pass over the document body, and the four passes are independent
//! of one another.

use crate::error::{Error, Result};
use crate::fragment::{escape_xml, push_empty, push_end, push_start};
use crate::model::{ChangeKind, TrackedChange};
use crate::runs;
use quick_xml::events::{BytesStart, Event};

/// Default author when a change element does not record one.
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Scan the document body for tracked changes of one kind, in document
/// order.
///
/// Matches both the paired and the self-closing form of the element; a
/// self-closing change carries no text runs and is therefore dropped, as is
/// any paired change whose contained runs are all empty. Same-kind nesting
/// is resolved by depth: the outermost element is the change and nested
/// content contributes its runs to it.
pub fn scan_changes(document_xml: &str, kind: ChangeKind) -> Result<Vec<TrackedChange>> {
    let tag = kind.element_tag();
    let mut reader = quick_xml::Reader::from_str(document_xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut changes = Vec::new();
    let mut depth = 0u32;
    let mut fragment = String::new();
    let mut pending: Option<ChangeAttrs> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == tag {
                    if depth == 0 {
                        pending = Some(ChangeAttrs::read(e));
                        fragment.clear();
                    } else {
                        push_start(&mut fragment, e);
                    }
                    depth += 1;
                } else if depth > 0 {
                    push_start(&mut fragment, e);
                }
            }
            Ok(Event::Empty(ref e)) => {
                // A self-closing change element has no runs to extract and
                // is dropped; self-closing markup inside an open change
                // still lands in its fragment.
                if depth > 0 {
                    push_empty(&mut fragment, e);
                }
            }
            Ok(Event::Text(ref e)) => {
                if depth > 0 {
                    let text = e.unescape().unwrap_or_default();
                    fragment.push_str(&escape_xml(&text));
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == tag && depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(attrs) = pending.take() {
                            let text = match kind {
                                ChangeKind::Deletion => runs::deleted_run_text(&fragment)?,
                                _ => runs::run_text(&fragment)?,
                            };
                            if !text.is_empty() {
                                changes.push(TrackedChange {
                                    kind,
                                    author: attrs.author,
                                    date: attrs.date,
                                    text,
                                    id: attrs.id,
                                });
                            }
                        }
                    } else {
                        push_end(&mut fragment, e);
                    }
                } else if depth > 0 {
                    push_end(&mut fragment, e);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(Error::ExtractionFailed(err.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(changes)
}

struct ChangeAttrs {
    author: String,
    date: String,
    id: Option<String>,
}

impl ChangeAttrs {
    fn read(e: &BytesStart) -> Self {
        let mut author = None;
        let mut date = None;
        let mut id = None;

        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"w:author" => author = Some(String::from_utf8_lossy(&attr.value).to_string()),
                b"w:date" => date = Some(String::from_utf8_lossy(&attr.value).to_string()),
                b"w:id" => id = Some(String::from_utf8_lossy(&attr.value).to_string()),
                _ => {}
            }
        }

        Self {
            author: author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            date: date.unwrap_or_default(),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_with_attributes() {
        let xml = r#"<w:body><w:p><w:ins w:id="1" w:author="A" w:date="2024-01-01T00:00:00Z"><w:r><w:t>hello</w:t></w:r></w:ins></w:p></w:body>"#;
        let changes = scan_changes(xml, ChangeKind::Insertion).unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Insertion);
        assert_eq!(changes[0].author, "A");
        assert_eq!(changes[0].date, "2024-01-01T00:00:00Z");
        assert_eq!(changes[0].text, "hello");
        assert_eq!(changes[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn test_missing_attributes_take_defaults() {
        let xml = r#"<w:ins><w:r><w:t>x</w:t></w:r></w:ins>"#;
        let changes = scan_changes(xml, ChangeKind::Insertion).unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].author, "Unknown");
        assert_eq!(changes[0].date, "");
        assert_eq!(changes[0].id, None);
    }

    #[test]
    fn test_empty_change_dropped() {
        let xml = r#"<w:ins w:author="A"><w:r><w:rPr><w:b/></w:rPr></w:r></w:ins><w:ins w:author="B"/>"#;
        let changes = scan_changes(xml, ChangeKind::Insertion).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_deletion_uses_del_text() {
        let xml = r#"<w:del w:author="A"><w:r><w:delText>removed</w:delText></w:r></w:del>"#;
        let deletions = scan_changes(xml, ChangeKind::Deletion).unwrap();
        assert_eq!(deletions.len(), 1);
        assert_eq!(deletions[0].text, "removed");

        // The same markup yields no insertions: w:delText is not run text.
        let insertions = scan_changes(xml, ChangeKind::Insertion).unwrap();
        assert!(insertions.is_empty());
    }

    #[test]
    fn test_scan_order_is_document_order() {
        let xml = r#"<w:ins w:author="A"><w:r><w:t>first</w:t></w:r></w:ins><w:p/><w:ins w:author="B"><w:r><w:t>second</w:t></w:r></w:ins>"#;
        let changes = scan_changes(xml, ChangeKind::Insertion).unwrap();
        let texts: Vec<_> = changes.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn test_move_kinds_match_their_tags() {
        let xml = r#"<w:moveFrom w:author="A"><w:r><w:t>gone</w:t></w:r></w:moveFrom><w:moveTo w:author="A"><w:r><w:t>here</w:t></w:r></w:moveTo>"#;

        let from = scan_changes(xml, ChangeKind::MoveFrom).unwrap();
        assert_eq!(from.len(), 1);
        assert_eq!(from[0].text, "gone");

        let to = scan_changes(xml, ChangeKind::MoveTo).unwrap();
        assert_eq!(to.len(), 1);
        assert_eq!(to[0].text, "here");
    }

    #[test]
    fn test_nested_same_kind_folds_into_outermost() {
        let xml = r#"<w:ins w:author="A"><w:r><w:t>a</w:t></w:r><w:ins w:author="B"><w:r><w:t>b</w:t></w:r></w:ins></w:ins>"#;
        let changes = scan_changes(xml, ChangeKind::Insertion).unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].author, "A");
        assert_eq!(changes[0].text, "ab");
    }

    #[test]
    fn test_other_kinds_do_not_match() {
        let xml = r#"<w:del w:author="A"><w:r><w:delText>x</w:delText></w:r></w:del>"#;
        assert!(scan_changes(xml, ChangeKind::MoveFrom).unwrap().is_empty());
        assert!(scan_changes(xml, ChangeKind::MoveTo).unwrap().is_empty());
    }
}
