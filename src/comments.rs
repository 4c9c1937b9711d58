//! Comment scanner over the comments part.

use crate::error::{Error, Result};
use crate::fragment::{escape_xml, push_empty, push_end, push_start};
use crate::model::Comment;
use crate::runs;
use quick_xml::events::{BytesStart, Event};

const COMMENT_TAG: &[u8] = b"w:comment";

/// Scan the comments part for comment definitions, in definition order.
///
/// Only the paired form of `w:comment` exists, so self-closing occurrences
/// are ignored. Unlike the change scanners, a comment with an empty body is
/// still emitted.
pub fn scan_comments(comments_xml: &str) -> Result<Vec<Comment>> {
    let mut reader = quick_xml::Reader::from_str(comments_xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut comments = Vec::new();
    let mut depth = 0u32;
    let mut fragment = String::new();
    let mut pending: Option<CommentAttrs> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == COMMENT_TAG {
                    if depth == 0 {
                        pending = Some(CommentAttrs::read(e));
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
                if e.name().as_ref() == COMMENT_TAG && depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(attrs) = pending.take() {
                            comments.push(Comment {
                                id: attrs.id,
                                author: attrs.author,
                                date: attrs.date,
                                text: runs::run_text(&fragment)?,
                                anchored_text: None,
                            });
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

    Ok(comments)
}

struct CommentAttrs {
    id: String,
    author: String,
    date: String,
}

impl CommentAttrs {
    fn read(e: &BytesStart) -> Self {
        let mut id = None;
        let mut author = None;
        let mut date = None;

        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"w:id" => id = Some(String::from_utf8_lossy(&attr.value).to_string()),
                b"w:author" => author = Some(String::from_utf8_lossy(&attr.value).to_string()),
                b"w:date" => date = Some(String::from_utf8_lossy(&attr.value).to_string()),
                _ => {}
            }
        }

        Self {
            id: id.unwrap_or_default(),
            author: author.unwrap_or_else(|| "Unknown".to_string()),
            date: date.unwrap_or_default(),
        }
    }
}
